//! Raw configuration types, as read from disk before validation

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::points::Points;

/// Marker text that must not survive into a written feedback document
pub const DEFAULT_PLACEHOLDER: &str = "TODO";

/// Lecture configuration file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// Lecture marker used in feedback file names
    #[serde(default = "default_lecture")]
    pub lecture: String,

    /// Roster database (default: `<lecture>.sqlite3` next to the config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,

    /// Placeholder marker for unfinished feedback
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    #[serde(default)]
    pub assignments: Vec<RawAssignment>,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            lecture: default_lecture(),
            database: None,
            placeholder: default_placeholder(),
            assignments: Vec::new(),
        }
    }
}

/// One `[[assignments]]` entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAssignment {
    pub number: u32,

    /// Delimited grading file for batch feedback
    #[serde(default, alias = "filepath", skip_serializing_if = "Option::is_none")]
    pub grading_file: Option<PathBuf>,

    /// Roster table name (default: `ass<number>`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Task id -> maximum points
    pub max_points: BTreeMap<String, Points>,

    /// Fixed total the overall score is advertised against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<Points>,
}

fn default_lecture() -> String {
    "lecture".to_string()
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}
