//! Per-team grading ledger
//!
//! A ledger maps task ids to the ordered annotations a tutor recorded for that
//! task. It is persisted as one JSON object per team:
//!
//! ```json
//! {"1": [[-3, "missing edge case"], [null, null]], "2": []}
//! ```
//!
//! Decoding is strict about the shape (string task ids of positive integers
//! mapping to lists of `[penalty, comment]` pairs). Anything else is treated
//! as "no grading yet" rather than coerced.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::annotation::Annotation;
use crate::error::{GradebookError, Result};

/// Identifier of a task within an assignment (1-based).
pub type TaskId = u32;

/// All annotations recorded for one team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamLedger {
    tasks: BTreeMap<TaskId, Vec<Annotation>>,
}

impl TeamLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations recorded for `task`; empty when the task was never graded.
    pub fn get_task_annotations(&self, task: TaskId) -> &[Annotation] {
        self.tasks.get(&task).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Replace everything recorded for `task`.
    pub fn set_task_annotations(&mut self, task: TaskId, annotations: Vec<Annotation>) {
        self.tasks.insert(task, annotations);
    }

    /// Whether `task` has an entry at all (possibly an empty list).
    pub fn contains_task(&self, task: TaskId) -> bool {
        self.tasks.contains_key(&task)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaskId, &[Annotation])> {
        self.tasks.iter().map(|(task, list)| (*task, list.as_slice()))
    }

    /// Whether any task carries a non-inert annotation.
    pub fn has_annotations(&self) -> bool {
        self.tasks
            .values()
            .any(|list| list.iter().any(|a| !a.is_inert()))
    }

    /// Encode as the stored JSON blob.
    pub fn serialize(&self) -> String {
        // A map of integers to pairs of numbers/strings always encodes.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Decode a stored blob, failing on anything that is not a ledger.
    pub fn try_deserialize(blob: &str) -> Result<Self> {
        if blob.trim().is_empty() {
            return Ok(Self::new());
        }
        let ledger: TeamLedger = serde_json::from_str(blob)?;
        if ledger.tasks.contains_key(&0) {
            return Err(GradebookError::invalid_value("task id", 0));
        }
        Ok(ledger)
    }

    /// Decode a stored blob, treating empty or unreadable input as an empty ledger.
    pub fn deserialize(blob: &str) -> Self {
        match Self::try_deserialize(blob) {
            Ok(ledger) => ledger,
            Err(e) => {
                warn!(error = %e, "unreadable ledger blob, treating as ungraded");
                Self::new()
            }
        }
    }

    /// Task ids in this ledger that `known` does not contain.
    pub fn unknown_tasks<F>(&self, known: F) -> Vec<TaskId>
    where
        F: Fn(TaskId) -> bool,
    {
        self.task_ids().filter(|task| !known(*task)).collect()
    }
}

impl FromIterator<(TaskId, Vec<Annotation>)> for TeamLedger {
    fn from_iter<T: IntoIterator<Item = (TaskId, Vec<Annotation>)>>(iter: T) -> Self {
        Self {
            tasks: iter.into_iter().collect(),
        }
    }
}
