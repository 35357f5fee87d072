//! Lecture configuration
//!
//! A lecture has one or more assignments. Each assignment defines its tasks
//! (ids contiguous from 1) with their maximum points, the grading file used for
//! batch feedback, and the roster table tutors grade into.
//!
//! Two file formats are read: TOML, and the older `key=value` line format
//! (see [`legacy`]). Both are validated the same way at load time so that a
//! bad configuration fails before any output is written.

pub mod legacy;
pub mod types;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bail_config;
use crate::error::{GradebookError, Result};
use crate::ledger::TaskId;
use crate::points::Points;

pub use types::{RawAssignment, RawConfig, DEFAULT_PLACEHOLDER};

/// Tolerance when comparing configured totals.
const TOTAL_EPSILON: f64 = 1e-9;

/// One assignment: ordered task maxima and where its data lives.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentSpec {
    pub number: u32,
    pub grading_file: Option<PathBuf>,
    pub table: String,
    max_points: BTreeMap<TaskId, Points>,
    total: Points,
}

impl AssignmentSpec {
    /// Build and validate an assignment from raw configuration values.
    ///
    /// `source` names the configuration file in error messages.
    pub fn from_raw(raw: RawAssignment, source: &Path) -> Result<Self> {
        if raw.number == 0 {
            bail_config!(source, "assignment numbers start at 1");
        }
        if raw.max_points.is_empty() {
            bail_config!(source, "assignment {} defines no tasks", raw.number);
        }

        let mut max_points = BTreeMap::new();
        for (key, points) in &raw.max_points {
            let task = match key.trim().parse::<TaskId>() {
                Ok(task) if task > 0 => task,
                _ => bail_config!(
                    source,
                    "assignment {}: task id {:?} is not a positive integer",
                    raw.number,
                    key
                ),
            };
            if points.value() <= 0.0 {
                bail_config!(
                    source,
                    "assignment {}: task {} has non-positive max points {}",
                    raw.number,
                    task,
                    points
                );
            }
            if max_points.insert(task, *points).is_some() {
                bail_config!(source, "assignment {}: task {} defined twice", raw.number, task);
            }
        }

        // Contiguous from 1: the n-th smallest id must be n.
        if let Some((position, task)) = max_points
            .keys()
            .enumerate()
            .find(|(position, task)| **task as usize != position + 1)
        {
            bail_config!(
                source,
                "assignment {}: task ids must be contiguous from 1, found task {} at position {}",
                raw.number,
                task,
                position + 1
            );
        }

        let sum: Points = max_points.values().copied().sum();
        let total = match raw.total {
            Some(total) if (total.value() - sum.value()).abs() > TOTAL_EPSILON => {
                bail_config!(
                    source,
                    "assignment {}: tasks sum to {} points but the total is configured as {}",
                    raw.number,
                    sum,
                    total
                )
            }
            Some(total) => total,
            None => sum,
        };

        Ok(Self {
            number: raw.number,
            grading_file: raw.grading_file,
            table: raw
                .table
                .unwrap_or_else(|| format!("ass{}", raw.number)),
            max_points,
            total,
        })
    }

    /// Convenience constructor from `(task, max)` pairs.
    pub fn from_max_points<I>(number: u32, tasks: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TaskId, f64)>,
    {
        let raw = RawAssignment {
            number,
            max_points: tasks
                .into_iter()
                .map(|(task, max)| (task.to_string(), Points::new(max)))
                .collect(),
            ..Default::default()
        };
        Self::from_raw(raw, Path::new("<inline>"))
    }

    pub fn task_count(&self) -> usize {
        self.max_points.len()
    }

    pub fn contains_task(&self, task: TaskId) -> bool {
        self.max_points.contains_key(&task)
    }

    pub fn max_points(&self, task: TaskId) -> Option<Points> {
        self.max_points.get(&task).copied()
    }

    /// Tasks in id order with their maximum points.
    pub fn tasks(&self) -> impl Iterator<Item = (TaskId, Points)> + '_ {
        self.max_points.iter().map(|(task, max)| (*task, *max))
    }

    /// Fixed total the overall score is advertised against.
    pub fn total(&self) -> Points {
        self.total
    }
}

/// Validated configuration for one lecture.
#[derive(Debug, Clone, PartialEq)]
pub struct LectureConfig {
    pub lecture: String,
    pub placeholder: String,
    pub assignments: Vec<AssignmentSpec>,
    database: PathBuf,
    source: PathBuf,
}

impl LectureConfig {
    /// Load a configuration file, choosing the format by extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| GradebookError::io_operation("read configuration", path.display(), e))?;
        let raw = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str::<RawConfig>(&content)?
        } else {
            legacy::parse(&content, path)?
        };
        Self::from_raw(raw, path)
    }

    /// Validate raw values. Relative paths resolve against `source`'s directory.
    pub fn from_raw(raw: RawConfig, source: &Path) -> Result<Self> {
        let base = source.parent().unwrap_or(Path::new(""));
        let resolve = |p: PathBuf| if p.is_absolute() { p } else { base.join(p) };

        if raw.placeholder.is_empty() {
            bail_config!(source, "placeholder marker must not be empty");
        }

        let mut assignments: Vec<AssignmentSpec> = Vec::with_capacity(raw.assignments.len());
        for raw_assignment in raw.assignments {
            let mut assignment = AssignmentSpec::from_raw(raw_assignment, source)?;
            if assignments.iter().any(|a| a.number == assignment.number) {
                bail_config!(source, "assignment {} defined twice", assignment.number);
            }
            assignment.grading_file = assignment.grading_file.map(&resolve);
            assignments.push(assignment);
        }
        if assignments.is_empty() {
            bail_config!(source, "no assignments configured");
        }

        let database = resolve(
            raw.database
                .unwrap_or_else(|| PathBuf::from(format!("{}.sqlite3", raw.lecture))),
        );

        debug!(
            lecture = %raw.lecture,
            assignments = assignments.len(),
            database = %database.display(),
            "loaded configuration"
        );

        Ok(Self {
            lecture: raw.lecture,
            placeholder: raw.placeholder,
            assignments,
            database,
            source: source.to_path_buf(),
        })
    }

    /// Look up an assignment by number.
    pub fn assignment(&self, number: u32) -> Result<&AssignmentSpec> {
        self.assignments
            .iter()
            .find(|a| a.number == number)
            .ok_or_else(|| GradebookError::not_found("assignment", number))
    }

    /// Roster database path.
    pub fn database(&self) -> &Path {
        &self.database
    }

    /// File this configuration was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    const TOML_CONFIG: &str = r#"
lecture = "ssbi24"

[[assignments]]
number = 1
grading_file = "grading/ass1.csv"
max_points = { 1 = 10, 2 = 5 }

[[assignments]]
number = 2
table = "Sheet2"
total = 20
max_points = { 1 = 12.5, 2 = 7.5 }
"#;

    fn load_toml(content: &str) -> Result<LectureConfig> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gradebook.toml");
        fs::File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        LectureConfig::load(&path)
    }

    #[test]
    fn test_load_toml() {
        let config = load_toml(TOML_CONFIG).unwrap();
        assert_eq!(config.lecture, "ssbi24");
        assert_eq!(config.placeholder, DEFAULT_PLACEHOLDER);
        assert!(config.database().ends_with("ssbi24.sqlite3"));

        let first = config.assignment(1).unwrap();
        assert_eq!(first.table, "ass1");
        assert_eq!(first.total(), Points::new(15.0));
        assert!(first
            .grading_file
            .as_ref()
            .unwrap()
            .ends_with("grading/ass1.csv"));
        assert_eq!(
            first.tasks().collect::<Vec<_>>(),
            vec![(1, Points::new(10.0)), (2, Points::new(5.0))]
        );

        let second = config.assignment(2).unwrap();
        assert_eq!(second.table, "Sheet2");
        assert_eq!(second.total(), Points::new(20.0));
        assert!(config.assignment(3).is_err());
    }

    #[test]
    fn test_total_must_match_sum() {
        let err = load_toml(
            "[[assignments]]\nnumber = 1\ntotal = 100\nmax_points = { 1 = 10, 2 = 5 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, GradebookError::ConfigMismatch { .. }));
        assert!(err.to_string().contains("100"));
    }

    #[test]
    fn test_task_ids_must_be_contiguous() {
        let err =
            AssignmentSpec::from_max_points(1, [(1, 10.0), (3, 5.0)]).unwrap_err();
        assert!(err.to_string().contains("contiguous"));

        let err = AssignmentSpec::from_max_points(1, [(2, 10.0)]).unwrap_err();
        assert!(matches!(err, GradebookError::ConfigMismatch { .. }));
    }

    #[test]
    fn test_non_numeric_task_id_rejected() {
        let err = load_toml("[[assignments]]\nnumber = 1\nmax_points = { a = 10 }\n").unwrap_err();
        assert!(err.to_string().contains("positive integer"));
    }

    #[test]
    fn test_non_positive_max_rejected() {
        let err = AssignmentSpec::from_max_points(1, [(1, 0.0)]).unwrap_err();
        assert!(err.to_string().contains("non-positive"));
    }

    #[test]
    fn test_duplicate_assignment_rejected() {
        let err = load_toml(
            "[[assignments]]\nnumber = 1\nmax_points = { 1 = 1 }\n[[assignments]]\nnumber = 1\nmax_points = { 1 = 1 }\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("defined twice"));
    }

    #[test]
    fn test_ten_tasks_sort_numerically() {
        let tasks: Vec<(TaskId, f64)> = (1..=10).map(|t| (t, 1.0)).collect();
        let spec = AssignmentSpec::from_max_points(1, tasks).unwrap();
        assert_eq!(spec.tasks().last().unwrap().0, 10);
        assert_eq!(spec.total(), Points::new(10.0));
    }
}
