//! Error types and exit codes for gradebook
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args)
//! - 3: Data error (configuration, grading file, roster store)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

use crate::points::Points;

/// Exit codes for the gradebook binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - bad configuration, grading file or roster store (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<rusqlite::Error> for GradebookError {
    fn from(err: rusqlite::Error) -> Self {
        GradebookError::Other(err.to_string())
    }
}

/// Errors that can occur during gradebook operations
#[derive(Error, Debug)]
pub enum GradebookError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("configuration mismatch in {path:?}: {reason}")]
    ConfigMismatch { path: PathBuf, reason: String },

    #[error(
        "found {found}, not the expected {expected}, number of fields in line {line} of {path:?} (fields: {fields:?})"
    )]
    MalformedRow {
        path: PathBuf,
        line: usize,
        found: usize,
        expected: usize,
        fields: Vec<String>,
    },

    #[error("non-numeric score {value:?} for {team} in task {task}")]
    NonNumericScore {
        team: String,
        task: String,
        value: String,
    },

    #[error("total points reached by {team} ({reached}) exceed the points intended ({max})")]
    ScoreOverrun {
        team: String,
        reached: Points,
        max: Points,
    },

    #[error("found unresolved placeholder {marker:?} in feedback for {team}")]
    UnresolvedPlaceholder { team: String, marker: String },

    #[error("ledger of {team} contains task {task}, which assignment {assignment} does not define")]
    UnknownTask {
        team: String,
        task: u32,
        assignment: u32,
    },

    #[error("feedback for {team} would overwrite {path:?}, already written in this run")]
    DuplicateDocument { team: String, path: PathBuf },

    #[error("{context} not found: {value}")]
    NotFound { context: String, value: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),
}

impl GradebookError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        GradebookError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        GradebookError::FailedOperation {
            operation: format!("{} {}", operation, path),
            reason: error.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        GradebookError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for an entity that was not found
    pub fn not_found(context: &str, value: impl std::fmt::Display) -> Self {
        GradebookError::NotFound {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create a configuration mismatch for the given file
    pub fn config_mismatch(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        GradebookError::ConfigMismatch {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error only affects a single team's document.
    ///
    /// Everything else aborts the run.
    pub fn is_per_team(&self) -> bool {
        matches!(
            self,
            GradebookError::NonNumericScore { .. }
                | GradebookError::ScoreOverrun { .. }
                | GradebookError::UnresolvedPlaceholder { .. }
                | GradebookError::UnknownTask { .. }
                | GradebookError::DuplicateDocument { .. }
        )
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            GradebookError::UsageError(_)
            | GradebookError::InvalidValue { .. } => ExitCode::Usage,

            GradebookError::ConfigMismatch { .. }
            | GradebookError::MalformedRow { .. }
            | GradebookError::NonNumericScore { .. }
            | GradebookError::ScoreOverrun { .. }
            | GradebookError::UnresolvedPlaceholder { .. }
            | GradebookError::UnknownTask { .. }
            | GradebookError::DuplicateDocument { .. }
            | GradebookError::NotFound { .. } => ExitCode::Data,

            GradebookError::Io(_)
            | GradebookError::Json(_)
            | GradebookError::Toml(_)
            | GradebookError::FailedOperation { .. }
            | GradebookError::Other(_) => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            GradebookError::UsageError(_) => "usage_error",
            GradebookError::InvalidValue { .. } => "invalid_value",
            GradebookError::ConfigMismatch { .. } => "config_mismatch",
            GradebookError::MalformedRow { .. } => "malformed_row",
            GradebookError::NonNumericScore { .. } => "non_numeric_score",
            GradebookError::ScoreOverrun { .. } => "score_overrun",
            GradebookError::UnresolvedPlaceholder { .. } => "unresolved_placeholder",
            GradebookError::UnknownTask { .. } => "unknown_task",
            GradebookError::DuplicateDocument { .. } => "duplicate_document",
            GradebookError::NotFound { .. } => "not_found",
            GradebookError::Io(_) => "io_error",
            GradebookError::Json(_) => "json_error",
            GradebookError::Toml(_) => "toml_error",
            GradebookError::FailedOperation { .. } => "failed_operation",
            GradebookError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for gradebook operations
pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            GradebookError::UsageError("x".into()).exit_code(),
            ExitCode::Usage
        );
        assert_eq!(
            GradebookError::config_mismatch("a.toml", "bad").exit_code(),
            ExitCode::Data
        );
        assert_eq!(
            GradebookError::Other("boom".into()).exit_code(),
            ExitCode::Failure
        );
    }

    #[test]
    fn test_malformed_row_message_names_line() {
        let err = GradebookError::MalformedRow {
            path: PathBuf::from("data/ass2_grading.csv"),
            line: 2,
            found: 3,
            expected: 4,
            fields: vec!["a".into(), "\"b".into(), "c\"".into(), "d".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("expected 4"));
        assert!(msg.contains("ass2_grading.csv"));
    }

    #[test]
    fn test_per_team_errors() {
        let overrun = GradebookError::ScoreOverrun {
            team: "7".into(),
            reached: Points::new(16.0),
            max: Points::new(15.0),
        };
        assert!(overrun.is_per_team());
        assert!(!GradebookError::config_mismatch("c", "r").is_per_team());
    }

    #[test]
    fn test_to_json_shape() {
        let err = GradebookError::not_found("team", "42");
        let json = err.to_json();
        assert_eq!(json["error"]["type"], "not_found");
        assert_eq!(json["error"]["code"], 3);
        assert_eq!(json["error"]["message"], "team not found: 42");
    }
}
