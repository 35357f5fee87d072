//! Error macros for gradebook

/// Macro for creating invalid value errors
#[macro_export]
macro_rules! bail_invalid {
    ($context:expr, $value:expr) => {
        return Err($crate::error::GradebookError::invalid_value($context, $value))
    };
}

/// Macro for creating usage errors
#[macro_export]
macro_rules! bail_usage {
    ($msg:expr) => {
        return Err($crate::error::GradebookError::UsageError($msg.to_string()))
    };
}

/// Macro for creating configuration mismatch errors
#[macro_export]
macro_rules! bail_config {
    ($path:expr, $($arg:tt)*) => {
        return Err($crate::error::GradebookError::config_mismatch($path, format!($($arg)*)))
    };
}

/// Macro for mapping database errors
#[macro_export]
macro_rules! map_db_err {
    ($op:expr, $error:expr) => {
        $crate::error::GradebookError::db_operation($op, $error)
    };
}
