//! Gradebook Core Library
//!
//! Grading ledgers, the per-task score calculator, the ledger merge engine,
//! grading-file validation, roster storage and feedback rendering.

pub mod annotation;
pub mod config;
pub mod db;
pub mod error;
pub mod feedback;
pub mod grading_file;
pub mod ledger;
pub mod logging;
pub mod merge;
pub mod points;
pub mod render;
pub mod roster;
pub mod score;
