//! Delimited grading files
//!
//! A grading file has one row per team (or group of names) and one column per
//! task. Free-text comments may contain commas, so every line is checked for
//! the expected field count before the table is loaded; a miscount means the
//! task-to-column alignment cannot be trusted.

mod sanity;
mod table;

pub(crate) use sanity::lines;
pub use sanity::{check_field_counts, count_fields, split_fields};
pub use table::{parse_cell, GradingRow, GradingTable};
