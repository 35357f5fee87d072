//! The line-oriented configuration format
//!
//! ```text
//! lecture=ssbi24
//! number=1
//! filepath=grading/ass1.csv
//! max_points={'1': 10, '2': 5}
//! number=2
//! filepath=grading/ass2.csv
//! max_points={'1': 6, '2': 4}
//! ```
//!
//! `number=`, `filepath=` and `max_points=` lines are collected into parallel
//! lists and paired by position, so their counts must agree. Optional
//! `total_points=` and `table=` lines are paired the same way when present.
//! `assignment_xlsx=` lines are accepted and ignored.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use super::types::{RawAssignment, RawConfig};
use crate::bail_config;
use crate::error::{GradebookError, Result};
use crate::points::Points;

/// One `'task': points` entry of a `max_points` dictionary literal.
const ENTRY_PATTERN: &str = r#"^\s*['"]?\s*([^'":]+?)\s*['"]?\s*:\s*(-?[0-9]+(?:\.[0-9]+)?)\s*$"#;

#[derive(Default)]
struct Columns {
    numbers: Vec<u32>,
    files: Vec<PathBuf>,
    tasks: Vec<BTreeMap<String, Points>>,
    totals: Vec<Points>,
    tables: Vec<String>,
}

/// Parse the line format into raw configuration values.
pub fn parse(content: &str, source: &Path) -> Result<RawConfig> {
    let entry = Regex::new(ENTRY_PATTERN)
        .map_err(|e| GradebookError::Other(format!("invalid max_points pattern: {}", e)))?;
    let mut config = RawConfig::default();
    let mut columns = Columns::default();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            bail_config!(source, "line {}: expected key=value", index + 1);
        };
        let value = value.trim();
        match key.trim() {
            "lecture" => config.lecture = value.to_string(),
            "database" => config.database = Some(PathBuf::from(value)),
            "placeholder" => config.placeholder = value.to_string(),
            "number" => match value.parse() {
                Ok(number) => columns.numbers.push(number),
                Err(_) => bail_config!(source, "line {}: invalid number {:?}", index + 1, value),
            },
            "filepath" => columns.files.push(PathBuf::from(value)),
            "max_points" => columns
                .tasks
                .push(parse_max_points(&entry, value, source, index + 1)?),
            "total_points" => match value.parse() {
                Ok(total) => columns.totals.push(total),
                Err(_) => bail_config!(source, "line {}: invalid total {:?}", index + 1, value),
            },
            "table" => columns.tables.push(value.to_string()),
            "assignment_xlsx" => debug!(file = value, "ignoring spreadsheet reference"),
            other => bail_config!(source, "line {}: unknown key {:?}", index + 1, other),
        }
    }

    let count = columns.numbers.len();
    if columns.files.len() != count || columns.tasks.len() != count {
        bail_config!(
            source,
            "configuration must contain equal numbers of assignment numbers ({}), filepaths ({}) and max_points ({})",
            count,
            columns.files.len(),
            columns.tasks.len()
        );
    }
    for (name, len) in [
        ("total_points", columns.totals.len()),
        ("table", columns.tables.len()),
    ] {
        if len != 0 && len != count {
            bail_config!(
                source,
                "{} lines must be given for every assignment or none ({} of {})",
                name,
                len,
                count
            );
        }
    }

    let mut totals = columns.totals.into_iter();
    let mut tables = columns.tables.into_iter();
    config.assignments = columns
        .numbers
        .into_iter()
        .zip(columns.files)
        .zip(columns.tasks)
        .map(|((number, file), max_points)| RawAssignment {
            number,
            grading_file: Some(file),
            table: tables.next(),
            max_points,
            total: totals.next(),
        })
        .collect();

    Ok(config)
}

/// Parse a `{'1': 10, '2': 5.5}` dictionary literal.
fn parse_max_points(
    entry_pattern: &Regex,
    value: &str,
    source: &Path,
    line: usize,
) -> Result<BTreeMap<String, Points>> {
    let Some(body) = value
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
    else {
        bail_config!(source, "line {}: max_points must be a {{...}} literal", line);
    };

    let mut tasks = BTreeMap::new();
    for entry in body.split(',').filter(|entry| !entry.trim().is_empty()) {
        let Some(captures) = entry_pattern.captures(entry) else {
            bail_config!(source, "line {}: cannot read max_points entry {:?}", line, entry.trim());
        };
        let points = captures[2].parse::<Points>()?;
        tasks.insert(captures[1].to_string(), points);
    }
    Ok(tasks)
}
