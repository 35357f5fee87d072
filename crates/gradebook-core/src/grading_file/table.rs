//! Loading a sanity-checked grading file into rows of raw cells

use std::collections::HashSet;
use std::path::Path;

use super::sanity::{check_field_counts, lines, split_fields};
use crate::config::AssignmentSpec;
use crate::error::{GradebookError, Result};
use crate::ledger::TaskId;
use crate::points::Points;

/// Marks an explicit line break inside a comment cell.
const LINE_BREAK: char = '|';

/// One row of a grading file: the names it applies to and a cell per task.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRow {
    /// 1-based line number in the file
    pub line: usize,
    pub names: Vec<String>,
    pub cells: Vec<(TaskId, String)>,
}

impl GradingRow {
    /// Label used in diagnostics.
    pub fn label(&self) -> String {
        self.names.join(", ")
    }
}

/// A grading file whose columns have been matched to an assignment's tasks.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingTable {
    pub columns: Vec<TaskId>,
    pub rows: Vec<GradingRow>,
}

impl GradingTable {
    /// Load a grading file from disk.
    pub fn load(path: &Path, assignment: &AssignmentSpec) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GradebookError::io_operation("read grading file", path.display(), e))?;
        Self::parse(&text, assignment, path)
    }

    /// Parse grading file text. `path` is only used in error messages.
    pub fn parse(text: &str, assignment: &AssignmentSpec, path: &Path) -> Result<Self> {
        // Name column plus one column per task.
        check_field_counts(text, assignment.task_count() + 1, path)?;

        let mut content = lines(text).filter(|(_, line)| !line.trim().is_empty());

        let Some((_, header)) = content.next() else {
            return Err(GradebookError::config_mismatch(
                path,
                "grading file is empty",
            ));
        };
        let columns = parse_header(header, assignment, path)?;

        let rows = content
            .map(|(index, line)| {
                let mut fields = split_fields(line).into_iter();
                let names = fields
                    .next()
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                GradingRow {
                    line: index + 1,
                    names,
                    cells: columns.iter().copied().zip(fields).collect(),
                }
            })
            .collect();

        Ok(Self { columns, rows })
    }
}

fn parse_header(header: &str, assignment: &AssignmentSpec, path: &Path) -> Result<Vec<TaskId>> {
    let mut seen = HashSet::new();
    split_fields(header)
        .into_iter()
        .skip(1)
        .map(|field| {
            let task = field
                .trim()
                .parse::<TaskId>()
                .ok()
                .filter(|task| assignment.contains_task(*task))
                .ok_or_else(|| {
                    GradebookError::config_mismatch(
                        path,
                        format!(
                            "column {:?} is not a task of assignment {}",
                            field.trim(),
                            assignment.number
                        ),
                    )
                })?;
            if !seen.insert(task) {
                return Err(GradebookError::config_mismatch(
                    path,
                    format!("task {} appears in more than one column", task),
                ));
            }
            Ok(task)
        })
        .collect()
}

/// Split a `<points>[:<comment>]` cell into reached points and comment text.
pub fn parse_cell(team: &str, task: TaskId, cell: &str) -> Result<(Points, String)> {
    let (points, comment) = match cell.split_once(':') {
        Some((points, comment)) => (points, comment),
        None => (cell, ""),
    };
    let points = points
        .parse::<Points>()
        .map_err(|_| GradebookError::NonNumericScore {
            team: team.to_string(),
            task: task.to_string(),
            value: points.trim().to_string(),
        })?;
    Ok((points, comment.replace(LINE_BREAK, "\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AssignmentSpec;

    fn assignment() -> AssignmentSpec {
        AssignmentSpec::from_max_points(1, [(1, 10.0), (2, 5.0)]).unwrap()
    }

    #[test]
    fn test_parse_rows_and_name_groups() {
        let text = "names,1,2\n\"Ada,Grace\",\"8:good, mostly|see notes\",5\nAlan,10,4:late\n";
        let table = GradingTable::parse(text, &assignment(), Path::new("ass1.csv")).unwrap();

        assert_eq!(table.columns, vec![1, 2]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].names, vec!["Ada", "Grace"]);
        assert_eq!(table.rows[0].line, 2);
        assert_eq!(
            table.rows[0].cells[0],
            (1, "8:good, mostly|see notes".to_string())
        );
        assert_eq!(table.rows[1].names, vec!["Alan"]);
    }

    #[test]
    fn test_columns_may_be_reordered() {
        let text = "names,2,1\nAda,5,10\n";
        let table = GradingTable::parse(text, &assignment(), Path::new("x.csv")).unwrap();
        assert_eq!(table.columns, vec![2, 1]);
        assert_eq!(table.rows[0].cells[0], (2, "5".to_string()));
    }

    #[test]
    fn test_unknown_column_is_config_mismatch() {
        let text = "names,1,3\nAda,5,10\n";
        let err = GradingTable::parse(text, &assignment(), Path::new("x.csv")).unwrap_err();
        assert!(matches!(err, GradebookError::ConfigMismatch { .. }));
    }

    #[test]
    fn test_wrong_field_count_is_malformed() {
        let text = "names,1,2\nAda,5:a, b,10\n";
        let err = GradingTable::parse(text, &assignment(), Path::new("ass2_grading.csv"))
            .unwrap_err();
        assert!(matches!(err, GradebookError::MalformedRow { line: 2, .. }));
        assert!(err.to_string().contains("ass2_grading.csv"));
    }

    #[test]
    fn test_parse_cell() {
        let (points, comment) = parse_cell("Ada", 1, "7.5:missing case|see tests").unwrap();
        assert_eq!(points, Points::new(7.5));
        assert_eq!(comment, "missing case\nsee tests");

        let (points, comment) = parse_cell("Ada", 1, "10").unwrap();
        assert_eq!(points, Points::new(10.0));
        assert!(comment.is_empty());

        let err = parse_cell("Ada", 2, "TODO:check").unwrap_err();
        assert!(matches!(err, GradebookError::NonNumericScore { .. }));
    }
}
