//! Flat scored table
//!
//! One row per task with the points reached, the points possible and the
//! tutor's comment, rendered as a markdown pipe table with a total line.
//! [`ScoredTable::render_checked`] refuses to produce a document that claims
//! more points than possible or still contains the placeholder marker.

use tracing::debug;

use crate::config::AssignmentSpec;
use crate::error::{GradebookError, Result};
use crate::grading_file::parse_cell;
use crate::ledger::{TaskId, TeamLedger};
use crate::points::Points;
use crate::score::remaining_points;

/// Tolerance for comparing summed decimal points.
const EPSILON: f64 = 1e-9;

/// One task line of a scored table.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRow {
    pub task: TaskId,
    pub reached: Points,
    pub max: Points,
    pub comment: String,
}

/// Scores of one team (or one name) across an assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredTable {
    pub team: String,
    pub rows: Vec<ScoredRow>,
}

impl ScoredTable {
    /// Build from the raw `<points>[:<comment>]` cells of a grading file row.
    ///
    /// Tasks without a cell are left at zero points with an empty comment.
    pub fn from_cells(
        team: &str,
        assignment: &AssignmentSpec,
        cells: &[(TaskId, String)],
    ) -> Result<Self> {
        let mut rows = Vec::with_capacity(assignment.task_count());
        for (task, max) in assignment.tasks() {
            let (reached, comment) = match cells.iter().find(|(cell_task, _)| *cell_task == task) {
                Some((_, cell)) => parse_cell(team, task, cell)?,
                None => (Points::ZERO, String::new()),
            };
            rows.push(ScoredRow {
                task,
                reached,
                max,
                comment,
            });
        }
        Ok(Self {
            team: team.to_string(),
            rows,
        })
    }

    /// Build from a stored ledger using the score calculator.
    ///
    /// Comments of all annotations of a task are joined with newlines.
    pub fn from_ledger(team: &str, assignment: &AssignmentSpec, ledger: &TeamLedger) -> Self {
        let rows = assignment
            .tasks()
            .map(|(task, max)| {
                let annotations = ledger.get_task_annotations(task);
                let comment = annotations
                    .iter()
                    .filter_map(|annotation| annotation.comment.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n");
                ScoredRow {
                    task,
                    reached: remaining_points(max, annotations),
                    max,
                    comment,
                }
            })
            .collect();
        Self {
            team: team.to_string(),
            rows,
        }
    }

    pub fn reached_total(&self) -> Points {
        self.rows.iter().map(|row| row.reached).sum()
    }

    pub fn max_total(&self) -> Points {
        self.rows.iter().map(|row| row.max).sum()
    }

    /// Render without any checks.
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str("| task | points_reached | points_max | comment |\n");
        output.push_str("|-----:|---------------:|-----------:|:--------|\n");
        for row in &self.rows {
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                row.task,
                row.reached,
                row.max,
                escape_cell(&row.comment)
            ));
        }
        output.push_str(&format!(
            "\nTotal points reached: {} of {}\n",
            self.reached_total(),
            self.max_total()
        ));
        output
    }

    /// Render, withholding the document on an overrun or a leftover placeholder.
    pub fn render_checked(&self, placeholder: &str) -> Result<String> {
        let reached = self.reached_total();
        let max = self.max_total();
        if reached.value() > max.value() + EPSILON {
            return Err(GradebookError::ScoreOverrun {
                team: self.team.clone(),
                reached,
                max,
            });
        }
        let output = self.render();
        if !placeholder.is_empty() && output.contains(placeholder) {
            return Err(GradebookError::UnresolvedPlaceholder {
                team: self.team.clone(),
                marker: placeholder.to_string(),
            });
        }
        debug!(team = %self.team, reached = %reached, max = %max, "rendered scored table");
        Ok(output)
    }
}

/// Keep a comment inside one table cell.
fn escape_cell(text: &str) -> String {
    text.trim()
        .replace('|', "\\|")
        .replace("\r\n", "\n")
        .replace('\n', "<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::Annotation;

    fn assignment() -> AssignmentSpec {
        AssignmentSpec::from_max_points(1, [(1, 10.0), (2, 5.0)]).unwrap()
    }

    fn cells(first: &str, second: &str) -> Vec<(TaskId, String)> {
        vec![(1, first.to_string()), (2, second.to_string())]
    }

    #[test]
    fn test_render_from_cells() {
        let table =
            ScoredTable::from_cells("Ada", &assignment(), &cells("7:missing case|see tests", "5"))
                .unwrap();
        let text = table.render_checked("TODO").unwrap();
        assert!(text.contains("| 1 | 7 | 10 | missing case<br>see tests |"));
        assert!(text.contains("| 2 | 5 | 5 |  |"));
        assert!(text.ends_with("Total points reached: 12 of 15\n"));
    }

    #[test]
    fn test_non_numeric_cell() {
        let err = ScoredTable::from_cells("Ada", &assignment(), &cells("seven", "5")).unwrap_err();
        assert!(matches!(err, GradebookError::NonNumericScore { ref team, .. } if team == "Ada"));
    }

    #[test]
    fn test_overrun_is_withheld() {
        let table = ScoredTable::from_cells("Ada", &assignment(), &cells("11", "5")).unwrap();
        let err = table.render_checked("TODO").unwrap_err();
        assert!(matches!(err, GradebookError::ScoreOverrun { .. }));
        assert!(err.is_per_team());
    }

    #[test]
    fn test_single_task_overrun_within_total_passes() {
        // Only the summed totals are compared.
        let table = ScoredTable::from_cells("Ada", &assignment(), &cells("4", "6")).unwrap();
        assert!(table.render_checked("TODO").is_ok());
    }

    #[test]
    fn test_placeholder_is_withheld() {
        let table = ScoredTable::from_cells("Ada", &assignment(), &cells("7:TODO explain", "5"))
            .unwrap();
        let err = table.render_checked("TODO").unwrap_err();
        assert!(matches!(err, GradebookError::UnresolvedPlaceholder { .. }));
        assert!(table.render_checked("FIXME").is_ok());
    }

    #[test]
    fn test_from_ledger_joins_comments() {
        let ledger: TeamLedger = vec![(
            1,
            vec![
                Annotation::penalty(-3, "missing edge case"),
                Annotation::blank(),
                Annotation::remark("otherwise clean"),
            ],
        )]
        .into_iter()
        .collect();
        let table = ScoredTable::from_ledger("7", &assignment(), &ledger);
        assert_eq!(table.rows[0].reached, Points::new(7.0));
        assert_eq!(table.rows[0].comment, "missing edge case\notherwise clean");
        assert_eq!(table.rows[1].reached, Points::new(5.0));
        assert_eq!(table.reached_total(), Points::new(12.0));
    }

    #[test]
    fn test_pipe_in_comment_is_escaped() {
        let table = ScoredTable {
            team: "7".into(),
            rows: vec![ScoredRow {
                task: 1,
                reached: Points::new(1.0),
                max: Points::new(1.0),
                comment: "a | b".into(),
            }],
        };
        assert!(table.render().contains("a \\| b"));
    }
}
