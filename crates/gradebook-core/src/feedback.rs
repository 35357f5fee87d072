//! Writing feedback documents for a whole batch of teams
//!
//! A problem with one team's data never stops the batch: the team's document
//! is withheld and a [`Diagnostic`] is recorded. Only I/O failures abort.
//! Two names that map to the same file name are such a problem: the first
//! document is kept.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, warn};

use crate::config::AssignmentSpec;
use crate::error::{GradebookError, Result};
use crate::grading_file::GradingTable;
use crate::render::{file_slug, ScoredTable, TeamReport};
use crate::roster::Team;
use crate::trace_time;

/// A non-fatal problem with one team's document.
#[derive(Debug)]
pub struct Diagnostic {
    pub team: String,
    pub error: GradebookError,
}

impl Diagnostic {
    fn new(team: impl Into<String>, error: GradebookError) -> Self {
        let team = team.into();
        warn!(team = %team, kind = error.error_type(), "{}", error);
        Self { team, error }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "team": self.team,
            "type": self.error.error_type(),
            "message": self.error.to_string(),
        })
    }
}

/// Documents written and problems found in one batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BatchOutcome {
    pub fn extend(&mut self, other: BatchOutcome) {
        self.written.extend(other.written);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Write one document unless this batch already wrote to `path`.
    fn write(
        &mut self,
        seen: &mut HashSet<PathBuf>,
        team: &str,
        path: PathBuf,
        content: &str,
    ) -> Result<()> {
        if !seen.insert(path.clone()) {
            return self.record(team, GradebookError::DuplicateDocument {
                team: team.to_string(),
                path,
            });
        }
        write_document(&path, content)?;
        self.written.push(path);
        Ok(())
    }

    /// Record a per-team error, or hand back anything more serious.
    fn record(&mut self, team: &str, error: GradebookError) -> Result<()> {
        if error.is_per_team() {
            self.diagnostics.push(Diagnostic::new(team, error));
            Ok(())
        } else {
            Err(error)
        }
    }
}

/// `<out>/ass<n>/<lecture>_ass<n>_feedback_<name>.md`
pub fn flat_feedback_path(out_dir: &Path, lecture: &str, assignment: u32, name: &str) -> PathBuf {
    out_dir.join(format!("ass{}", assignment)).join(format!(
        "{}_ass{}_feedback_{}.md",
        lecture,
        assignment,
        file_slug(name)
    ))
}

/// `<out>/<team>_<last names>.md`
pub fn report_path(out_dir: &Path, team: &Team) -> PathBuf {
    out_dir.join(format!(
        "{}_{}.md",
        file_slug(&team.key),
        file_slug(&team.last_names().join(" "))
    ))
}

fn write_document(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| GradebookError::io_operation("create directory", parent.display(), e))?;
    }
    fs::write(path, content)
        .map_err(|e| GradebookError::io_operation("write feedback", path.display(), e))
}

/// Write one flat scored document per name of every row of a grading file.
pub fn write_flat_feedback(
    table: &GradingTable,
    assignment: &AssignmentSpec,
    lecture: &str,
    placeholder: &str,
    out_dir: &Path,
) -> Result<BatchOutcome> {
    let start = Instant::now();
    let mut outcome = BatchOutcome::default();
    let mut seen = HashSet::new();

    for row in &table.rows {
        if row.names.is_empty() {
            warn!(line = row.line, "grading file row has no names, skipping");
            continue;
        }
        for name in &row.names {
            let rendered = ScoredTable::from_cells(name, assignment, &row.cells)
                .and_then(|scored| scored.render_checked(placeholder));
            match rendered {
                Ok(content) => {
                    let path = flat_feedback_path(out_dir, lecture, assignment.number, name);
                    outcome.write(&mut seen, name, path, &content)?;
                }
                Err(e) => outcome.record(name, e)?,
            }
        }
    }

    info!(
        assignment = assignment.number,
        written = outcome.written.len(),
        withheld = outcome.diagnostics.len(),
        "wrote flat feedback"
    );
    trace_time!(start, "write_flat_feedback");
    Ok(outcome)
}

/// Write the structured report of every team.
///
/// Ledger tasks the assignment does not define are reported; the report is
/// written regardless.
pub fn write_reports(
    teams: &[Team],
    assignment: &AssignmentSpec,
    out_dir: &Path,
) -> Result<BatchOutcome> {
    let start = Instant::now();
    let mut outcome = BatchOutcome::default();
    let mut seen = HashSet::new();

    for team in teams {
        let ledger = team.ledger();
        let report = TeamReport::new(assignment, &team.key, team.member_names(), &ledger);
        for task in report.unknown_tasks() {
            outcome.record(
                &team.key,
                GradebookError::UnknownTask {
                    team: team.key.clone(),
                    task,
                    assignment: assignment.number,
                },
            )?;
        }
        outcome.write(&mut seen, &team.key, report_path(out_dir, team), &report.render())?;
    }

    info!(
        assignment = assignment.number,
        written = outcome.written.len(),
        "wrote reports"
    );
    trace_time!(start, "write_reports");
    Ok(outcome)
}

/// Write a flat scored table for every team, scored from its stored ledger.
///
/// Documents are named like flat feedback, after the team key and the members'
/// last names.
pub fn write_ledger_tables(
    teams: &[Team],
    assignment: &AssignmentSpec,
    lecture: &str,
    placeholder: &str,
    out_dir: &Path,
) -> Result<BatchOutcome> {
    let start = Instant::now();
    let mut outcome = BatchOutcome::default();
    let mut seen = HashSet::new();

    for team in teams {
        let ledger = team.ledger();
        let report = TeamReport::new(assignment, &team.key, team.member_names(), &ledger);
        for task in report.unknown_tasks() {
            outcome.record(
                &team.key,
                GradebookError::UnknownTask {
                    team: team.key.clone(),
                    task,
                    assignment: assignment.number,
                },
            )?;
        }
        let rendered =
            ScoredTable::from_ledger(&team.key, assignment, &ledger).render_checked(placeholder);
        match rendered {
            Ok(content) => {
                let name = format!("{} {}", team.key, team.last_names().join(" "));
                let path = flat_feedback_path(out_dir, lecture, assignment.number, &name);
                outcome.write(&mut seen, &team.key, path, &content)?;
            }
            Err(e) => outcome.record(&team.key, e)?,
        }
    }

    info!(
        assignment = assignment.number,
        written = outcome.written.len(),
        withheld = outcome.diagnostics.len(),
        "wrote flat tables from ledgers"
    );
    trace_time!(start, "write_ledger_tables");
    Ok(outcome)
}
