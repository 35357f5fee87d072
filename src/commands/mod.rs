//! CLI commands for gradebook

pub mod check;
pub mod dispatch;
pub mod feedback;
pub mod grade;
pub mod import;
pub mod merge;
pub mod report;
pub mod show;

use gradebook_core::feedback::BatchOutcome;

use crate::cli::{Cli, OutputFormat};

/// Print the per-team problems of a batch to stderr.
///
/// In JSON mode they are part of the command's output document instead.
pub(crate) fn print_diagnostics(cli: &Cli, outcome: &BatchOutcome) {
    if cli.format == OutputFormat::Json {
        return;
    }
    for diagnostic in &outcome.diagnostics {
        eprintln!("warning: {}: {}", diagnostic.team, diagnostic.error);
    }
}

/// JSON form of a batch.
pub(crate) fn outcome_json(outcome: &BatchOutcome) -> serde_json::Value {
    serde_json::json!({
        "written": outcome
            .written
            .iter()
            .map(|path| path.display().to_string())
            .collect::<Vec<_>>(),
        "diagnostics": outcome
            .diagnostics
            .iter()
            .map(|d| d.to_json())
            .collect::<Vec<_>>(),
    })
}
