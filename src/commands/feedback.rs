//! `gradebook feedback` - flat feedback documents from grading files
//!
//! Each assignment's grading file is checked and loaded; a malformed file
//! aborts the run. A missing file is reported and the next assignment is
//! processed.

use crate::cli::{FeedbackArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use crate::commands::{outcome_json, print_diagnostics};
use gradebook_core::error::Result;
use gradebook_core::feedback::{write_flat_feedback, BatchOutcome};
use gradebook_core::grading_file::GradingTable;

/// Execute the feedback command
pub fn execute(ctx: &CommandContext, args: &FeedbackArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignments = match args.assignment {
        Some(number) => vec![config.assignment(number)?],
        None => config.assignments.iter().collect(),
    };

    let mut outcome = BatchOutcome::default();
    let mut missing = Vec::new();
    for assignment in assignments {
        let Some(path) = &assignment.grading_file else {
            continue;
        };
        if !path.exists() {
            tracing::warn!(path = %path.display(), "grading file not found");
            missing.push(path.display().to_string());
            continue;
        }
        let table = GradingTable::load(path, assignment)?;
        outcome.extend(write_flat_feedback(
            &table,
            assignment,
            &config.lecture,
            &config.placeholder,
            &args.out,
        )?);
    }
    print_diagnostics(ctx.cli, &outcome);

    match ctx.cli.format {
        OutputFormat::Json => {
            let mut output = outcome_json(&outcome);
            output["missing"] = serde_json::json!(missing);
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for path in &missing {
                eprintln!("warning: could not find {}", path);
            }
            if !ctx.cli.quiet {
                println!(
                    "Wrote {} feedback document(s) to {}.",
                    outcome.written.len(),
                    args.out.display()
                );
            }
        }
    }
    Ok(())
}
