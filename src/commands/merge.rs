//! `gradebook merge` - merge another tutor's roster database
//!
//! Every task the other tutor graded replaces the local annotations for that
//! task. Overwritten tasks are listed so conflicting edits do not go unseen.

use crate::cli::{MergeArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use gradebook_core::error::Result;

/// Execute the merge command
pub fn execute(ctx: &CommandContext, args: &MergeArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignment = config.assignment(args.assignment)?;
    let store = ctx.open_store(&config)?;

    let report = store.merge_from(&assignment.table, &args.other)?;

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "table": assignment.table,
                "other": args.other.display().to_string(),
                "merged": report
                    .merged
                    .iter()
                    .map(|m| serde_json::json!({
                        "team": m.team,
                        "added": m.added,
                        "overwritten": m.overwritten,
                    }))
                    .collect::<Vec<_>>(),
                "unknown_teams": report.unknown_teams,
                "unreadable": report.unreadable,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for merged in report.merged.iter().filter(|m| !m.overwritten.is_empty()) {
                eprintln!(
                    "warning: team {}: local annotations for tasks {:?} were replaced",
                    merged.team, merged.overwritten
                );
            }
            for team in &report.unknown_teams {
                eprintln!("warning: team {} is not in the local roster, skipped", team);
            }
            for team in &report.unreadable {
                eprintln!("warning: team {}: unreadable ledger treated as ungraded", team);
            }
            if !ctx.cli.quiet {
                println!(
                    "Merged {} team(s) from {}.",
                    report.merged.len(),
                    args.other.display()
                );
            }
        }
    }
    Ok(())
}
