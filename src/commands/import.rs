//! `gradebook import` - replace an assignment's roster table
//!
//! Re-importing discards every ledger in the table, so a table that already
//! holds grading is only replaced with `--force`.

use crate::cli::{ImportArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use gradebook_core::bail_usage;
use gradebook_core::error::Result;
use gradebook_core::roster::load_roster;

/// Execute the import command
pub fn execute(ctx: &CommandContext, args: &ImportArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignment = config.assignment(args.assignment)?;
    let students = load_roster(&args.roster)?;
    let store = ctx.open_store(&config)?;

    if !args.force && store.has_table(&assignment.table)? {
        let graded = store
            .teams(&assignment.table)?
            .iter()
            .filter(|team| team.ledger().has_annotations())
            .count();
        if graded > 0 {
            bail_usage!(format!(
                "table {} already holds grading for {} team(s); pass --force to replace it",
                assignment.table, graded
            ));
        }
    }

    let count = store.replace_roster(&assignment.table, &students)?;
    let teams = store.teams(&assignment.table)?.len();

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "table": assignment.table,
                "students": count,
                "teams": teams,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Imported {} students in {} teams into {}.",
                    count, teams, assignment.table
                );
            }
        }
    }
    Ok(())
}
