//! `gradebook report` - structured report (or flat scored table) for every team

use crate::cli::{OutputFormat, ReportArgs};
use crate::commands::dispatch::CommandContext;
use crate::commands::{outcome_json, print_diagnostics};
use gradebook_core::error::Result;
use gradebook_core::feedback::{write_ledger_tables, write_reports};

/// Execute the report command
pub fn execute(ctx: &CommandContext, args: &ReportArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignment = config.assignment(args.assignment)?;
    let store = ctx.open_store(&config)?;

    let teams = store.teams(&assignment.table)?;
    let outcome = if args.flat {
        write_ledger_tables(
            &teams,
            assignment,
            &config.lecture,
            &config.placeholder,
            &args.out,
        )?
    } else {
        write_reports(&teams, assignment, &args.out)?
    };
    print_diagnostics(ctx.cli, &outcome);

    match ctx.cli.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome_json(&outcome))?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Wrote {} report(s) to {}.",
                    outcome.written.len(),
                    args.out.display()
                );
            }
        }
    }
    Ok(())
}
