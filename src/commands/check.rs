//! `gradebook check` - validate the configuration and grading files
//!
//! Loading the configuration already enforces its invariants. Each grading
//! file is then run through the field-count check and matched against its
//! assignment's tasks. A missing grading file is reported, not fatal.

use serde_json::json;

use crate::cli::{CheckArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use gradebook_core::error::Result;
use gradebook_core::grading_file::GradingTable;

/// Execute the check command
pub fn execute(ctx: &CommandContext, args: &CheckArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignments = match args.assignment {
        Some(number) => vec![config.assignment(number)?],
        None => config.assignments.iter().collect(),
    };

    let mut files = Vec::new();
    for assignment in assignments {
        let Some(path) = &assignment.grading_file else {
            continue;
        };
        if !path.exists() {
            files.push(json!({
                "assignment": assignment.number,
                "path": path.display().to_string(),
                "status": "missing",
            }));
            continue;
        }
        // Malformed files abort with the offending line.
        let table = GradingTable::load(path, assignment)?;
        files.push(json!({
            "assignment": assignment.number,
            "path": path.display().to_string(),
            "status": "ok",
            "rows": table.rows.len(),
        }));
    }

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = json!({
                "config": config.source().display().to_string(),
                "lecture": config.lecture,
                "assignments": config
                    .assignments
                    .iter()
                    .map(|a| json!({
                        "number": a.number,
                        "tasks": a.task_count(),
                        "total": a.total(),
                    }))
                    .collect::<Vec<_>>(),
                "grading_files": files,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Configuration {} is valid ({} assignments).",
                    config.source().display(),
                    config.assignments.len()
                );
            }
            for file in &files {
                match file["status"].as_str() {
                    Some("missing") => eprintln!(
                        "warning: could not find {} (assignment {})",
                        file["path"].as_str().unwrap_or_default(),
                        file["assignment"]
                    ),
                    _ if !ctx.cli.quiet => println!(
                        "ok: {} ({} rows)",
                        file["path"].as_str().unwrap_or_default(),
                        file["rows"]
                    ),
                    _ => {}
                }
            }
        }
    }
    Ok(())
}
