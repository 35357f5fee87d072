//! `gradebook grade` - set one task's annotations for one team

use crate::cli::{GradeArgs, OutputFormat};
use crate::commands::dispatch::CommandContext;
use gradebook_core::annotation::Annotation;
use gradebook_core::bail_invalid;
use gradebook_core::error::Result;
use gradebook_core::score::TaskScore;

/// Execute the grade command
pub fn execute(ctx: &CommandContext, args: &GradeArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignment = config.assignment(args.assignment)?;
    let Some(max) = assignment.max_points(args.task) else {
        bail_invalid!(
            "task",
            format!(
                "{} (assignment {} has tasks 1-{})",
                args.task,
                assignment.number,
                assignment.task_count()
            )
        );
    };

    let annotations = args
        .penalties
        .iter()
        .map(|entry| Annotation::parse_shorthand(entry))
        .collect::<Result<Vec<_>>>()?;

    let store = ctx.open_store(&config)?;
    let ledger =
        store.set_task_annotations(&assignment.table, &args.team, args.task, annotations)?;
    let score = TaskScore::compute(args.task, max, ledger.get_task_annotations(args.task));

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "team": args.team,
                "task": args.task,
                "annotations": ledger.get_task_annotations(args.task),
                "reached": score.reached,
                "max": score.max,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            if !ctx.cli.quiet {
                println!(
                    "Team {}, task {}: {}/{} points.",
                    args.team, args.task, score.reached, score.max
                );
            }
        }
    }
    Ok(())
}
