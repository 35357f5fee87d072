//! `gradebook show` - display scores
//!
//! Without a team: one line per team with each task's remaining points and
//! the total. With a team: that team's members and full ledger.

use serde_json::json;

use crate::cli::{OutputFormat, ShowArgs};
use crate::commands::dispatch::CommandContext;
use gradebook_core::config::AssignmentSpec;
use gradebook_core::error::Result;
use gradebook_core::render::TeamReport;
use gradebook_core::roster::Team;

/// Execute the show command
pub fn execute(ctx: &CommandContext, args: &ShowArgs) -> Result<()> {
    let config = ctx.load_config()?;
    let assignment = config.assignment(args.assignment)?;
    let store = ctx.open_store(&config)?;

    match &args.team {
        Some(key) => show_team(ctx, assignment, &store.team(&assignment.table, key)?),
        None => show_summary(ctx, assignment, &store.teams(&assignment.table)?),
    }
}

fn show_summary(ctx: &CommandContext, assignment: &AssignmentSpec, teams: &[Team]) -> Result<()> {
    match ctx.cli.format {
        OutputFormat::Json => {
            let rows: Vec<_> = teams
                .iter()
                .map(|team| {
                    let ledger = team.ledger();
                    let report = TeamReport::new(assignment, &team.key, team.member_names(), &ledger);
                    json!({
                        "team": team.key,
                        "members": team.member_names(),
                        "graded": ledger.has_annotations(),
                        "tasks": report
                            .task_scores()
                            .iter()
                            .map(|s| json!({"task": s.task, "reached": s.reached, "max": s.max}))
                            .collect::<Vec<_>>(),
                        "total": report.overall(),
                        "max": assignment.total(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Human => {
            let header: Vec<String> = assignment.tasks().map(|(task, _)| format!("T{}", task)).collect();
            println!("team\t{}\ttotal\tmembers", header.join("\t"));
            for team in teams {
                let ledger = team.ledger();
                let report = TeamReport::new(assignment, &team.key, team.member_names(), &ledger);
                let scores: Vec<String> = report
                    .task_scores()
                    .iter()
                    .map(|s| s.reached.to_string())
                    .collect();
                println!(
                    "{}\t{}\t{}/{}\t{}",
                    team.key,
                    scores.join("\t"),
                    report.overall(),
                    assignment.total(),
                    team.member_names().join(", ")
                );
            }
        }
    }
    Ok(())
}

fn show_team(ctx: &CommandContext, assignment: &AssignmentSpec, team: &Team) -> Result<()> {
    let ledger = team.ledger();
    let report = TeamReport::new(assignment, &team.key, team.member_names(), &ledger);
    let unknown = report.unknown_tasks();
    if !unknown.is_empty() && ctx.cli.format == OutputFormat::Human {
        eprintln!(
            "warning: team {} has annotations for tasks {:?}, which assignment {} does not define",
            team.key, unknown, assignment.number
        );
    }

    match ctx.cli.format {
        OutputFormat::Json => {
            let output = json!({
                "team": team.key,
                "members": team.member_names(),
                "ledger": ledger,
                "total": report.overall(),
                "max": assignment.total(),
                "unknown_tasks": unknown,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => print!("{}", report.render()),
    }
    Ok(())
}
