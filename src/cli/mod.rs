//! CLI argument parsing for gradebook
//!
//! Global flags: --config, --db, --format, --quiet, --verbose, --log-level,
//! --log-json

pub mod args;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use args::{
    CheckArgs, FeedbackArgs, GradeArgs, ImportArgs, MergeArgs, ReportArgs, ShowArgs,
};
pub use output::OutputFormat;

/// Gradebook - grading ledgers and feedback documents for tutors
#[derive(Parser, Debug)]
#[command(name = "gradebook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Lecture configuration (`.toml`, or the legacy key=value format)
    #[arg(
        long,
        short,
        global = true,
        env = "GRADEBOOK_CONFIG",
        default_value = "gradebook.toml"
    )]
    pub config: PathBuf,

    /// Roster database, overriding the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace) or a filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate the configuration and the grading files it names
    Check(CheckArgs),

    /// Replace an assignment's roster table from a roster file
    Import(ImportArgs),

    /// Set one task's annotations for one team
    Grade(GradeArgs),

    /// Show scores of all teams, or one team's ledger
    Show(ShowArgs),

    /// Merge another tutor's roster database into this one
    Merge(MergeArgs),

    /// Write a structured report for every team of an assignment
    Report(ReportArgs),

    /// Write flat feedback documents from the grading files
    Feedback(FeedbackArgs),
}
