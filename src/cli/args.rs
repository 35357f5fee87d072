//! Arguments of the individual commands

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Only check this assignment
    #[arg(long, short)]
    pub assignment: Option<u32>,
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Assignment number
    pub assignment: u32,

    /// Roster file with a `First Name,Last Name,Team` header
    pub roster: PathBuf,

    /// Replace the table even if it already holds grading
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Assignment number
    pub assignment: u32,

    /// Team key (`s<id>` for a student without a team)
    pub team: String,

    /// Task number
    pub task: u32,

    /// Annotation as `[penalty][:comment]`, repeatable; none clears the task
    #[arg(long = "penalty", short = 'p', allow_hyphen_values = true)]
    pub penalties: Vec<String>,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Assignment number
    pub assignment: u32,

    /// Team key; omit for a summary of all teams
    pub team: Option<String>,
}

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Assignment number
    pub assignment: u32,

    /// The other tutor's roster database
    pub other: PathBuf,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Assignment number
    pub assignment: u32,

    /// Output directory
    #[arg(long, short, default_value = "reports")]
    pub out: PathBuf,

    /// Write flat scored tables instead of structured reports
    #[arg(long)]
    pub flat: bool,
}

#[derive(Args, Debug)]
pub struct FeedbackArgs {
    /// Only this assignment
    #[arg(long, short)]
    pub assignment: Option<u32>,

    /// Output directory
    #[arg(long, short, default_value = "feedback")]
    pub out: PathBuf,
}
