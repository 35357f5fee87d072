//! Command dispatch logic for gradebook

use std::time::Instant;

use crate::cli::Cli;
use gradebook_core::error::Result;
use tracing::debug;

mod command;
mod macros;

pub use command::CommandContext;
use command::Command;
pub(crate) use macros::trace_command;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    debug!(elapsed = ?start.elapsed(), config = %cli.config.display(), "dispatch");
    let ctx = CommandContext::new(cli, start);
    cli.command.execute(&ctx)
}
