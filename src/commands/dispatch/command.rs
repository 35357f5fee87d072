//! Command trait and context for dispatching commands

use std::path::Path;
use std::time::Instant;

use crate::cli::{Cli, Commands};
use crate::commands;
use gradebook_core::config::LectureConfig;
use gradebook_core::db::RosterStore;
use gradebook_core::error::Result;

use super::trace_command;

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    pub fn load_config(&self) -> Result<LectureConfig> {
        let config = LectureConfig::load(&self.cli.config)?;
        trace_command!(self.cli, self.start, "load_config");
        Ok(config)
    }

    /// Database named by `--db`, or the configured one.
    pub fn database_path<'c>(&'c self, config: &'c LectureConfig) -> &'c Path {
        self.cli.db.as_deref().unwrap_or_else(|| config.database())
    }

    pub fn open_store(&self, config: &LectureConfig) -> Result<RosterStore> {
        let store = RosterStore::open(self.database_path(config))?;
        trace_command!(self.cli, self.start, "open_store");
        Ok(store)
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        let result = match self {
            Commands::Check(args) => commands::check::execute(ctx, args),
            Commands::Import(args) => commands::import::execute(ctx, args),
            Commands::Grade(args) => commands::grade::execute(ctx, args),
            Commands::Show(args) => commands::show::execute(ctx, args),
            Commands::Merge(args) => commands::merge::execute(ctx, args),
            Commands::Report(args) => commands::report::execute(ctx, args),
            Commands::Feedback(args) => commands::feedback::execute(ctx, args),
        };
        trace_command!(ctx.cli, ctx.start, "execute_command");
        result
    }
}
