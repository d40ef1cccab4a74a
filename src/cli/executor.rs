//! Dispatches parsed CLI commands.

use super::handlers::{MigrateCommandHandler, MigrationAction, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// Result of running a command that did not fail.
#[derive(Debug)]
pub enum CommandOutcome {
    /// The caller should start the HTTP server with these settings.
    StartServer(Settings),
    Done,
}

pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<CommandOutcome> {
    match cli.resolved_command() {
        Commands::Serve { dry_run: true, .. } => {
            ServeCommandHandler::new(settings).validate_only()?;
            Ok(CommandOutcome::Done)
        }
        Commands::Serve { .. } => Ok(CommandOutcome::StartServer(settings)),
        Commands::Migrate { dry_run, rollback } => {
            MigrateCommandHandler::new(settings)
                .execute(MigrationAction::from_args(dry_run, rollback))
                .await?;
            Ok(CommandOutcome::Done)
        }
    }
}
