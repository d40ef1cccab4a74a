//! Migrate command handler

use crate::config::settings::Settings;
use crate::db;
use crate::error::AppResult;

/// What a migrate invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationAction {
    /// List pending migrations only
    Preview,
    Apply,
    Rollback(u32),
}

impl MigrationAction {
    pub fn from_args(dry_run: bool, rollback: Option<u32>) -> Self {
        match (dry_run, rollback) {
            (true, _) => MigrationAction::Preview,
            (false, Some(steps)) => MigrationAction::Rollback(steps),
            (false, None) => MigrationAction::Apply,
        }
    }
}

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(&self, action: MigrationAction) -> AppResult<()> {
        self.config.database.validate()?;
        let url = &self.config.database.url;

        match action {
            MigrationAction::Preview => {
                let pending = db::pending_migrations(url).await?;
                if pending.is_empty() {
                    tracing::info!("No pending migrations");
                }
                for name in &pending {
                    tracing::info!(migration = %name, "Pending migration");
                }
            }
            MigrationAction::Apply => {
                let applied = db::run_pending_migrations(url).await?;
                tracing::info!(count = applied.len(), versions = ?applied, "Applied migrations");
            }
            MigrationAction::Rollback(steps) => {
                tracing::warn!(steps, "Reverting migrations");
                let reverted = db::revert_migrations(url, steps).await?;
                if reverted.len() < steps as usize {
                    tracing::warn!(
                        requested = steps,
                        reverted = reverted.len(),
                        "Fewer migrations were applied than requested"
                    );
                }
                tracing::info!(versions = ?reverted, "Reverted migrations");
            }
        }

        Ok(())
    }
}
