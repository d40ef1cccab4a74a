//! Command handlers for CLI operations

pub mod migrate;
pub mod serve;

pub use migrate::{MigrateCommandHandler, MigrationAction};
pub use serve::ServeCommandHandler;
