//! Serve command handler
//!
//! Only the dry run lives here; starting the server is [`crate::server::Server`]'s job.

use crate::config::settings::Settings;
use crate::error::AppResult;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validate everything the server needs at startup without binding
    /// the listener or opening database connections.
    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        self.config.jwt.validate()?;

        tracing::info!(
            address = %self.config.server.address(),
            log_level = %self.config.logger.level,
            auto_migrate = self.config.database.auto_migrate,
            "Configuration is valid; dry run completed"
        );
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn create_valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/contacts".to_string();
        config.jwt.secret = "k".repeat(40);
        config
    }

    #[test]
    fn test_dry_run_accepts_valid_config() {
        let handler = ServeCommandHandler::new(create_valid_config());
        assert!(handler.validate_only().is_ok());
        assert_eq!(handler.config().server.port, 3000);
    }

    #[test]
    fn test_dry_run_requires_jwt_secret() {
        let mut config = create_valid_config();
        config.jwt.secret.clear();

        let err = ServeCommandHandler::new(config).validate_only().unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_dry_run_requires_database_url() {
        let mut config = create_valid_config();
        config.database.url.clear();

        assert!(ServeCommandHandler::new(config).validate_only().is_err());
    }
}
