//! Merges CLI overrides on top of the loaded configuration.
//!
//! Priority, lowest to highest: configuration files, `CONTACTS_*`
//! environment variables, global flags (`--verbose`/`--quiet`), then
//! subcommand arguments.

use crate::cli::parser::{Cli, Commands};
use crate::config::{ConfigLoader, Settings};
use crate::config::error::ConfigError;

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration the way the CLI asks for it: a single
    /// file when `--config` is given, the layered directory otherwise.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let loader = match cli.config {
            Some(ref path) => ConfigLoader::from_file(path.clone()),
            None => ConfigLoader::new()?,
        };
        let loader = match cli.env {
            Some(env) => loader.with_environment(env.into()),
            None => loader,
        };

        Ok(Self::new(loader.load()?))
    }

    /// Applies the CLI overrides and validates the result.
    pub fn merge_cli_args(self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut settings = self.base_config;

        if cli.verbose {
            settings.logger.level = "debug".to_string();
        } else if cli.quiet {
            settings.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            ref host,
            port,
            log_level,
            ..
        }) = cli.command
        {
            if let Some(host) = host {
                settings.server.host = host.clone();
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(level) = log_level {
                settings.logger.level = level.as_str().to_string();
            }
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn base_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/contacts".to_string();
        settings
    }

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(base_settings())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_no_overrides_keeps_base() {
        let settings = merge(&["contacts-rs"]);
        assert_eq!(settings, base_settings());
    }

    #[test]
    fn test_verbose_and_quiet() {
        assert_eq!(merge(&["contacts-rs", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["contacts-rs", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let settings = merge(&[
            "contacts-rs",
            "serve",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
        ]);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_log_level_beats_verbose() {
        let settings = merge(&["contacts-rs", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(settings.logger.level, "warn");
    }

    #[test]
    fn test_migrate_ignores_serve_overrides() {
        let settings = merge(&["contacts-rs", "migrate"]);
        assert_eq!(settings.server, base_settings().server);
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let cli = Cli::try_parse_from(["contacts-rs"]).unwrap();
        let result = ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_cli_with_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nrequest_timeout = 45\n\n[database]\nurl = \"postgres://file/contacts\""
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["contacts-rs", "--config", path]).unwrap();
        let merger = ConfigurationMerger::from_cli(&cli).unwrap();
        assert_eq!(merger.config().server.request_timeout, 45);
        assert_eq!(merger.config().database.url, "postgres://file/contacts");
    }
}
