//! File sink for the `fmt` layers.

use std::fs::{self, File, OpenOptions};
use std::sync::Mutex;

use super::config::FileConfig;
use super::error::LoggerError;

/// Opens the configured log file, creating parent directories as needed.
///
/// The returned `Mutex<File>` is usable directly as a `MakeWriter`.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    Ok(Mutex::new(options.open(&config.path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let config = FileConfig {
            enabled: true,
            path: dir.path().join("nested/deeper/app.log"),
            ..FileConfig::default()
        };

        let file = open_log_file(&config).unwrap();
        writeln!(file.lock().unwrap(), "hello").unwrap();
        assert!(config.path.exists());
    }

    #[test]
    fn test_truncates_when_not_appending() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "old contents\n").unwrap();

        let config = FileConfig {
            enabled: true,
            path: path.clone(),
            append: false,
            ..FileConfig::default()
        };
        drop(open_log_file(&config).unwrap());

        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
