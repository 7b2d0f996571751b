use std::path::PathBuf;

use anyhow::{Result, anyhow};
use log::LevelFilter;

/// File name of the SQLite database.
pub const DATABASE_FILE_NAME: &str = "kizuna.db";

/// Environment variable overriding the database path.
pub const DB_PATH_ENV: &str = "KIZUNA_DB";

/// Environment variable selecting the log level (`error` .. `trace`, `off`).
pub const LOG_LEVEL_ENV: &str = "KIZUNA_LOG";

/// Runtime configuration for the application host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Location of the SQLite database file.
    pub database_path: PathBuf,
    /// Maximum level of log records emitted.
    pub log_level: LevelFilter,
}

impl Config {
    /// Builds configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `KIZUNA_DB` (path, default `{data_dir}/kizuna/kizuna.db`)
    /// - `KIZUNA_LOG` (level, default `info`)
    ///
    /// # Errors
    ///
    /// Fails when `KIZUNA_LOG` is not a valid level, or when no override is
    /// set and the platform data directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(None)
    }

    /// Like [`Config::from_env`], but `database_override` (e.g. `--db`) takes
    /// precedence over `KIZUNA_DB`.
    ///
    /// The platform data directory is only consulted when neither is set.
    pub fn from_env_with(database_override: Option<PathBuf>) -> Result<Self> {
        let database_path = match (database_override, std::env::var_os(DB_PATH_ENV)) {
            (Some(path), _) => path,
            (None, Some(path)) if !path.is_empty() => PathBuf::from(path),
            (None, _) => default_database_path()?,
        };

        let log_level = match std::env::var(LOG_LEVEL_ENV) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid {LOG_LEVEL_ENV} value '{raw}'"))?,
            Err(_) => LevelFilter::Info,
        };

        Ok(Self {
            database_path,
            log_level,
        })
    }
}

/// Gets the cross-platform database path.
///
/// Returns the path as `{data_dir}/kizuna/kizuna.db` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
pub fn default_database_path() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("kizuna").join(DATABASE_FILE_NAME))
}
