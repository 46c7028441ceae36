//! Configuration management for the moodtab application.
//!
//! This module handles loading and validating configuration settings from environment
//! variables, with sensible defaults.
//!
//! # Environment Variables
//!
//! - `MOODTAB_DIR`: Path to the data directory (defaults to ~/.local/share/moodtab)
//! - `MOODTAB_DB_POOL_SIZE`: Number of pooled SQLite connections (defaults to 4)
//! - `HOME`: Used for expanding the default data directory path

use crate::constants::{
    DEFAULT_DATA_SUBDIR, DEFAULT_DB_FILE_NAME, DEFAULT_DB_POOL_SIZE, ENV_VAR_HOME,
    ENV_VAR_MOODTAB_DB_POOL_SIZE, ENV_VAR_MOODTAB_DIR, MAX_DB_POOL_SIZE, REDACTED_PLACEHOLDER,
};
use crate::errors::{AppError, AppResult};
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Configuration for the moodtab application.
///
/// # Examples
///
/// Creating a configuration manually:
/// ```
/// use moodtab::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     data_dir: PathBuf::from("/path/to/data"),
///     db_file_name: "moodtab.db".to_string(),
///     pool_size: 4,
/// };
/// assert_eq!(config.db_path(), PathBuf::from("/path/to/data/moodtab.db"));
/// ```
pub struct Config {
    /// Directory holding the database file.
    ///
    /// Loaded from `MOODTAB_DIR` with a fallback to ~/.local/share/moodtab.
    pub data_dir: PathBuf,

    /// File name of the SQLite database inside `data_dir`.
    pub db_file_name: String,

    /// Maximum number of pooled connections.
    pub pool_size: u32,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("data_dir", &REDACTED_PLACEHOLDER)
            .field("db_file_name", &self.db_file_name)
            .field("pool_size", &self.pool_size)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(""),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            pool_size: DEFAULT_DB_POOL_SIZE,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables with sensible defaults.
    ///
    /// The data directory is expanded with `shellexpand` to handle `~` and
    /// environment variable references.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if:
    /// - The data directory path expansion fails or yields an empty path
    /// - `MOODTAB_DB_POOL_SIZE` is not a positive integer
    pub fn load() -> AppResult<Self> {
        let data_dir_str = env::var(ENV_VAR_MOODTAB_DIR).unwrap_or_else(|_| {
            let home = env::var(ENV_VAR_HOME).unwrap_or_else(|_| "".to_string());
            format!("{}/{}", home, DEFAULT_DATA_SUBDIR)
        });

        let expanded_path = shellexpand::full(&data_dir_str)
            .map_err(|e| AppError::Config(format!("Failed to expand path: {}", e)))?;

        let data_dir = PathBuf::from(expanded_path.into_owned());
        if data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        let pool_size = match env::var(ENV_VAR_MOODTAB_DB_POOL_SIZE) {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_VAR_MOODTAB_DB_POOL_SIZE, raw
                ))
            })?,
            Err(_) => DEFAULT_DB_POOL_SIZE,
        };

        Ok(Config {
            data_dir,
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            pool_size,
        })
    }

    /// Full path of the database file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Validates that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the data directory is empty or relative,
    /// the database file name is empty, or the pool size is outside 1..=16.
    ///
    /// # Examples
    ///
    /// ```
    /// use moodtab::Config;
    /// use std::path::PathBuf;
    ///
    /// let valid_config = Config {
    ///     data_dir: PathBuf::from("/absolute/path"),
    ///     db_file_name: "moodtab.db".to_string(),
    ///     pool_size: 4,
    /// };
    /// assert!(valid_config.validate().is_ok());
    ///
    /// let invalid_config = Config {
    ///     data_dir: PathBuf::from("relative/path"),
    ///     db_file_name: "moodtab.db".to_string(),
    ///     pool_size: 4,
    /// };
    /// assert!(invalid_config.validate().is_err());
    /// ```
    pub fn validate(&self) -> AppResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(AppError::Config("Data directory path is empty".to_string()));
        }

        if !self.data_dir.is_absolute() {
            return Err(AppError::Config(
                "Data directory must be an absolute path".to_string(),
            ));
        }

        if self.db_file_name.is_empty() {
            return Err(AppError::Config("Database file name is empty".to_string()));
        }

        if self.pool_size == 0 || self.pool_size > MAX_DB_POOL_SIZE {
            return Err(AppError::Config(format!(
                "Pool size must be between 1 and {}, got {}",
                MAX_DB_POOL_SIZE, self.pool_size
            )));
        }

        Ok(())
    }

    /// Creates the data directory if it does not exist yet.
    pub fn ensure_data_dir(&self) -> AppResult<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}
