#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)] // Bucket counters cannot overflow
#![allow(clippy::indexing_slicing)] // Config keys are split and length-checked first

//! # fim - Point-in-time File Integrity Monitor
//!
//! fim records a content fingerprint for every regular file below a directory and, on
//! later runs, re-scans the tree and classifies each file as unchanged, modified, added,
//! deleted or unreadable relative to that baseline.
//!
//! ## Architecture
//!
//! - [`utils::hash`]: Fingerprint strategies (rolling hash, MD5, XXH3-128)
//! - [`storage`]: [`storage::Snapshot`] values and the plain-text [`storage::baseline::BaselineStore`]
//! - [`scanner`]: Recursive directory scanner producing a fresh snapshot
//! - [`diff`]: Pure classification of two snapshots
//! - [`monitor`]: Orchestration of the `init` and `check` operations
//! - [`commands`]: Report printing for each CLI command
//! - [`config`]: TOML configuration
//! - [`output`]: Styled terminal output and progress display
//!
//! ## Example Usage
//!
//! ```no_run
//! use fim::FimContext;
//! use fim::monitor::Monitor;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ctx = FimContext::new(None)?;
//! let mut monitor = Monitor::from_context(&ctx)?;
//!
//! monitor.initialize(Path::new("/etc"))?;
//! let outcome = monitor.check(Path::new("/etc"))?;
//! println!("{} change(s)", outcome.diff.change_count());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions (argument parsing structures).
pub mod cli;

/// Report printing for the `init`, `check` and `list` commands.
pub mod commands;

/// Configuration parsing and validation.
pub mod config;

/// Snapshot classification (added, modified, deleted, unchanged, unreadable).
pub mod diff;

/// Typed errors for scanning and baseline persistence.
pub mod error;

/// Scan-and-compare orchestration.
pub mod monitor;

/// Output formatting and progress display.
pub mod output;

/// Recursive directory scanning.
pub mod scanner;

/// Snapshot types and the persisted baseline store.
pub mod storage;

/// Utility functions and helpers.
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::Config;
use crate::scanner::DirectoryScanner;
use crate::storage::baseline::BaselineStore;
use crate::utils::hash::FingerprintAlgorithm;

/// Current version of the fim binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration file path relative to the user configuration directory.
pub const DEFAULT_CONFIG_PATH: &str = "fim/config.toml";

/// Default baseline database file, relative to the working directory.
pub const DEFAULT_DATABASE_FILE: &str = "fim_database.txt";

/// Environment variable overriding the configuration file path.
pub const CONFIG_PATH_ENV: &str = "FIM_CONFIG_PATH";

/// Environment variable overriding the baseline database path.
pub const DATABASE_ENV: &str = "FIM_DATABASE";

/// Central context for all fim operations.
///
/// Holds the resolved configuration plus the paths derived from it. Command-line
/// overrides are applied with [`FimContext::with_overrides`] so that the rest of the
/// crate only ever reads the effective values.
///
/// # Examples
///
/// ```no_run
/// use fim::FimContext;
/// use std::path::PathBuf;
///
/// # fn main() -> anyhow::Result<()> {
/// // Defaults from the user configuration directory
/// let ctx = FimContext::new(None)?;
///
/// // Explicit config file (for testing)
/// let ctx = FimContext::new(Some(PathBuf::from("/tmp/fim.toml")))?
///     .with_overrides(Some(PathBuf::from("/tmp/baseline.txt")), None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FimContext {
    /// Path to the configuration file (may not exist).
    pub config_path: PathBuf,

    /// Loaded configuration settings.
    pub config: Config,
}

impl FimContext {
    /// Creates a context from `config_path`, or from the default location when `None`.
    ///
    /// A missing configuration file yields the default configuration.
    ///
    /// # Errors
    /// Returns an error if no configuration directory can be determined, or if the
    /// configuration file exists but cannot be read or fails validation.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_path {
            Some(path) => path,
            None => dirs::config_dir()
                .context("Could not determine configuration directory")?
                .join(DEFAULT_CONFIG_PATH),
        };

        let config = Config::load(&config_path)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Creates a context from an already built configuration.
    #[must_use]
    pub fn from_config(config_path: PathBuf, config: Config) -> Self {
        Self {
            config_path,
            config,
        }
    }

    /// Applies command-line overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        fingerprint: Option<FingerprintAlgorithm>,
    ) -> Self {
        if let Some(database) = database {
            self.config.core.database = database;
        }
        if let Some(fingerprint) = fingerprint {
            self.config.core.fingerprint = fingerprint;
        }
        self
    }

    /// Path of the baseline database file.
    #[must_use]
    pub fn database_path(&self) -> &std::path::Path {
        &self.config.core.database
    }

    /// Baseline store bound to the configured database path.
    #[must_use]
    pub fn baseline_store(&self) -> BaselineStore {
        BaselineStore::new(self.config.core.database.clone())
    }

    /// Directory scanner configured with the fingerprint strategy and scan options.
    ///
    /// # Errors
    /// Returns an error if an ignore pattern is not a valid glob.
    pub fn scanner(&self) -> Result<DirectoryScanner> {
        DirectoryScanner::from_config(&self.config)
    }
}
