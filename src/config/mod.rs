/// TOML parsing and validation.
pub mod parser;

use crate::DEFAULT_DATABASE_FILE;
use crate::utils::hash::FingerprintAlgorithm;
use anyhow::{Context, Result};
use clap::ValueEnum;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Contents of `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// `[core]` section
    #[serde(default)]
    pub core: CoreConfig,

    /// `[scan]` section
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Where the baseline lives and how files are fingerprinted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Baseline database file; relative paths resolve against the working directory
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Fingerprint strategy for new scans
    #[serde(default)]
    pub fingerprint: FingerprintAlgorithm,
}

/// Directory walk options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ScanConfig {
    /// Resolve symbolic links instead of skipping them
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Glob patterns; a matching directory is pruned, a matching file skipped
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            fingerprint: FingerprintAlgorithm::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    ///
    /// A missing file yields the defaults; it is not created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot read the configuration file
    /// - Configuration file contains invalid TOML
    /// - A value fails validation
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        parser::parse_config_file(path)
    }

    /// Save configuration to a file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Cannot create parent directories
    /// - Cannot write to the file
    /// - TOML serialization fails
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        let mut file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create config file: {}", path.display()))?;
        file.write_all(toml_str.as_bytes())?;
        Ok(())
    }

    /// Compile the ignore patterns
    ///
    /// # Errors
    ///
    /// Returns an error naming the first pattern that is not a valid glob.
    pub fn ignore_patterns(&self) -> Result<Vec<Pattern>> {
        self.scan
            .ignore_patterns
            .iter()
            .map(|p| Pattern::new(p).with_context(|| format!("Invalid ignore pattern: {p}")))
            .collect()
    }

    /// Get a configuration value by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return None;
        }

        match (parts[0], parts[1]) {
            ("core", "database") => Some(self.core.database.display().to_string()),
            ("core", "fingerprint") => Some(self.core.fingerprint.to_string()),
            ("scan", "follow_symlinks") => Some(self.scan.follow_symlinks.to_string()),
            ("scan", "ignore_patterns") => Some(self.scan.ignore_patterns.join(",")),
            _ => None,
        }
    }

    /// Set a configuration value by key
    ///
    /// `scan.ignore_patterns` takes a comma-separated list; an empty value clears it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key format is invalid (must be section.key)
    /// - The key is unknown
    /// - The value is invalid for the key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();
        if parts.len() != 2 {
            return Err(anyhow::anyhow!("Invalid configuration key: {key}"));
        }

        match (parts[0], parts[1]) {
            ("core", "database") => {
                if value.is_empty() {
                    return Err(anyhow::anyhow!("core.database must not be empty"));
                }
                self.core.database = PathBuf::from(value);
            }
            ("core", "fingerprint") => {
                self.core.fingerprint = FingerprintAlgorithm::from_str(value, true)
                    .map_err(|_| anyhow::anyhow!("Unknown fingerprint algorithm: {value}"))?;
            }
            ("scan", "follow_symlinks") => {
                self.scan.follow_symlinks = value
                    .parse()
                    .with_context(|| format!("Invalid boolean: {value}"))?;
            }
            ("scan", "ignore_patterns") => {
                let patterns: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect();
                for pattern in &patterns {
                    Pattern::new(pattern)
                        .with_context(|| format!("Invalid ignore pattern: {pattern}"))?;
                }
                self.scan.ignore_patterns = patterns;
            }
            _ => return Err(anyhow::anyhow!("Unknown configuration key: {key}")),
        }
        Ok(())
    }
}

// Default functions for serde
fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_FILE)
}
