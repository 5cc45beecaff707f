#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated monitored tree plus fim state for one test
pub struct TestEnv {
    pub temp_dir: TempDir,
    /// Directory passed to `init` / `check`
    pub root: PathBuf,
    /// Baseline database (outside the monitored tree)
    pub database: PathBuf,
    /// Configuration file (absent until written)
    pub config: PathBuf,
}

impl TestEnv {
    /// Create an empty monitored directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().join("monitored");
        fs::create_dir_all(&root)?;

        Ok(Self {
            database: temp_dir.path().join("state/fim_database.txt"),
            config: temp_dir.path().join("config/fim/config.toml"),
            root,
            temp_dir,
        })
    }

    /// `fim` invocation bound to this environment's database and config
    pub fn fim(&self) -> Result<Command> {
        let mut cmd = Command::cargo_bin("fim")?;
        cmd.env("HOME", self.temp_dir.path())
            .env("FIM_DATABASE", &self.database)
            .env("FIM_CONFIG_PATH", &self.config)
            .env_remove("RUST_LOG");
        Ok(cmd)
    }

    /// Monitored root as a command-line argument
    pub fn root_arg(&self) -> &str {
        self.root.to_str().unwrap()
    }

    /// Baseline key for a file below the root
    pub fn key(&self, relative: &str) -> String {
        self.root.join(relative).to_string_lossy().into_owned()
    }

    /// Write a file below the root, creating parent directories
    pub fn write(&self, relative: &str, content: &str) -> Result<()> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Delete a file below the root
    pub fn remove(&self, relative: &str) -> Result<()> {
        fs::remove_file(self.root.join(relative))?;
        Ok(())
    }

    /// Raw database bytes
    pub fn database_bytes(&self) -> Result<Vec<u8>> {
        Ok(fs::read(&self.database)?)
    }

    /// Path of the temporary directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
