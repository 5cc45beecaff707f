//! Plain-text baseline database.
//!
//! One record per line: `<path> <fingerprint>`. Loading reads whitespace-delimited
//! token pairs and stops at the first line that is not exactly one path and one valid
//! fingerprint. Paths containing whitespace cannot be represented and are refused on
//! save rather than written ambiguously.
//!
//! Saving is a full rewrite: the records go to a temporary file next to the database
//! which is then renamed over it, so a failed save leaves the previous content intact.

use super::{Fingerprint, Snapshot};
use crate::error::StoreError;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// A record that stopped loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// 1-based line number
    pub line: usize,
    /// Raw line content
    pub content: String,
}

/// Result of reading the baseline database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedBaseline {
    /// Records read before any malformed line
    pub snapshot: Snapshot,
    /// The line that stopped loading, if any
    pub malformed: Option<MalformedRecord>,
    /// Whether the database file existed
    pub existed: bool,
}

/// Parses database text into a snapshot.
///
/// Blank lines are skipped. A later record for the same path replaces the earlier one.
#[must_use]
pub fn parse_records(text: &str) -> (Snapshot, Option<MalformedRecord>) {
    let mut snapshot = Snapshot::new();

    for (index, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let record = match (tokens.next(), tokens.next(), tokens.next()) {
            (None, _, _) => continue,
            (Some(path), Some(hash), None) => hash
                .parse::<Fingerprint>()
                .ok()
                .map(|fingerprint| (path.to_string(), fingerprint)),
            _ => None,
        };

        match record {
            Some((path, fingerprint)) => {
                snapshot.insert(path, fingerprint);
            }
            None => {
                return (
                    snapshot,
                    Some(MalformedRecord {
                        line: index + 1,
                        content: line.to_string(),
                    }),
                );
            }
        }
    }

    (snapshot, None)
}

/// Renders a snapshot in database form, one record per line in path order.
///
/// # Errors
/// Returns [`StoreError::UnrepresentablePath`] if a path is empty or contains whitespace.
pub fn render_records(snapshot: &Snapshot) -> Result<String, StoreError> {
    let mut out = String::new();

    for (path, fingerprint) in snapshot {
        if !is_representable(path) {
            return Err(StoreError::UnrepresentablePath(path.clone()));
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "{path} {fingerprint}");
    }

    Ok(out)
}

/// Whether `path` survives the whitespace-delimited record format.
#[must_use]
pub fn is_representable(path: &str) -> bool {
    !path.is_empty() && !path.chars().any(char::is_whitespace)
}

/// Load/save access to the baseline database file.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    /// Database file location
    path: PathBuf,
}

impl BaselineStore {
    /// Creates a store for the database at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Database file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the baseline; a missing database is an empty baseline.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read as UTF-8 text.
    pub fn load(&self) -> Result<Snapshot> {
        Ok(self.load_detailed()?.snapshot)
    }

    /// Loads the baseline and reports where parsing stopped, if it did.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read as UTF-8 text.
    pub fn load_detailed(&self) -> Result<LoadedBaseline> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no baseline database, starting empty");
                return Ok(LoadedBaseline::default());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read baseline database: {}", self.path.display())
                });
            }
        };

        let (snapshot, malformed) = parse_records(&text);
        if let Some(record) = &malformed {
            warn!(
                path = %self.path.display(),
                line = record.line,
                "malformed baseline record, ignoring the rest of the database"
            );
        }
        debug!(path = %self.path.display(), entries = snapshot.len(), "loaded baseline");

        Ok(LoadedBaseline {
            snapshot,
            malformed,
            existed: true,
        })
    }

    /// Replaces the database content with `snapshot`.
    ///
    /// # Errors
    /// Returns an error if a path cannot be represented, or if the temporary file
    /// cannot be written or renamed over the database.
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let data = render_records(snapshot)?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

        let mut tmp = NamedTempFile::new_in(&parent).with_context(|| {
            format!("Failed to create temporary file in {}", parent.display())
        })?;
        tmp.write_all(data.as_bytes())
            .context("Failed to write baseline records")?;
        tmp.as_file()
            .sync_all()
            .context("Failed to flush baseline records")?;
        tmp.persist(&self.path)
            .map_err(|e| e.error)
            .with_context(|| {
                format!("Failed to replace baseline database: {}", self.path.display())
            })?;

        debug!(path = %self.path.display(), entries = snapshot.len(), "saved baseline");
        Ok(())
    }
}
