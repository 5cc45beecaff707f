//! Directory scanner producing a fresh snapshot of a tree.
//!
//! The walk visits every entry below the root in file-name order and keeps regular
//! files only; directories, symlinks (unless `follow_symlinks` is set), devices and
//! sockets never enter the snapshot. Files are then fingerprinted one by one.
//!
//! Two failure modes are supported:
//!
//! - [`ScanMode::Strict`] aborts on the first traversal error, so no partial snapshot
//!   is ever compared against a baseline.
//! - [`ScanMode::BestEffort`] logs traversal errors below the root and keeps walking.
//!
//! A missing or unreadable root is an error in both modes.

use crate::config::Config;
use crate::error::ScanError;
use crate::output;
use crate::storage::baseline::is_representable;
use crate::storage::{FilePath, Snapshot};
use crate::utils::hash::{FingerprintAlgorithm, FingerprintStrategy};
use anyhow::Result;
use glob::Pattern;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info_span, warn};
use walkdir::{DirEntry, WalkDir};

/// How traversal errors below the root are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Any traversal error aborts the scan
    Strict,
    /// Traversal errors are recorded and the walk continues
    BestEffort,
}

/// Everything a scan observed.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Fingerprints of all readable regular files
    pub snapshot: Snapshot,
    /// Regular files that could not be fingerprinted, with the reason
    pub unreadable: BTreeMap<FilePath, String>,
    /// Regular files whose path cannot be stored in the baseline database
    pub unrepresentable: Vec<PathBuf>,
    /// Traversal errors skipped in best-effort mode
    pub walk_errors: Vec<String>,
    /// Wall time of the scan
    pub elapsed: Duration,
}

/// Scanner turning a directory tree into a [`Snapshot`].
pub struct DirectoryScanner {
    /// Fingerprint function applied to each file
    strategy: Box<dyn FingerprintStrategy>,
    /// Whether symbolic links are resolved during the walk
    follow_symlinks: bool,
    /// Patterns excluding entries from the walk
    ignore_patterns: Vec<Pattern>,
    /// Files never recorded, such as the baseline database itself
    excluded: Vec<PathBuf>,
}

impl DirectoryScanner {
    /// Create a new directory scanner
    ///
    /// # Arguments
    ///
    /// * `strategy` - Fingerprint function applied to each file
    /// * `follow_symlinks` - Whether to follow symbolic links
    /// * `ignore_patterns` - Entries to exclude (e.g., `*.swp`, `.git`)
    #[must_use]
    pub fn new(
        strategy: Box<dyn FingerprintStrategy>,
        follow_symlinks: bool,
        ignore_patterns: Vec<Pattern>,
    ) -> Self {
        Self {
            strategy,
            follow_symlinks,
            ignore_patterns,
            excluded: Vec::new(),
        }
    }

    /// Never record `path`, wherever it appears in a scanned tree.
    #[must_use]
    pub fn excluding(mut self, path: PathBuf) -> Self {
        self.excluded.push(path);
        self
    }

    /// Scanner for `algorithm` with default scan options.
    #[must_use]
    pub fn with_algorithm(algorithm: FingerprintAlgorithm) -> Self {
        Self::new(algorithm.strategy(), false, Vec::new())
    }

    /// Build a scanner from the `[core]` and `[scan]` configuration sections.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is not a valid glob.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            config.core.fingerprint.strategy(),
            config.scan.follow_symlinks,
            config.ignore_patterns()?,
        ))
    }

    /// Fingerprint algorithm in use.
    #[must_use]
    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.strategy.algorithm()
    }

    /// Scan `root` recursively
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `root` does not exist or is not a directory
    /// - `root` itself cannot be read
    /// - Any traversal below the root fails in [`ScanMode::Strict`]
    pub fn scan(&self, root: &Path, mode: ScanMode) -> Result<ScanResult, ScanError> {
        let span = info_span!("scan", root = %root.display(), ?mode);
        let _guard = span.enter();
        let started = Instant::now();

        let mut result = ScanResult::default();
        let files = self.collect_files(root, mode, &mut result)?;

        let mut progress = output::start_progress("Fingerprinting files", files.len());
        for (done, (path, key)) in files.into_iter().enumerate() {
            match self.strategy.fingerprint_file(&path) {
                Ok(fingerprint) => {
                    result.snapshot.insert(key, fingerprint);
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "skipping unreadable file");
                    result.unreadable.insert(key, err.to_string());
                }
            }
            progress.update(done + 1);
        }
        progress.finish();

        result.elapsed = started.elapsed();
        debug!(
            files = result.snapshot.len(),
            unreadable = result.unreadable.len(),
            elapsed = ?result.elapsed,
            "scan complete"
        );
        Ok(result)
    }

    /// Walk `root` and return every regular file with its snapshot key
    fn collect_files(
        &self,
        root: &Path,
        mode: ScanMode,
        result: &mut ScanResult,
    ) -> Result<Vec<(PathBuf, FilePath)>, ScanError> {
        check_root(root)?;

        // Compared by canonical location so relative and absolute spellings match
        let canonical_root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
        let excluded: Vec<PathBuf> = self
            .excluded
            .iter()
            .filter_map(|p| p.canonicalize().ok())
            .collect();

        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.should_skip_entry(root, e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if mode == ScanMode::BestEffort && err.depth() > 0 => {
                    warn!(error = %err, "skipping unreadable part of the tree");
                    result.walk_errors.push(err.to_string());
                    continue;
                }
                Err(err) => {
                    let path = err.path().unwrap_or(root).to_path_buf();
                    return Err(ScanError::Traversal {
                        path,
                        source: io::Error::from(err),
                    });
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if !excluded.is_empty() {
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                if excluded.contains(&canonical_root.join(relative)) {
                    debug!(path = %entry.path().display(), "skipping excluded file");
                    continue;
                }
            }

            match entry.path().to_str() {
                Some(key) if is_representable(key) => {
                    files.push((entry.path().to_path_buf(), key.to_string()));
                }
                _ => {
                    warn!(path = %entry.path().display(), "path cannot be stored in the baseline, skipping");
                    result.unrepresentable.push(entry.into_path());
                }
            }
        }

        Ok(files)
    }

    /// Check if a directory entry matches an ignore pattern
    fn should_skip_entry(&self, root: &Path, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || self.ignore_patterns.is_empty() {
            return false;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let name = entry.file_name().to_string_lossy();
        self.ignore_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches(&name))
    }
}

/// Verify the scan root is an existing directory
fn check_root(root: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::RootNotDirectory(root.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ScanError::RootNotFound(root.to_path_buf()))
        }
        Err(e) => Err(ScanError::Traversal {
            path: root.to_path_buf(),
            source: e,
        }),
    }
}
