//! Scan-and-compare orchestration.
//!
//! A [`Monitor`] loads the baseline once when it is built, owns it for the rest of the
//! run, and writes it back only through [`BaselineStore::save`]:
//!
//! - [`Monitor::initialize`] scans best-effort and replaces the baseline unconditionally.
//! - [`Monitor::check`] scans strictly, classifies against the baseline and saves only
//!   when something was added, modified or deleted.
//!
//! A failed scan never touches the persisted baseline. Neither does a check against a
//! baseline that did not load cleanly or was recorded with another fingerprint
//! algorithm; only `initialize` replaces those.

use crate::FimContext;
use crate::diff::{DiffResult, diff_with_unreadable};
use crate::scanner::{DirectoryScanner, ScanMode, ScanResult};
use crate::storage::Snapshot;
use crate::storage::baseline::{BaselineStore, MalformedRecord};
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, info_span, warn};

/// Outcome of [`Monitor::initialize`].
#[derive(Debug)]
pub struct InitOutcome {
    /// What the scan saw; every snapshot entry counts as added
    pub scan: ScanResult,
    /// Size of the baseline that was replaced
    pub previous_entries: usize,
}

/// Outcome of [`Monitor::check`].
#[derive(Debug)]
pub struct CheckOutcome {
    /// Classification against the baseline
    pub diff: DiffResult,
    /// What the scan saw
    pub scan: ScanResult,
    /// Whether the baseline database was rewritten
    pub saved: bool,
    /// Whether baseline fingerprints have a different width than the active strategy
    pub algorithm_mismatch: bool,
    /// Whether loading the baseline stopped at a malformed record
    pub baseline_malformed: bool,
}

impl CheckOutcome {
    /// Whether changes were found but the baseline was kept because it cannot be trusted.
    #[must_use]
    pub fn withheld(&self) -> bool {
        self.diff.has_changes() && !self.saved
    }
}

/// Owner of the baseline for one process run.
pub struct Monitor {
    /// Persistence for the baseline
    store: BaselineStore,
    /// Produces current snapshots
    scanner: DirectoryScanner,
    /// Baseline as loaded or last saved
    baseline: Snapshot,
    /// Line that stopped loading the database, if any
    malformed: Option<MalformedRecord>,
}

impl Monitor {
    /// Creates a monitor and loads the baseline from `store`.
    ///
    /// # Errors
    /// Returns an error if the database exists but cannot be read.
    pub fn new(store: BaselineStore, scanner: DirectoryScanner) -> Result<Self> {
        let loaded = store.load_detailed()?;
        if loaded.existed {
            info!(
                path = %store.path().display(),
                entries = loaded.snapshot.len(),
                "loaded baseline"
            );
        }

        let scanner = scanner.excluding(store.path().to_path_buf());

        Ok(Self {
            store,
            scanner,
            baseline: loaded.snapshot,
            malformed: loaded.malformed,
        })
    }

    /// Creates a monitor from the effective configuration.
    ///
    /// # Errors
    /// Returns an error if the scanner cannot be configured or the baseline cannot be read.
    pub fn from_context(ctx: &FimContext) -> Result<Self> {
        Self::new(ctx.baseline_store(), ctx.scanner()?)
    }

    /// Current in-memory baseline.
    #[must_use]
    pub fn baseline(&self) -> &Snapshot {
        &self.baseline
    }

    /// Baseline store in use.
    #[must_use]
    pub fn store(&self) -> &BaselineStore {
        &self.store
    }

    /// Scanner in use.
    #[must_use]
    pub fn scanner(&self) -> &DirectoryScanner {
        &self.scanner
    }

    /// Line that stopped loading the database, if it was malformed.
    #[must_use]
    pub fn malformed_record(&self) -> Option<&MalformedRecord> {
        self.malformed.as_ref()
    }

    /// Scan `root` and make the result the new baseline.
    ///
    /// Traversal errors below the root are skipped and reported in the outcome.
    ///
    /// # Errors
    /// Returns an error if the root cannot be scanned or the baseline cannot be saved.
    pub fn initialize(&mut self, root: &Path) -> Result<InitOutcome> {
        let span = info_span!("initialize", root = %root.display());
        let _guard = span.enter();

        let scan = self
            .scanner
            .scan(root, ScanMode::BestEffort)
            .context("Initialization aborted; baseline left unchanged")?;

        self.store.save(&scan.snapshot)?;
        let previous_entries = self.baseline.len();
        self.baseline = scan.snapshot.clone();
        self.malformed = None;
        info!(
            entries = self.baseline.len(),
            previous_entries, "baseline initialized"
        );

        Ok(InitOutcome {
            scan,
            previous_entries,
        })
    }

    /// Scan `root`, classify it against the baseline and save if anything changed.
    ///
    /// Nothing is saved when the baseline is malformed or uses another algorithm.
    ///
    /// # Errors
    /// Returns an error if any part of the tree cannot be traversed (the baseline is
    /// left untouched) or if the updated baseline cannot be saved.
    pub fn check(&mut self, root: &Path) -> Result<CheckOutcome> {
        let span = info_span!("check", root = %root.display());
        let _guard = span.enter();

        let scan = self
            .scanner
            .scan(root, ScanMode::Strict)
            .context("Integrity check aborted; baseline left unchanged")?;

        let hex_len = self.scanner.algorithm().hex_len();
        let algorithm_mismatch = self.baseline.iter().any(|(_, fp)| fp.hex_len() != hex_len);
        if algorithm_mismatch {
            warn!(
                algorithm = %self.scanner.algorithm(),
                "baseline fingerprints do not match the active fingerprint algorithm"
            );
        }

        let unreadable: BTreeSet<_> = scan.unreadable.keys().cloned().collect();
        let diff = diff_with_unreadable(&self.baseline, &scan.snapshot, &unreadable);

        let baseline_malformed = self.malformed.is_some();
        if baseline_malformed {
            warn!(
                path = %self.store.path().display(),
                "baseline is malformed; database will not be updated"
            );
        }

        let saved = if diff.has_changes() && !baseline_malformed && !algorithm_mismatch {
            self.store.save(&diff.next_baseline)?;
            self.baseline = diff.next_baseline.clone();
            true
        } else {
            false
        };
        info!(changes = diff.change_count(), saved, "integrity check complete");

        Ok(CheckOutcome {
            diff,
            scan,
            saved,
            algorithm_mismatch,
            baseline_malformed,
        })
    }
}
