//! Snapshot classification.
//!
//! [`diff`] compares a baseline snapshot against a freshly scanned one and sorts every
//! path into exactly one bucket:
//!
//! | Path in baseline | Path in current | Bucket |
//! |---|---|---|
//! | no | yes | [`ChangeKind::Added`] |
//! | yes, different fingerprint | yes | [`ChangeKind::Modified`] |
//! | yes, same fingerprint | yes | [`ChangeKind::Unchanged`] |
//! | yes | no | [`ChangeKind::Deleted`] |
//!
//! [`diff_with_unreadable`] additionally takes the paths the scanner found but could not
//! read. Such a path is [`ChangeKind::Unreadable`] instead of `Deleted` and keeps its old
//! fingerprint in the next baseline, since the file still exists.
//!
//! Both functions are pure; persisting the result is the caller's decision.

use crate::storage::{FilePath, Fingerprint, Snapshot};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Classification of a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Present now, absent from the baseline
    Added,
    /// Present in both with different fingerprints
    Modified,
    /// In the baseline, gone now
    Deleted,
    /// Present in both with the same fingerprint
    Unchanged,
    /// Found by the scan but could not be fingerprinted
    Unreadable,
}

impl ChangeKind {
    /// Report tag, e.g. `NEW`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Added => "NEW",
            Self::Modified => "MODIFIED",
            Self::Deleted => "DELETED",
            Self::Unchanged => "UNCHANGED",
            Self::Unreadable => "UNREADABLE",
        }
    }
}

/// A path whose content changed, with both fingerprints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    /// Baseline fingerprint
    pub old: Fingerprint,
    /// Current fingerprint
    pub new: Fingerprint,
}

/// Bucket counts of a [`DiffResult`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of added paths
    pub added: usize,
    /// Number of modified paths
    pub modified: usize,
    /// Number of deleted paths
    pub deleted: usize,
    /// Number of unchanged paths
    pub unchanged: usize,
    /// Number of unreadable paths
    pub unreadable: usize,
}

/// Disjoint classification of two snapshots plus the merged next baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffResult {
    /// New paths with their fingerprint
    pub added: BTreeMap<FilePath, Fingerprint>,
    /// Changed paths with old and new fingerprint
    pub modified: BTreeMap<FilePath, Modification>,
    /// Vanished paths with their last known fingerprint
    pub deleted: BTreeMap<FilePath, Fingerprint>,
    /// Paths whose fingerprint did not change
    pub unchanged: BTreeSet<FilePath>,
    /// Paths that exist but could not be read this time
    pub unreadable: BTreeSet<FilePath>,
    /// Snapshot that becomes the new baseline
    pub next_baseline: Snapshot,
}

impl DiffResult {
    /// Whether anything was added, modified or deleted.
    ///
    /// Unreadable paths alone do not count: the baseline is kept as it was for them.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty())
    }

    /// Number of added, modified and deleted paths.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// Bucket counts.
    #[must_use]
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            modified: self.modified.len(),
            deleted: self.deleted.len(),
            unchanged: self.unchanged.len(),
            unreadable: self.unreadable.len(),
        }
    }

    /// Bucket `path` was sorted into, if it appeared in either snapshot.
    #[must_use]
    pub fn classify(&self, path: &str) -> Option<ChangeKind> {
        if self.added.contains_key(path) {
            Some(ChangeKind::Added)
        } else if self.modified.contains_key(path) {
            Some(ChangeKind::Modified)
        } else if self.deleted.contains_key(path) {
            Some(ChangeKind::Deleted)
        } else if self.unchanged.contains(path) {
            Some(ChangeKind::Unchanged)
        } else if self.unreadable.contains(path) {
            Some(ChangeKind::Unreadable)
        } else {
            None
        }
    }

    /// All non-unchanged paths with their classification, sorted by path.
    #[must_use]
    pub fn changes(&self) -> Vec<(&FilePath, ChangeKind)> {
        let mut changes: Vec<_> = self
            .added
            .keys()
            .map(|p| (p, ChangeKind::Added))
            .chain(self.modified.keys().map(|p| (p, ChangeKind::Modified)))
            .chain(self.deleted.keys().map(|p| (p, ChangeKind::Deleted)))
            .chain(self.unreadable.iter().map(|p| (p, ChangeKind::Unreadable)))
            .collect();
        changes.sort_by(|a, b| a.0.cmp(b.0));
        changes
    }
}

/// Classify `current` against `baseline`.
///
/// The next baseline equals `current` exactly.
#[must_use]
pub fn diff(baseline: &Snapshot, current: &Snapshot) -> DiffResult {
    diff_with_unreadable(baseline, current, &BTreeSet::new())
}

/// Classify `current` against `baseline`, treating `unreadable` paths as still present.
///
/// A path in `unreadable` that is also in `current` is classified from `current`.
#[must_use]
pub fn diff_with_unreadable(
    baseline: &Snapshot,
    current: &Snapshot,
    unreadable: &BTreeSet<FilePath>,
) -> DiffResult {
    let mut result = DiffResult {
        next_baseline: current.clone(),
        ..DiffResult::default()
    };

    for (path, fingerprint) in current {
        match baseline.get(path) {
            None => {
                result.added.insert(path.clone(), fingerprint.clone());
            }
            Some(old) if old != fingerprint => {
                result.modified.insert(
                    path.clone(),
                    Modification {
                        old: old.clone(),
                        new: fingerprint.clone(),
                    },
                );
            }
            Some(_) => {
                result.unchanged.insert(path.clone());
            }
        }
    }

    for (path, old) in baseline {
        if current.contains(path) {
            continue;
        }
        if unreadable.contains(path) {
            result.unreadable.insert(path.clone());
            result.next_baseline.insert(path.clone(), old.clone());
        } else {
            result.deleted.insert(path.clone(), old.clone());
        }
    }

    for path in unreadable {
        if !baseline.contains(path) && !current.contains(path) {
            result.unreadable.insert(path.clone());
        }
    }

    debug!(
        added = result.added.len(),
        modified = result.modified.len(),
        deleted = result.deleted.len(),
        unchanged = result.unchanged.len(),
        unreadable = result.unreadable.len(),
        "diff computed"
    );
    result
}
