//! Snapshot values and their persisted form.
//!
//! A [`Snapshot`] maps each file path to the [`Fingerprint`] of its content at one
//! point in time. The [`baseline`] submodule loads and saves the snapshot that acts
//! as the reference state between runs.

/// Plain-text baseline database.
pub mod baseline;

use crate::error::InvalidFingerprint;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

/// Path key exactly as produced by the directory walk (no normalization).
pub type FilePath = String;

/// Hex width of the rolling-hash fingerprint.
pub const ROLLING_HEX_LEN: usize = 16;

/// Hex width of the 128-bit digest fingerprints (MD5, XXH3-128).
pub const DIGEST_HEX_LEN: usize = 32;

/// Fixed-width lower-case hexadecimal content digest of a single file.
///
/// Two fingerprints are equal iff their hex strings are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Wraps a hex string produced by one of the fingerprint strategies.
    pub(crate) fn from_hex(hex: String) -> Self {
        debug_assert!(is_valid_hex(&hex), "strategy produced invalid hex: {hex}");
        Self(hex)
    }

    /// Returns the hex digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of hex digits (16 or 32).
    #[must_use]
    pub fn hex_len(&self) -> usize {
        self.0.len()
    }
}

impl FromStr for Fingerprint {
    type Err = InvalidFingerprint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_hex(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidFingerprint(s.to_string()))
        }
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Checks width and alphabet of a fingerprint string.
fn is_valid_hex(s: &str) -> bool {
    (s.len() == ROLLING_HEX_LEN || s.len() == DIGEST_HEX_LEN)
        && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Mapping from file path to fingerprint captured at one point in time.
///
/// Keys are unique. Iteration is in path order, which keeps reports and the
/// persisted form stable; classification never depends on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Path to fingerprint entries
    entries: BTreeMap<FilePath, Fingerprint>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `fingerprint` for `path`, returning the previous fingerprint if any.
    pub fn insert(&mut self, path: FilePath, fingerprint: Fingerprint) -> Option<Fingerprint> {
        self.entries.insert(path, fingerprint)
    }

    /// Fingerprint recorded for `path`.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Fingerprint> {
        self.entries.get(path)
    }

    /// Whether `path` has an entry.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in path order.
    pub fn iter(&self) -> btree_map::Iter<'_, FilePath, Fingerprint> {
        self.entries.iter()
    }

    /// Iterates paths in order.
    pub fn paths(&self) -> impl Iterator<Item = &FilePath> {
        self.entries.keys()
    }
}

impl FromIterator<(FilePath, Fingerprint)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (FilePath, Fingerprint)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(FilePath, Fingerprint)> for Snapshot {
    fn extend<I: IntoIterator<Item = (FilePath, Fingerprint)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = (&'a FilePath, &'a Fingerprint);
    type IntoIter = btree_map::Iter<'a, FilePath, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Snapshot {
    type Item = (FilePath, Fingerprint);
    type IntoIter = btree_map::IntoIter<FilePath, Fingerprint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
