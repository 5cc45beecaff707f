//! Content fingerprint strategies.
//!
//! Every strategy reads the file as a plain byte stream, so the result depends only on
//! content, never on name, timestamps or permissions. One strategy is selected per run
//! through [`FingerprintAlgorithm`].

use crate::storage::{DIGEST_HEX_LEN, Fingerprint, ROLLING_HEX_LEN};
use clap::ValueEnum;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use xxhash_rust::xxh3::{Xxh3, xxh3_128};

/// Read size used when streaming file content through a strategy.
const CHUNK_SIZE: usize = 65536;

/// Seed of the rolling hash accumulator.
const ROLLING_SEED: u64 = 5381;

/// A content fingerprint function.
pub trait FingerprintStrategy: Send + Sync {
    /// Algorithm implemented by this strategy.
    fn algorithm(&self) -> FingerprintAlgorithm;

    /// Fingerprints an in-memory byte slice.
    fn fingerprint_bytes(&self, data: &[u8]) -> Fingerprint;

    /// Fingerprints a byte stream, consuming it to the end.
    ///
    /// # Errors
    /// Returns the first read error from `reader`.
    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint>;

    /// Opens `path` and fingerprints its content.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or read.
    fn fingerprint_file(&self, path: &Path) -> io::Result<Fingerprint> {
        let mut file = File::open(path)?;
        self.fingerprint_reader(&mut file)
    }
}

/// Feeds `reader` to `update` in fixed-size chunks until end of stream.
fn stream_chunks(reader: &mut dyn Read, mut update: impl FnMut(&[u8])) -> io::Result<()> {
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        update(&buffer[..bytes_read]);
    }

    Ok(())
}

/// Multiplicative string hash (`h = h * 33 + byte`, seed 5381) over the whole content.
///
/// Non-cryptographic and collision-prone; the low-assurance mode with no digest
/// dependency. Output is the 64-bit accumulator as 16 hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct RollingHash;

impl RollingHash {
    /// Advances the accumulator over `bytes`.
    fn update(h: u64, bytes: &[u8]) -> u64 {
        bytes
            .iter()
            .fold(h, |h, &b| h.wrapping_mul(33).wrapping_add(u64::from(b)))
    }

    /// Renders the accumulator.
    fn finish(h: u64) -> Fingerprint {
        Fingerprint::from_hex(format!("{h:016x}"))
    }
}

impl FingerprintStrategy for RollingHash {
    fn algorithm(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Rolling
    }

    fn fingerprint_bytes(&self, data: &[u8]) -> Fingerprint {
        Self::finish(Self::update(ROLLING_SEED, data))
    }

    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
        let mut h = ROLLING_SEED;
        stream_chunks(reader, |chunk| h = Self::update(h, chunk))?;
        Ok(Self::finish(h))
    }
}

/// MD5 digest, 32 hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digest;

impl FingerprintStrategy for Md5Digest {
    fn algorithm(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Md5
    }

    fn fingerprint_bytes(&self, data: &[u8]) -> Fingerprint {
        Fingerprint::from_hex(format!("{:x}", Md5::digest(data)))
    }

    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
        let mut hasher = Md5::new();
        stream_chunks(reader, |chunk| hasher.update(chunk))?;
        Ok(Fingerprint::from_hex(format!("{:x}", hasher.finalize())))
    }
}

/// XXH3 128-bit hash, 32 hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh3Digest;

impl FingerprintStrategy for Xxh3Digest {
    fn algorithm(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Xxh3
    }

    fn fingerprint_bytes(&self, data: &[u8]) -> Fingerprint {
        Fingerprint::from_hex(format!("{:032x}", xxh3_128(data)))
    }

    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
        let mut hasher = Xxh3::new();
        stream_chunks(reader, |chunk| hasher.update(chunk))?;
        Ok(Fingerprint::from_hex(format!("{:032x}", hasher.digest128())))
    }
}

/// Selectable fingerprint algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// Dependency-free rolling hash (16 hex digits, collisions expected)
    Rolling,
    /// MD5 content digest (32 hex digits)
    #[default]
    Md5,
    /// XXH3-128 (32 hex digits, fast, non-cryptographic)
    Xxh3,
}

impl FingerprintAlgorithm {
    /// Strategy implementing this algorithm.
    #[must_use]
    pub fn strategy(self) -> Box<dyn FingerprintStrategy> {
        match self {
            Self::Rolling => Box::new(RollingHash),
            Self::Md5 => Box::new(Md5Digest),
            Self::Xxh3 => Box::new(Xxh3Digest),
        }
    }

    /// Width of the fingerprints this algorithm produces.
    #[must_use]
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Rolling => ROLLING_HEX_LEN,
            Self::Md5 | Self::Xxh3 => DIGEST_HEX_LEN,
        }
    }

    /// Lower-case name as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rolling => "rolling",
            Self::Md5 => "md5",
            Self::Xxh3 => "xxh3",
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
