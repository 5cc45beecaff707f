//! Utility functions and helpers.
//!
//! - [`hash`]: Content fingerprint strategies and the algorithm selector

/// Fingerprint strategies (rolling hash, MD5, XXH3-128).
pub mod hash;
