//! Command-line interface definitions for fim.
//!
//! This module contains all CLI argument parsing structures using clap's derive macros.
//! The CLI definitions are shared between the main binary and build tools (like xtask)
//! for man page generation.
//!
//! Note: Field-level documentation is provided via clap attributes and doc comments,
//! so we allow missing_docs for this module to avoid redundant documentation.

#![allow(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

use crate::utils::hash::FingerprintAlgorithm;
use crate::{CONFIG_PATH_ENV, DATABASE_ENV};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for fim.
#[derive(Parser)]
#[command(
    name = "fim",
    version = crate::VERSION,
    about = "Point-in-time file integrity monitor",
    long_about = "Records a content fingerprint for every file below a directory and reports \
                  files that were added, modified or deleted since the baseline was taken",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Baseline database file
    #[arg(long, global = true, env = DATABASE_ENV, value_name = "FILE")]
    pub database: Option<PathBuf>,

    /// Configuration file
    #[arg(long, global = true, env = CONFIG_PATH_ENV, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Fingerprint algorithm for this run
    #[arg(long, global = true, value_enum, value_name = "ALGORITHM")]
    pub fingerprint: Option<FingerprintAlgorithm>,
}

/// All available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Record a new baseline for a directory
    Init {
        /// Directory to monitor
        directory: PathBuf,
    },

    /// Compare a directory against the baseline and update it
    Check {
        /// Directory to check
        directory: PathBuf,
    },

    /// Show the files in the baseline
    List,

    /// Show or set configuration values
    Config {
        /// Configuration key (e.g. core.fingerprint)
        key: Option<String>,

        /// Value to set
        #[arg(requires = "key")]
        value: Option<String>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
