//! CLI command implementations.
//!
//! Each command runs one library operation and prints its report. Reports are rendered
//! into any [`std::io::Write`] so they can be checked without a terminal; status and
//! warnings go through [`crate::output`].

pub mod check;
pub mod config;
pub mod init;
pub mod list;

use crate::output;
use crate::scanner::ScanResult;
use crate::storage::baseline::MalformedRecord;
use std::path::Path;

/// Warn about everything a scan skipped.
pub(crate) fn report_skipped(scan: &ScanResult) {
    for error in &scan.walk_errors {
        output::warning(&format!("Skipped: {error}"));
    }
    for path in &scan.unrepresentable {
        output::warning(&format!(
            "Skipped (path cannot be stored in the database): {}",
            path.display()
        ));
    }
    for (path, reason) in &scan.unreadable {
        output::warning(&format!("Could not read {path}: {reason}"));
    }
}

/// Warn that loading the database stopped early.
pub(crate) fn report_malformed(database: &Path, record: &MalformedRecord) {
    output::warning(&format!(
        "{}:{}: malformed record {:?}; later records were ignored",
        database.display(),
        record.line,
        record.content
    ));
}

/// `1 file` / `2 files`.
pub(crate) fn files(count: usize) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{count} files")
    }
}
