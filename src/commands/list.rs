use super::{files, report_malformed};
use crate::FimContext;
use crate::output;
use crate::storage::Snapshot;
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

/// Execute list command
///
/// Prints the persisted baseline without scanning anything.
///
/// # Errors
///
/// Returns an error if the baseline database exists but cannot be read.
pub fn execute(ctx: &FimContext) -> Result<()> {
    let loaded = ctx.baseline_store().load_detailed()?;
    if let Some(record) = &loaded.malformed {
        report_malformed(ctx.database_path(), record);
    }
    output::verbose(&format!("Database: {}", ctx.database_path().display()));

    write_listing(&mut io::stdout().lock(), &loaded.snapshot)?;
    Ok(())
}

/// Write every baseline entry with its fingerprint, sorted by path.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_listing<W: Write>(out: &mut W, baseline: &Snapshot) -> io::Result<()> {
    if baseline.is_empty() {
        writeln!(out, "No files are currently being monitored.")?;
        return Ok(());
    }

    writeln!(out, "{}", "[MONITORED FILES]".bold())?;
    writeln!(out, "{}", output::rule('='))?;
    for (path, fingerprint) in baseline {
        writeln!(out, "{path}")?;
        writeln!(out, "  Hash: {}", fingerprint.to_string().dimmed())?;
    }
    writeln!(out, "{}", output::rule('='))?;
    writeln!(out, "Total: {}", files(baseline.len()))?;
    Ok(())
}
