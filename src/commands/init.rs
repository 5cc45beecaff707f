use super::{files, report_malformed, report_skipped};
use crate::FimContext;
use crate::monitor::{InitOutcome, Monitor};
use crate::output;
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

/// Execute init command
///
/// Scans `directory` and replaces the baseline with the result.
///
/// # Errors
///
/// Returns an error if:
/// - The directory does not exist or cannot be opened
/// - The baseline database cannot be read or written
pub fn execute(ctx: &FimContext, directory: &Path) -> Result<()> {
    let mut monitor = Monitor::from_context(ctx)?;
    if let Some(record) = monitor.malformed_record() {
        report_malformed(ctx.database_path(), record);
    }

    output::action("Initializing", &directory.display().to_string());
    output::verbose(&format!(
        "Fingerprint: {}, database: {}",
        monitor.scanner().algorithm(),
        ctx.database_path().display()
    ));

    let outcome = monitor.initialize(directory)?;
    report_skipped(&outcome.scan);

    write_report(&mut io::stdout().lock(), &outcome)?;
    if outcome.previous_entries > 0 {
        output::info(&format!(
            "Replaced previous baseline of {}",
            files(outcome.previous_entries)
        ));
    }
    output::success(&format!(
        "Database saved to {}",
        ctx.database_path().display()
    ));
    Ok(())
}

/// Write the init report: one line per recorded file, then the totals.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_report<W: Write>(out: &mut W, outcome: &InitOutcome) -> io::Result<()> {
    for path in outcome.scan.snapshot.paths() {
        writeln!(out, "{} {path}", "Added:".green())?;
    }

    let total = outcome.scan.snapshot.len();
    writeln!(out)?;
    writeln!(out, "Total files initialized: {total}")?;
    writeln!(out, "Database saved with {}.", files(total))?;
    Ok(())
}
