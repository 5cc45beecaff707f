use super::{files, report_malformed, report_skipped};
use crate::FimContext;
use crate::diff::ChangeKind;
use crate::monitor::{CheckOutcome, Monitor};
use crate::output;
use anyhow::Result;
use chrono::{DateTime, Local};
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

/// Execute check command
///
/// Scans `directory`, reports every change against the baseline and saves the
/// updated baseline if anything was added, modified or deleted. A malformed baseline,
/// or one recorded with another fingerprint algorithm, is reported but never
/// rewritten. Finding changes is not an error.
///
/// # Errors
///
/// Returns an error if:
/// - Any part of the directory tree cannot be traversed
/// - The baseline database cannot be read or written
pub fn execute(ctx: &FimContext, directory: &Path) -> Result<()> {
    let mut monitor = Monitor::from_context(ctx)?;
    if let Some(record) = monitor.malformed_record() {
        report_malformed(ctx.database_path(), record);
    }
    if !monitor.store().path().exists() {
        output::warning(&format!(
            "No baseline at {}; every file will be reported as new",
            ctx.database_path().display()
        ));
    }

    let outcome = monitor.check(directory)?;
    report_skipped(&outcome.scan);
    if outcome.baseline_malformed {
        output::warning(&format!(
            "Database {} is malformed and was not updated; run init to rebuild it",
            ctx.database_path().display()
        ));
    }
    if outcome.algorithm_mismatch {
        output::warning(&format!(
            "Baseline was not recorded with the {} fingerprint and was not updated; run init to rebuild it",
            monitor.scanner().algorithm()
        ));
    }

    write_report(&mut io::stdout().lock(), &outcome, directory, Local::now())?;
    Ok(())
}

/// Write the check report: header, one entry per change, summary and save status.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_report<W: Write>(
    out: &mut W,
    outcome: &CheckOutcome,
    directory: &Path,
    checked_at: DateTime<Local>,
) -> io::Result<()> {
    let diff = &outcome.diff;

    writeln!(out, "{}", output::rule('='))?;
    writeln!(
        out,
        "File Integrity Check - {}",
        checked_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "Directory: {}", directory.display())?;
    writeln!(out, "{}", output::rule('='))?;

    for (path, kind) in diff.changes() {
        match kind {
            ChangeKind::Added => {
                writeln!(out, "{} {path}", tag(kind))?;
                if let Some(fingerprint) = diff.added.get(path) {
                    writeln!(out, "  Hash: {fingerprint}")?;
                }
            }
            ChangeKind::Modified => {
                writeln!(out, "{} {path}", tag(kind))?;
                if let Some(change) = diff.modified.get(path) {
                    writeln!(out, "  Old hash: {}", change.old)?;
                    writeln!(out, "  New hash: {}", change.new)?;
                }
            }
            ChangeKind::Deleted | ChangeKind::Unreadable => {
                writeln!(out, "{} {path}", tag(kind))?;
            }
            ChangeKind::Unchanged => {}
        }
    }

    let summary = diff.summary();
    writeln!(out, "{}", output::rule('-'))?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Unchanged: {}", summary.unchanged)?;
    writeln!(out, "  Modified:  {}", summary.modified)?;
    writeln!(out, "  Added:     {}", summary.added)?;
    writeln!(out, "  Deleted:   {}", summary.deleted)?;
    if summary.unreadable > 0 {
        writeln!(out, "  Unreadable: {}", summary.unreadable)?;
    }
    writeln!(
        out,
        "Scanned {} in {}",
        files(outcome.scan.snapshot.len() + outcome.scan.unreadable.len()),
        humantime::format_duration(whole_millis(outcome.scan.elapsed))
    )?;
    writeln!(out, "{}", output::rule('='))?;

    if outcome.saved {
        writeln!(
            out,
            "{} change(s) detected. Database updated.",
            diff.change_count()
        )?;
    } else if outcome.withheld() {
        writeln!(
            out,
            "{} change(s) detected. Database not updated.",
            diff.change_count()
        )?;
    } else {
        writeln!(out, "No changes detected. Database not updated.")?;
    }
    Ok(())
}

/// Colored `[TAG]` for a change kind.
fn tag(kind: ChangeKind) -> colored::ColoredString {
    let text = format!("[{}]", kind.tag());
    match kind {
        ChangeKind::Added => text.green().bold(),
        ChangeKind::Modified => text.yellow().bold(),
        ChangeKind::Deleted => text.red().bold(),
        ChangeKind::Unreadable => text.magenta().bold(),
        ChangeKind::Unchanged => text.normal(),
    }
}

fn whole_millis(elapsed: Duration) -> Duration {
    Duration::from_millis(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_with_unreadable;
    use crate::scanner::ScanResult;
    use crate::storage::{Fingerprint, Snapshot};
    use chrono::TimeZone;
    use std::collections::BTreeSet;

    fn fp(n: u64) -> Fingerprint {
        format!("{n:016x}").parse().unwrap()
    }

    fn outcome(baseline: &[(&str, u64)], current: &[(&str, u64)], unreadable: &[&str]) -> CheckOutcome {
        let snapshot = |entries: &[(&str, u64)]| -> Snapshot {
            entries
                .iter()
                .map(|(p, n)| ((*p).to_string(), fp(*n)))
                .collect()
        };
        let unreadable: BTreeSet<String> = unreadable.iter().map(|p| (*p).to_string()).collect();
        let current = snapshot(current);
        let diff = diff_with_unreadable(&snapshot(baseline), &current, &unreadable);
        let saved = diff.has_changes();

        CheckOutcome {
            diff,
            scan: ScanResult {
                snapshot: current,
                unreadable: unreadable
                    .into_iter()
                    .map(|p| (p, "Permission denied".to_string()))
                    .collect(),
                elapsed: Duration::from_micros(12_345),
                ..ScanResult::default()
            },
            saved,
            algorithm_mismatch: false,
            baseline_malformed: false,
        }
    }

    fn render(outcome: &CheckOutcome) -> String {
        colored::control::set_override(false);
        let checked_at = Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
        let mut out = Vec::new();
        write_report(&mut out, outcome, Path::new("/srv/www"), checked_at).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_header() {
        let report = render(&outcome(&[], &[], &[]));

        assert!(report.contains("File Integrity Check - 2026-03-14 09:26:53"));
        assert!(report.contains("Directory: /srv/www"));
        assert!(report.contains("Scanned 0 files in 12ms"));
    }

    #[test]
    fn test_report_lists_each_change() {
        let report = render(&outcome(
            &[("/srv/www/index.html", 1), ("/srv/www/old.php", 2), ("/srv/www/robots.txt", 3)],
            &[("/srv/www/index.html", 10), ("/srv/www/robots.txt", 3), ("/srv/www/shell.php", 4)],
            &[],
        ));

        assert!(report.contains(&format!(
            "[MODIFIED] /srv/www/index.html\n  Old hash: {}\n  New hash: {}\n",
            fp(1),
            fp(10)
        )));
        assert!(report.contains("[DELETED] /srv/www/old.php\n"));
        assert!(report.contains(&format!("[NEW] /srv/www/shell.php\n  Hash: {}\n", fp(4))));
        assert!(!report.contains("robots.txt"));
        assert!(report.contains("  Unchanged: 1\n"));
        assert!(report.contains("  Modified:  1\n"));
        assert!(report.contains("  Added:     1\n"));
        assert!(report.contains("  Deleted:   1\n"));
        assert!(report.contains("3 change(s) detected. Database updated."));
    }

    #[test]
    fn test_report_without_changes() {
        let report = render(&outcome(&[("/srv/www/a", 1)], &[("/srv/www/a", 1)], &[]));

        assert!(!report.contains('['));
        assert!(report.ends_with("No changes detected. Database not updated.\n"));
    }

    #[test]
    fn test_report_unreadable_only() {
        let report = render(&outcome(&[("/srv/www/secret", 1)], &[], &["/srv/www/secret"]));

        assert!(report.contains("[UNREADABLE] /srv/www/secret\n"));
        assert!(report.contains("  Unreadable: 1\n"));
        assert!(report.contains("No changes detected. Database not updated."));
    }

    #[test]
    fn test_report_changes_against_untrusted_baseline() {
        let mut withheld = outcome(
            &[("/srv/www/a", 1)],
            &[("/srv/www/a", 1), ("/srv/www/b", 2)],
            &[],
        );
        withheld.saved = false;
        withheld.baseline_malformed = true;

        let report = render(&withheld);

        assert!(report.contains("[NEW] /srv/www/b\n"));
        assert!(report.ends_with("1 change(s) detected. Database not updated.\n"));
        assert!(!report.contains("Database updated."));
    }

    #[test]
    fn test_whole_millis_truncates() {
        assert_eq!(
            whole_millis(Duration::from_micros(2_999)),
            Duration::from_millis(2)
        );
    }
}
