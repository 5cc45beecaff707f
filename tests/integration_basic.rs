mod common;

use anyhow::Result;
use common::TestEnv;
use fim::storage::baseline::BaselineStore;
use fim::utils::hash::{FingerprintStrategy, RollingHash};
use predicates::prelude::*;

#[test]
fn test_init_records_every_file() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "alpha")?;
    env.write("sub/b.txt", "beta")?;
    env.write("sub/deeper/c.txt", "gamma")?;

    env.fim()?
        .args(["init", env.root_arg()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Added: {}", env.key("a.txt"))))
        .stdout(predicate::str::contains(format!(
            "Added: {}",
            env.key("sub/deeper/c.txt")
        )))
        .stdout(predicate::str::contains("Database saved with 3 files."));

    let baseline = BaselineStore::new(&env.database).load()?;
    assert_eq!(baseline.len(), 3);
    assert!(baseline.contains(&env.key("sub/b.txt")));
    Ok(())
}

#[test]
fn test_check_reports_modified_deleted_and_new() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "hello")?;
    env.write("b.txt", "world")?;

    env.fim()?
        .args(["--fingerprint", "rolling", "init", env.root_arg()])
        .assert()
        .success();

    env.write("a.txt", "HELLO")?;
    env.remove("b.txt")?;
    env.write("c.txt", "new")?;

    env.fim()?
        .args(["--fingerprint", "rolling", "check", env.root_arg()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("[MODIFIED] {}", env.key("a.txt"))))
        .stdout(predicate::str::contains(format!(
            "  Old hash: {}",
            RollingHash.fingerprint_bytes(b"hello")
        )))
        .stdout(predicate::str::contains(format!("[DELETED] {}", env.key("b.txt"))))
        .stdout(predicate::str::contains(format!("[NEW] {}", env.key("c.txt"))))
        .stdout(predicate::str::contains("Database updated."));

    let baseline = BaselineStore::new(&env.database).load()?;
    assert_eq!(baseline.len(), 2);
    assert_eq!(
        baseline.get(&env.key("a.txt")),
        Some(&RollingHash.fingerprint_bytes(b"HELLO"))
    );
    assert!(!baseline.contains(&env.key("b.txt")));
    Ok(())
}

#[test]
fn test_check_without_changes_keeps_database() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("etc/hosts", "127.0.0.1 localhost")?;

    env.fim()?.args(["init", env.root_arg()]).assert().success();
    let before = env.database_bytes()?;

    env.fim()?
        .args(["check", env.root_arg()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unchanged: 1"))
        .stdout(predicate::str::contains(
            "No changes detected. Database not updated.",
        ));

    assert_eq!(env.database_bytes()?, before);
    Ok(())
}

#[test]
fn test_second_check_is_clean() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "one")?;
    env.fim()?.args(["init", env.root_arg()]).assert().success();

    env.write("a.txt", "two")?;
    env.fim()?.args(["check", env.root_arg()]).assert().success();

    env.fim()?
        .args(["check", env.root_arg()])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes detected."));
    Ok(())
}

#[test]
fn test_check_missing_directory_fails_and_keeps_database() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "alpha")?;
    env.fim()?.args(["init", env.root_arg()]).assert().success();
    let before = env.database_bytes()?;

    let missing = env.path().join("does-not-exist");
    env.fim()?
        .args(["check", missing.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Directory does not exist"));

    assert_eq!(env.database_bytes()?, before);
    Ok(())
}

#[test]
fn test_verbose_error_is_printed_once() -> Result<()> {
    let env = TestEnv::new()?;
    let missing = env.path().join("does-not-exist");

    env.fim()?
        .args(["--verbose", "check", missing.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("Directory does not exist").count() == 1
        }));
    Ok(())
}

#[test]
fn test_check_keeps_malformed_database() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "alpha")?;
    env.write("b.txt", "beta")?;
    env.fim()?.args(["init", env.root_arg()]).assert().success();

    let text = String::from_utf8(env.database_bytes()?)?;
    let mut lines: Vec<&str> = text.lines().collect();
    lines.insert(1, "garbage");
    std::fs::write(&env.database, format!("{}\n", lines.join("\n")))?;
    let corrupted = env.database_bytes()?;
    env.write("b.txt", "tampered")?;

    env.fim()?
        .args(["check", env.root_arg()])
        .assert()
        .success()
        .stderr(predicate::str::contains("malformed and was not updated"))
        .stdout(predicate::str::contains("Database not updated."));

    assert_eq!(env.database_bytes()?, corrupted);
    Ok(())
}

#[test]
fn test_init_missing_directory_writes_nothing() -> Result<()> {
    let env = TestEnv::new()?;
    let missing = env.path().join("does-not-exist");

    env.fim()?
        .args(["init", missing.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));

    assert!(!env.database.exists());
    Ok(())
}

#[test]
fn test_list_empty_and_populated() -> Result<()> {
    let env = TestEnv::new()?;

    env.fim()?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No files are currently being monitored.",
        ));

    env.write("x.conf", "x")?;
    env.write("y.conf", "y")?;
    env.fim()?.args(["init", env.root_arg()]).assert().success();

    env.fim()?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[MONITORED FILES]"))
        .stdout(predicate::str::contains(env.key("x.conf")))
        .stdout(predicate::str::contains("Total: 2 files"));
    Ok(())
}

#[test]
fn test_config_fingerprint_applies_to_init() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "hello")?;

    env.fim()?
        .args(["config", "core.fingerprint", "rolling"])
        .assert()
        .success();
    assert!(env.config.exists());

    env.fim()?
        .args(["config", "core.fingerprint"])
        .assert()
        .success()
        .stdout("rolling\n");

    env.fim()?.args(["init", env.root_arg()]).assert().success();

    let baseline = BaselineStore::new(&env.database).load()?;
    assert_eq!(
        baseline.get(&env.key("a.txt")),
        Some(&RollingHash.fingerprint_bytes(b"hello"))
    );
    Ok(())
}

#[test]
fn test_quiet_init_keeps_report() -> Result<()> {
    let env = TestEnv::new()?;
    env.write("a.txt", "alpha")?;

    env.fim()?
        .args(["-q", "init", env.root_arg()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database saved with 1 file."))
        .stderr(predicate::str::is_empty());
    Ok(())
}

#[test]
fn test_help_exits_zero() -> Result<()> {
    let env = TestEnv::new()?;

    env.fim()?
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
    env.fim()?.arg("--help").assert().success();
    Ok(())
}

#[test]
fn test_usage_errors_exit_one() -> Result<()> {
    let env = TestEnv::new()?;

    env.fim()?
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    env.fim()?
        .arg("frobnicate")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage"));
    env.fim()?.arg("init").assert().code(1);
    Ok(())
}

#[test]
fn test_completion_script() -> Result<()> {
    let env = TestEnv::new()?;

    env.fim()?
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fim"));
    Ok(())
}
