//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn hms() -> Command {
    let mut cmd = Command::cargo_bin("hms").unwrap();
    cmd.env_remove("DATABASE_URL").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_top_level_help_lists_commands() {
    hms()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("seed-roles"))
        .stdout(predicate::str::contains("departments"));
}

#[test]
fn test_roles_help() {
    hms()
        .arg("roles")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Username to look up"));
}

#[test]
fn test_departments_help() {
    hms()
        .arg("departments")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("JSON array"));
}

#[test]
fn test_roles_requires_username() {
    hms()
        .arg("roles")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<USERNAME>"));
}

#[test]
fn test_missing_database_url_is_reported() {
    let dir = std::env::temp_dir();
    hms()
        .current_dir(dir)
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL"));
}

#[test]
fn test_malformed_database_url_is_reported() {
    hms()
        .arg("--database-url")
        .arg("not a url")
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect"));
}

/// Working directory holding a `.env` that points at a closed port.
fn dotenv_dir(rust_log: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env"),
        format!(
            "DATABASE_URL=postgres://hms@127.0.0.1:1/hms\n\
             HMS_DB_ACQUIRE_TIMEOUT_SECS=2\n\
             RUST_LOG={rust_log}\n"
        ),
    )
    .unwrap();
    dir
}

#[test]
fn test_dotenv_rust_log_is_honoured() {
    let quiet = dotenv_dir("off");
    hms()
        .current_dir(quiet.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect"))
        .stderr(predicate::str::contains("Connecting to database").not());

    let chatty = dotenv_dir("info");
    hms()
        .current_dir(chatty.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Connecting to database"));
}
