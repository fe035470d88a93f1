//! Command line surface tests

use assert_cmd::Command;
use predicates::prelude::*;

fn erply() -> Command {
    let mut cmd = Command::cargo_bin("erply").unwrap();
    cmd.env_remove("ERPLY_CLIENT_CODE")
        .env_remove("ERPLY_SESSION_KEY")
        .env_remove("ERPLY_API_URL");
    cmd
}

#[test]
fn test_help_lists_commands() {
    erply()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("suppliers"))
        .stdout(predicate::str::contains("price-lists"))
        .stdout(predicate::str::contains("endpoints"))
        .stdout(predicate::str::contains("session"));
}

#[test]
fn test_missing_client_code_fails() {
    erply()
        .arg("endpoints")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERPLY_CLIENT_CODE"));
}

#[test]
fn test_zero_pages_rejected() {
    erply()
        .args(["suppliers", "--pages", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pages"));
}

#[test]
fn test_session_requires_session_key() {
    erply()
        .env("ERPLY_CLIENT_CODE", "104514")
        .arg("session")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERPLY_SESSION_KEY"));
}
