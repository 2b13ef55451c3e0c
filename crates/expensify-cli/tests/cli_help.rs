use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("expensify")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("signup"))
        .stdout(predicate::str::contains("verify-otp"))
        .stdout(predicate::str::contains("expenses"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn test_expenses_help_shows_subcommands() {
    cargo_bin_cmd!("expensify")
        .args(["expenses", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("add"))
        .stdout(predicate::str::contains("suggestions"));
}

#[test]
fn test_stats_rejects_unknown_period() {
    cargo_bin_cmd!("expensify")
        .args(["stats", "--period", "hourly"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown period"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("expensify")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
