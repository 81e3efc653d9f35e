//! E2E tests for the debdu binary against status-file fixtures.
//!
//! Covers the full pipeline: stanza parsing, alias fallback, cycle-safe
//! size aggregation, report order and percentages, and the two exit
//! policies (missing size is fatal, unresolved dependencies are not).

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

fn debdu_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("debdu"));
    cmd.env("DEBDU_LOG", "warn");
    cmd
}

fn write_fixture(dir: &Path, stanzas: &str) -> PathBuf {
    let path = dir.join("status");
    fs::write(&path, stanzas).expect("write fixture");
    path
}

fn json_report(fixture: &Path) -> Value {
    let output = debdu_cmd()
        .args(["--status-file"])
        .arg(fixture)
        .arg("--json")
        .output()
        .expect("run debdu");
    assert!(
        output.status.success(),
        "debdu failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON report")
}

fn row<'a>(report: &'a Value, name: &str) -> &'a Value {
    report["rows"]
        .as_array()
        .expect("rows array")
        .iter()
        .find(|r| r["name"] == name)
        .unwrap_or_else(|| panic!("no row for {name}"))
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn report_lists_every_package_sorted_ascending() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: big\nInstalled-Size: 300\nDepends: small\n\n\
         Package: small\nInstalled-Size: 10\n\n\
         Package: medium\nInstalled-Size: 90\n",
    );

    let output = debdu_cmd()
        .args(["--status-file"])
        .arg(&fixture)
        .output()
        .expect("run debdu");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let small = stdout.find("small ").expect("small row");
    let medium = stdout.find("medium ").expect("medium row");
    let big = stdout.find("big ").expect("big row");
    assert!(small < medium && medium < big, "rows not ascending:\n{stdout}");
    // big transitively includes small: 300 + 10.
    assert!(stdout.contains("big 300 75.00% 310 77.50%"), "got:\n{stdout}");
}

#[test]
fn alias_fallback_feeds_transitive_size() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: app\nInstalled-Size: 10\nDepends: mta\n\n\
         Package: exim4\nInstalled-Size: 40\nProvides: mta\n",
    );

    let report = json_report(&fixture);
    // No package is named "mta"; exim4 provides it, so app's transitive
    // size must include exim4.
    assert_eq!(row(&report, "app")["transitive_size"], 50);
}

#[test]
fn cycles_terminate_and_count_each_member_once() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: a\nInstalled-Size: 3\nDepends: b\n\n\
         Package: b\nInstalled-Size: 5\nDepends: a\n\n\
         Package: c\nInstalled-Size: 7\nDepends: c\n",
    );

    let report = json_report(&fixture);
    assert_eq!(row(&report, "a")["transitive_size"], 8);
    assert_eq!(row(&report, "b")["transitive_size"], 8);
    // Self-dependency: c is counted exactly once.
    assert_eq!(row(&report, "c")["transitive_size"], 7);
}

#[test]
fn own_percentages_sum_to_one_hundred() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: a\nInstalled-Size: 13\n\n\
         Package: b\nInstalled-Size: 29\n\n\
         Package: c\nInstalled-Size: 58\n",
    );

    let report = json_report(&fixture);
    let sum: f64 = report["rows"]
        .as_array()
        .expect("rows array")
        .iter()
        .map(|r| r["own_percent"].as_f64().expect("percent"))
        .sum();
    assert!((sum - 100.0).abs() < 1e-6, "sum was {sum}");
}

#[test]
fn top_limits_to_largest_packages() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: small\nInstalled-Size: 1\n\n\
         Package: big\nInstalled-Size: 100\n",
    );

    debdu_cmd()
        .args(["--status-file"])
        .arg(&fixture)
        .args(["--top", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("big"))
        .stdout(predicate::str::contains("small").not());
}

#[test]
fn empty_status_file_is_a_valid_empty_report() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(dir.path(), "");

    debdu_cmd()
        .args(["--status-file"])
        .arg(&fixture)
        .assert()
        .success()
        .stdout(predicate::str::contains("Package OwnSize Percent"));
}

// ---------------------------------------------------------------------------
// Failure policy
// ---------------------------------------------------------------------------

#[test]
fn missing_installed_size_aborts_before_any_report() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: fine\nInstalled-Size: 5\n\n\
         Package: broken\nDepends: fine\n",
    );

    let output = debdu_cmd()
        .args(["--status-file"])
        .arg(&fixture)
        .output()
        .expect("run debdu");
    assert!(!output.status.success(), "missing size must be fatal");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken"), "error must name the package: {stderr}");
    assert!(
        !String::from_utf8_lossy(&output.stdout).contains("Package OwnSize"),
        "no report may be printed on a data-integrity failure"
    );
}

#[test]
fn unresolved_dependency_warns_but_exits_zero() {
    let dir = TempDir::new().expect("tempdir");
    let fixture = write_fixture(
        dir.path(),
        "Package: app\nInstalled-Size: 20\nDepends: no-such-thing\n",
    );

    let output = debdu_cmd()
        .args(["--status-file"])
        .arg(&fixture)
        .output()
        .expect("run debdu");
    assert!(output.status.success(), "unresolved deps are warnings only");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no-such-thing") && stderr.contains("app"),
        "warning must name both sides: {stderr}"
    );

    // The package still appears, with the missing edge excluded.
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app 20 100.00% 20 100.00%"), "got:\n{stdout}");
}

#[test]
fn nonexistent_status_file_fails_with_context() {
    debdu_cmd()
        .args(["--status-file", "/no/such/status/file"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("/no/such/status/file"));
}
