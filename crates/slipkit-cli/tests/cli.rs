use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../slipkit-core/fixtures")
        .join(name)
        .display()
        .to_string()
}

/// A command pinned to a default config so the user's config is never read.
fn slipkit(dir: &Path) -> Command {
    let config = dir.join("config.json");
    if !config.exists() {
        fs::write(&config, "{}").unwrap();
    }
    let mut cmd = Command::cargo_bin("slipkit").unwrap();
    cmd.arg("-c").arg(config);
    cmd
}

#[test]
fn parse_prints_csv_rows() {
    let dir = TempDir::new().unwrap();
    slipkit(dir.path())
        .args(["parse", &fixture("towel_set.txt"), "-f", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("order_number,order_date"))
        .stdout(predicate::str::contains("Set-3Pcs-White"))
        .stdout(predicate::str::contains("BS-1Pcs-Mid_Blue"));
}

#[test]
fn labels_skip_failed_slips() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("labels.pdf");
    slipkit(dir.path())
        .args(["labels", &fixture("bulk_print.txt"), "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 label(s)"))
        .stderr(predicate::str::contains("bulk_print.txt#2"));

    let doc = lopdf::Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}

#[test]
fn labels_fail_when_nothing_extracts() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("empty.txt");
    fs::write(&input, "Nothing that looks like a packing slip").unwrap();
    let output = dir.path().join("labels.pdf");

    slipkit(dir.path())
        .args(["labels"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to render"));
    assert!(!output.exists());
}

#[test]
fn gift_cards_written_only_for_messages() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("gifts.pdf");

    slipkit(dir.path())
        .args(["gift-cards", &fixture("single_item.txt"), "-o"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("No gift messages"));
    assert!(!output.exists());

    slipkit(dir.path())
        .args(["gift-cards", &fixture("towel_set.txt"), "-o"])
        .arg(&output)
        .assert()
        .success();
    let doc = lopdf::Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn summary_json_totals() {
    let dir = TempDir::new().unwrap();
    slipkit(dir.path())
        .args(["summary", &fixture("towel_set.txt"), "-f", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_orders\": 1"))
        .stdout(predicate::str::contains("\"total_quantity\": 3"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();
    slipkit(dir.path())
        .args(["config", "set", "labels.customization_lines", "4"])
        .assert()
        .success();
    slipkit(dir.path())
        .args(["config", "get", "labels.customization_lines"])
        .assert()
        .success()
        .stdout(predicate::str::diff("4\n"));
}

#[test]
fn missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    slipkit(dir.path())
        .args(["parse", "/nonexistent/*.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}
