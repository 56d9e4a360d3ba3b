// Integration tests for the `locality-lens` binary.
// Run with: cargo test --test cli_tests -- --nocapture

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

const DATASET: &str = "\
Final Location,Year,Flat - Weighted Average Rate,Demand Index,Size (sqft)
Wakad,2020,6000,7.0,900
Wakad,2021,6300,7.5,1000
Wakad,2022,,8.0,1100
Aundh,2020,9800,6.0,1200
Aundh,2022,9700,6.2,1150
Wakad,2023,6900,8.5,950
";

fn lens(data: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_locality-lens"))
        .arg("--data")
        .arg(data)
        .args(args)
        .output()
        .expect("run locality-lens")
}

fn json(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("valid JSON on stdout")
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

#[test]
fn analyze_reports_summary_chart_and_table() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let output = lens(&data, &["analyze", "WAK", "--limit", "2"]);
    assert!(output.status.success(), "exit code was {:?}", output.status);

    let body = json(&output);
    assert_eq!(body["ok"], true);
    assert_eq!(body["matched_rows"], 4);
    assert_eq!(body["area_column_used"], "Final Location");
    assert_eq!(body["price_column_used"], "Flat - Weighted Average Rate");

    let table = body["table"].as_array().unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[0]["Year"], 2020);
    assert_eq!(table[1]["Year"], 2021);

    let price = body["chart"]["price_trend"].as_array().unwrap();
    assert_eq!(price.len(), 3, "2022 has no rate and is dropped");
    assert_eq!(price[0]["year"], 2020);
    assert_eq!(body["chart"]["demand_trend"].as_array().unwrap().len(), 4);

    let summary = body["summary"].as_str().unwrap();
    assert!(summary.starts_with("Analysis for **WAK**:"));
    assert!(summary.contains("is rising"));
    assert!(summary.contains("positive signals"));
}

#[test]
fn analyze_missing_value_rendered_as_empty_string() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let body = json(&lens(&data, &["analyze", "wakad"]));
    assert_eq!(body["table"][2]["Flat - Weighted Average Rate"], "");
}

#[test]
fn analyze_without_matches_is_not_an_error() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let output = lens(&data, &["analyze", "Baner"]);
    assert!(output.status.success());
    let body = json(&output);
    assert_eq!(body["summary"], "No records found for the specified area.");
    assert_eq!(body["table"].as_array().unwrap().len(), 0);
    assert_eq!(body["chart"], serde_json::json!({}));
}

#[test]
fn blank_query_is_a_usage_error() {
    let dir = tempdir().unwrap();
    let output = lens(&dir.path().join("absent.csv"), &["analyze", "  "]);
    assert_eq!(output.status.code(), Some(2));
    let body = json(&output);
    assert_eq!(body["ok"], false);
}

#[test]
fn non_numeric_limit_is_rejected() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let output = lens(&data, &["analyze", "wakad", "--limit", "ten"]);
    assert!(!output.status.success());
}

#[test]
fn missing_dataset_is_a_server_error() {
    let dir = tempdir().unwrap();
    let output = lens(&dir.path().join("absent.csv"), &["analyze", "wakad"]);
    assert_eq!(output.status.code(), Some(1));
    let body = json(&output);
    assert_eq!(body["error"], "No dataset loaded");
}

// ---------------------------------------------------------------------------
// compare
// ---------------------------------------------------------------------------

#[test]
fn compare_keeps_each_label_independent() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let output = lens(&data, &["compare", "Wakad,Nowhere", "aundh"]);
    assert!(output.status.success());
    let body = json(&output);
    let comparisons = body["comparisons"].as_object().unwrap();
    assert_eq!(comparisons.len(), 3);
    assert_eq!(comparisons["Nowhere"]["matched_rows"], 0);
    assert_eq!(comparisons["Wakad"]["matched_rows"], 4);
    assert_eq!(comparisons["aundh"]["matched_rows"], 2);
}

// ---------------------------------------------------------------------------
// upload / download / columns
// ---------------------------------------------------------------------------

#[test]
fn upload_replaces_dataset_and_rejects_garbage() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let candidate = dir.path().join("new.csv");
    fs::write(&candidate, "Locality,Year,Price\nBaner,2024,8800\n").unwrap();
    let output = lens(&data, &["upload", candidate.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(json(&output)["rows"], 1);

    let body = json(&lens(&data, &["analyze", "baner"]));
    assert_eq!(body["matched_rows"], 1);

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, "not json").unwrap();
    let output = lens(&data, &["upload", garbage.to_str().unwrap()]);
    assert!(!output.status.success());
    assert_eq!(json(&lens(&data, &["analyze", "baner"]))["matched_rows"], 1);
}

#[test]
fn columns_lists_resolved_roles() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    fs::write(&data, DATASET).unwrap();

    let body = json(&lens(&data, &["columns"]));
    assert_eq!(body["rows"], 6);
    assert_eq!(body["roles"]["area"], "Final Location");
    assert_eq!(body["roles"]["year"], "Year");
    assert_eq!(body["roles"]["demand"], "Demand Index");
    assert_eq!(body["roles"]["size"], "Size (sqft)");
    assert_eq!(body["unresolved"], serde_json::json!([]));
}

#[test]
fn download_copies_stored_file_or_reports_absence() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data.csv");
    let dest = dir.path().join("out.csv");

    let output = lens(&data, &["download", dest.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json(&output)["error"], "No preload dataset present.");

    fs::write(&data, DATASET).unwrap();
    let output = lens(&data, &["download", dest.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(json(&output)["bytes"], DATASET.len());
    assert_eq!(fs::read_to_string(&dest).unwrap(), DATASET);
}
