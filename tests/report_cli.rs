//! E2E tests for the report, summary, validate, inventory and schema commands

use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const LEDGER: &str = "tests/data/double_entry.csv";

fn fifotax(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fifotax"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Fiat sale, crypto swap, fiat sale with two fee legs and an oversold disposal
#[test]
fn report_json_for_year() {
    let output = fifotax(&["report", LEDGER, "-y", "2024", "--json", "--no-write"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["year"], "2024");

    let disposals = json["disposals"].as_array().unwrap();
    assert_eq!(disposals.len(), 4);

    assert_eq!(disposals[0]["trade_id"], "T1");
    assert_eq!(disposals[0]["quantity"], "1.5");
    assert_eq!(disposals[0]["value_received"], "450.00");
    assert_eq!(disposals[0]["cost_basis"], "250.00");
    assert_eq!(disposals[0]["fees"], "5.00");
    assert_eq!(disposals[0]["gain"], "195.00");
    assert_eq!(disposals[0]["counter_class"], "F");

    // BTC for ETH: remaining half lot at 300 each
    assert_eq!(disposals[1]["asset"], "BTC");
    assert_eq!(disposals[1]["cost_basis"], "75.00");
    assert_eq!(disposals[1]["gain"], "9925.00");
    assert_eq!(disposals[1]["counter_class"], "N");

    // EUR and BNB fee legs both count
    assert_eq!(disposals[2]["asset"], "ETH");
    assert_eq!(disposals[2]["cost_basis"], "4000.00");
    assert_eq!(disposals[2]["fees"], "3.00");
    assert_eq!(disposals[2]["gain"], "1997.00");

    assert_eq!(disposals[3]["asset"], "ADA");
    assert_eq!(disposals[3]["cost_basis"], "0.00");
    assert_eq!(disposals[3]["gain"], "20.00");

    let totals = &json["totals"];
    assert_eq!(totals["disposals"], 4);
    assert_eq!(totals["value_received"], "16470.00");
    assert_eq!(totals["cost_basis"], "4325.00");
    assert_eq!(totals["fees"], "8.00");
    assert_eq!(totals["gain"], "12137.00");
    assert_eq!(totals["warnings"], 1);
}

#[test]
fn report_all_years_includes_prior_lots() {
    let output = fifotax(&["report", LEDGER, "--json", "--no-write"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["year"], "All Years");
    // 0.1 @ 3000 from 2023, 1 @ 100, then 0.4 of the 300 lot
    assert_eq!(json["disposals"][0]["cost_basis"], "3220.00");
    assert_eq!(json["disposals"][0]["gain"], "-2775.00");
}

#[test]
fn report_writes_csv_next_to_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("ledger.csv");
    fs::copy(LEDGER, &input).unwrap();

    let output = fifotax(&["report", input.to_str().unwrap(), "-y", "2024"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("DISPOSALS (2024)"));
    assert!(stdout.contains("SUMMARY BY ASSET"));
    assert!(stdout.contains("CSV files written:"));

    let detail = fs::read_to_string(dir.path().join("ledger.fifo_2024_detail.csv")).unwrap();
    let mut lines = detail.lines();
    assert_eq!(
        lines.next(),
        Some("date,asset,trade_id,quantity,value_received,cost_basis,fees,gain,counter_class")
    );
    assert_eq!(
        lines.next(),
        Some("2024-01-03,BTC,T1,1.5,450.00,250.00,5.00,195.00,F")
    );
    assert_eq!(detail.lines().count(), 5);

    let summary = fs::read_to_string(dir.path().join("ledger.fifo_2024_summary.csv")).unwrap();
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(
        lines,
        vec![
            "asset,counter_class,disposals,value_received,cost_basis,fees,gain",
            "ADA,F,1,20.00,0.00,0.00,20.00",
            "BTC,F,1,450.00,250.00,5.00,195.00",
            "BTC,N,1,10000.00,75.00,0.00,9925.00",
            "ETH,F,1,6000.00,4000.00,3.00,1997.00",
        ]
    );
}

#[test]
fn report_without_disposals() {
    let output = fifotax(&["report", LEDGER, "-y", "2023", "--no-write"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("No sales or swaps found matching the filters."));
}

#[test]
fn summary_single_asset() {
    let output = fifotax(&["summary", LEDGER, "-y", "2024", "--crypto", "btc"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let stdout = stdout(&output);
    assert!(stdout.contains("FIFO SUMMARY (2024, BTC)"));
    assert!(stdout.contains("Disposals: 2"));
    // fee leg is still linked while only BTC is matched
    assert!(stdout.contains("Fees: 5.00"));
    assert!(stdout.contains("Gain: 10120.00"));
    assert!(!stdout.contains("ETH"));
}

#[test]
fn validate_reports_oversold_disposal() {
    let output = fifotax(&["validate", LEDGER, "-y", "2024"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = stdout(&output);
    assert!(stdout.contains("VALIDATION RESULTS (2024)"));
    assert!(stdout.contains("1 issue(s) found"));
    assert!(stdout.contains("[NoCostBasis]"));
    assert!(stdout.contains("ADA"));
}

#[test]
fn validate_clean_asset() {
    let output = fifotax(&["validate", LEDGER, "-y", "2024", "--crypto", "BTC"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout(&output).contains("No issues found."));
}

#[test]
fn inventory_open_lots() {
    let output = fifotax(&["inventory", LEDGER, "-y", "2024", "--lots", "--json"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let holdings = json["holdings"].as_array().unwrap();
    assert_eq!(holdings.len(), 2);

    assert_eq!(holdings[0]["asset"], "BTC");
    assert_eq!(holdings[0]["quantity"], "0.25");
    assert_eq!(holdings[0]["cost"], "75.00");

    assert_eq!(holdings[1]["asset"], "ETH");
    assert_eq!(holdings[1]["lots"], 2);
    assert_eq!(holdings[1]["quantity"], "12");
    assert_eq!(holdings[1]["cost"], "26000.00");
    assert_eq!(holdings[1]["open_lots"].as_array().unwrap().len(), 2);
}

#[test]
fn comma_separated_english_headers() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("export.csv");
    fs::write(
        &input,
        "Type,Amount,Currency,Value in EUR,Trade ID,Date\n\
         Buy,2,SOL,100.00,B1,2024-05-01 10:00:00\n\
         Sell,-100,EUR,-100.00,B1,2024-05-01 10:00:00\n\
         Sell,-1,SOL,-80.00,B2,2024-06-01 10:00:00\n\
         Buy,80,EUR,80.00,B2,2024-06-01 10:00:00\n",
    )
    .unwrap();

    let output = fifotax(&["report", input.to_str().unwrap(), "--json", "--no-write"]);
    assert!(output.status.success(), "Command failed: {:?}", output);

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["disposals"][0]["cost_basis"], "50.00");
    assert_eq!(json["disposals"][0]["gain"], "30.00");
    assert!(!dir.path().join("export.fifo_all_detail.csv").exists());
}

#[test]
fn missing_columns_fail() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "Type,Amount,Date\nBuy,1,2024-01-01\n").unwrap();

    let output = fifotax(&["report", input.to_str().unwrap(), "--no-write"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("asset"));
}

#[test]
fn schema_csv_header() {
    let output = fifotax(&["schema", "csv-header"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(
        stdout(&output).trim(),
        "date,type,quantity,asset,value,trade_id"
    );
}

#[test]
fn schema_json() {
    let output = fifotax(&["schema", "json-schema"]);
    assert!(output.status.success(), "Command failed: {:?}", output);
    let stdout = stdout(&output);
    assert!(stdout.contains("ReportOutput"));
    assert!(stdout.contains("counter_class"));
}
