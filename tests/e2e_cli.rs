use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use cli_helpers::{base_cmd, run_cmd, run_json, FIXTURES_DIR};

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

#[test]
fn show_prints_reconciled_table_without_color_when_piped() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("show").arg("ibm").arg("--scale").arg("billions");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Financial Data for IBM"))
        .stdout(predicate::str::contains("2024-06-30"))
        .stdout(predicate::str::contains("1.605 ($B)"))
        .stdout(predicate::str::contains("23.671 ($B)"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn show_json_has_union_of_dates_and_nulls_for_gaps() {
    let home = setup_temp_home();
    let json = run_json(&home, &["show", "IBM", "--metric", "netIncome", "--metric", "totalAssets"])
        .expect("show --json failed");

    assert_eq!(json["symbol"], "IBM");
    assert_eq!(json["cadence"], "quarterly");
    assert_eq!(
        json["dates"],
        serde_json::json!(["2023-06-30", "2023-09-30", "2023-12-31", "2024-03-31", "2024-06-30"])
    );

    let series = json["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[0]["metric"], "netIncome");
    assert!(series[0]["values"][4].is_null());
    assert_eq!(series[1]["metric"], "totalAssets");
    assert!(series[1]["values"][0].is_null());
    assert_eq!(series[1]["values"][4], 132212000000.0);
}

#[test]
fn show_annual_zero_fill() {
    let home = setup_temp_home();
    let json = run_json(
        &home,
        &["show", "IBM", "--annual", "--zero-fill", "--scale", "millions", "--metric", "longTermDebt", "--metric", "ebitda"],
    )
    .expect("show --annual failed");

    assert_eq!(json["dates"], serde_json::json!(["2022-12-31", "2023-12-31"]));
    assert_eq!(json["unit"], "$M");
    assert_eq!(json["series"][0]["metric"], "ebitda");
    assert_eq!(json["series"][0]["values"], serde_json::json!([7174.0, 14693.0]));
    assert_eq!(json["series"][1]["values"], serde_json::json!([46189.0, 50121.0]));
}

#[test]
fn metrics_lists_numeric_keys_per_statement() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("metrics").arg("IBM");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Total Revenue"))
        .stdout(predicate::str::contains("totalShareholderEquity"))
        .stdout(predicate::str::contains("treasuryStock").not());

    let json = run_json(&home, &["metrics", "IBM"]).expect("metrics --json failed");
    let income = json["income_statement"].as_array().unwrap();
    assert!(income.contains(&serde_json::json!("netIncome")));
    assert!(!income.contains(&serde_json::json!("comprehensiveIncomeNetOfTax")));
    assert_eq!(json["balance_sheet"].as_array().unwrap().len(), 6);
}

#[test]
fn export_writes_csv_file() {
    let home = setup_temp_home();
    let out = home.path().join("ibm.csv");

    let output = run_cmd(
        &home,
        &["export", "IBM", out.to_str().unwrap(), "--annual", "--metric", "netIncome"],
    )
    .expect("export failed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Exported 2 rows"));

    let csv = fs::read_to_string(&out).unwrap();
    assert_eq!(
        csv,
        "fiscalDateEnding,netIncome\n2022-12-31,1640000000\n2023-12-31,7502000000\n"
    );
}

#[test]
fn save_copies_fixtures_for_offline_use() {
    let home = setup_temp_home();
    let target = home.path().join("saved");

    run_cmd(&home, &["save", "IBM", target.to_str().unwrap()]).expect("save failed");
    assert!(target.join("IBM").join("income_statement.json").exists());
    assert!(target.join("IBM").join("balance_sheet.json").exists());

    // The saved directory works as a data dir on its own
    let mut cmd = base_cmd(&home);
    cmd.env("FUNDVIEW_DATA_DIR", &target).arg("show").arg("IBM");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("2024-03-31"));
}

#[test]
fn unknown_symbol_prints_fixed_error_and_fails() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("show").arg("NOPE");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to fetch financial data. Please try again.",
        ))
        .stdout(predicate::str::is_empty());
}

#[test]
fn invalid_symbol_fails_before_reading_anything() {
    let home = setup_temp_home();

    let mut cmd = base_cmd(&home);
    cmd.arg("show").arg("../IBM");
    cmd.assert().failure().stderr(predicate::str::contains(
        "Failed to fetch financial data. Please try again.",
    ));
}

#[test]
fn dot_symbols_fail_without_leaving_data_dir() {
    let home = setup_temp_home();
    let data = home.path().join("data");
    let nested = data.join("nested");
    fs::create_dir_all(&nested).unwrap();
    // A parent-directory lookup for ".." would find these
    fs::copy(
        format!("{}/IBM/income_statement.json", FIXTURES_DIR),
        data.join("income_statement.json"),
    )
    .unwrap();
    fs::copy(
        format!("{}/IBM/balance_sheet.json", FIXTURES_DIR),
        data.join("balance_sheet.json"),
    )
    .unwrap();

    for symbol in ["..", "."] {
        let mut cmd = base_cmd(&home);
        cmd.env("FUNDVIEW_DATA_DIR", &nested).arg("show").arg(symbol);
        cmd.assert().failure().stderr(predicate::str::contains(
            "Failed to fetch financial data. Please try again.",
        ));
    }

    let out = home.path().join("out");
    let mut cmd = base_cmd(&home);
    cmd.env("FUNDVIEW_DATA_DIR", &nested)
        .arg("save")
        .arg("..")
        .arg(out.join("nested"));
    cmd.assert().failure();
    assert!(!out.join("income_statement.json").exists());
}

#[test]
fn config_file_sets_default_display() {
    let home = setup_temp_home();
    let config = home.path().join("config.toml");
    fs::write(
        &config,
        "[display]\nscale = \"thousands\"\ncadence = \"annual\"\nmetrics = [\"totalRevenue\"]\n",
    )
    .unwrap();

    let json = run_json(&home, &["--config", config.to_str().unwrap(), "show", "IBM"])
        .expect("show with config failed");
    assert_eq!(json["scale"], "thousands");
    assert_eq!(json["cadence"], "annual");
    assert_eq!(json["series"][0]["values"][1], 61860000.0);
}

#[test]
fn invalid_config_is_reported() {
    let home = setup_temp_home();
    let config = home.path().join("config.toml");
    fs::write(&config, "[display]\nscale = \"trillions\"\n").unwrap();

    let mut cmd = base_cmd(&home);
    cmd.arg("--config").arg(&config).arg("metrics").arg("IBM");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn fixtures_dir_exists() {
    assert!(std::path::Path::new(FIXTURES_DIR).join("IBM").is_dir());
}
