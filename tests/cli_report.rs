mod common;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::{json, Value};
use tempfile::TempDir;

use common::write_json;

const BIN_NAME: &str = "fintrack_cli";

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN_NAME).expect("binary exists");
    cmd.env("FINTRACK_HOME", home.path()).env("NO_COLOR", "1");
    cmd
}

fn sample_files(dir: &TempDir) -> (String, String) {
    let income = write_json(
        dir,
        "income.json",
        &json!([{"amount": 100, "source": "Salary", "date": "2025-01-01"}]),
    );
    let expenses = write_json(
        dir,
        "expenses.json",
        &json!([
            {"amount": 40, "category": "Food", "date": "2025-01-01"},
            {"amount": "10", "category": "Food", "date": "2025-01-02"}
        ]),
    );
    (
        income.display().to_string(),
        expenses.display().to_string(),
    )
}

#[test]
fn version_prints_crate_version() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn text_report_lists_totals_and_breakdowns() {
    let home = TempDir::new().unwrap();
    let (income, expenses) = sample_files(&home);
    cli(&home)
        .args(["report", "--plain", "--income", &income, "--expenses", &expenses])
        .assert()
        .success()
        .stdout(
            contains("Total Income")
                .and(contains("₹100.00"))
                .and(contains("₹50.00"))
                .and(contains("2025-01-02"))
                .and(contains("Expense Breakdown")),
        );
}

#[test]
fn json_report_matches_worked_example() {
    let home = TempDir::new().unwrap();
    let (income, expenses) = sample_files(&home);
    let output = cli(&home)
        .args(["report", "--json", "--income", &income, "--expenses", &expenses])
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(report["totalIncome"], 100.0);
    assert_eq!(report["totalExpenses"], 50.0);
    assert_eq!(report["byDate"][0]["date"], "2025-01-01");
    assert_eq!(report["byDate"][0]["expenseSum"], 40.0);
    assert_eq!(report["byDate"][1]["incomeSum"], 0.0);
    assert_eq!(report["expenseByCategory"][0]["label"], "Food");
    assert_eq!(report["expenseByCategory"][0]["total"], 50.0);
    assert_eq!(report["insights"]["totalBalance"], 50.0);
}

#[test]
fn saved_config_sets_currency_symbol() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.json"), r#"{"currency_symbol": "$"}"#).unwrap();
    let (income, expenses) = sample_files(&home);

    cli(&home)
        .args(["report", "--plain", "--income", &income, "--expenses", &expenses])
        .assert()
        .success()
        .stdout(contains("$100.00"));
}

#[test]
fn non_array_snapshot_fails_fast() {
    let home = TempDir::new().unwrap();
    let income = write_json(&home, "income.json", &json!({"amount": 5}));
    let expenses = write_json(&home, "expenses.json", &json!([]));
    cli(&home)
        .args([
            "report",
            "--income",
            &income.display().to_string(),
            "--expenses",
            &expenses.display().to_string(),
        ])
        .assert()
        .failure()
        .stderr(contains("Error:").and(contains("Malformed Income input")));
}

#[test]
fn missing_file_is_reported() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["report", "--income", "nope.json", "--expenses", "nope.json"])
        .assert()
        .failure()
        .stderr(contains("Cannot read `nope.json`"));
}

#[test]
fn config_set_changes_later_reports() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "currency_symbol", "€"])
        .assert()
        .success()
        .stdout(contains("Set currency_symbol = €"));
    cli(&home)
        .args(["config", "set", "currency", "eur"])
        .assert()
        .success();

    let (income, expenses) = sample_files(&home);
    cli(&home)
        .args(["report", "--plain", "--income", &income, "--expenses", &expenses])
        .assert()
        .success()
        .stdout(contains("Reports & Insights (EUR)").and(contains("€100.00")));

    let output = cli(&home).arg("config").output().expect("run cli");
    let shown: Value = serde_json::from_slice(&output.stdout).expect("json config");
    assert_eq!(shown["currency_symbol"], "€");
}

#[test]
fn config_set_rejects_unknown_key() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "theme", "dark"])
        .assert()
        .failure()
        .stderr(contains("Unknown configuration key `theme`").and(contains("category_order")));
}

#[test]
fn config_backup_and_restore_round_trip() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "set", "decimal_places", "0"])
        .assert()
        .success();
    let output = cli(&home).args(["config", "backup"]).output().expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let name = stdout
        .trim()
        .strip_prefix("Backup created: ")
        .expect("backup name")
        .to_string();

    cli(&home)
        .args(["config", "set", "decimal_places", "3"])
        .assert()
        .success();
    cli(&home)
        .args(["config", "backups"])
        .assert()
        .success()
        .stdout(contains(name.as_str()));
    cli(&home)
        .args(["config", "restore", &name])
        .assert()
        .success();

    let output = cli(&home).args(["config", "show"]).output().expect("run cli");
    let shown: Value = serde_json::from_slice(&output.stdout).expect("json config");
    assert_eq!(shown["decimal_places"], 0);
}

#[test]
fn restoring_unknown_backup_fails() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "restore", "config_nope.json"])
        .assert()
        .failure()
        .stderr(contains("not found"));
}
