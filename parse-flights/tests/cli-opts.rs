use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

const BIN: &str = "parse-flights";
const SAMPLE: &str = "testdata/sample.csv";

/// Run with an empty HOME so that no user configuration is picked up.
fn command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin(BIN).unwrap();
    cmd.env("HOME", home.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_empty_args() {
    let home = TempDir::new().unwrap();
    command(&home).assert().failure();
}

#[test]
fn test_help() {
    let home = TempDir::new().unwrap();
    command(&home).arg("-h").assert().success();
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    let out = command(&home).arg("version").output().unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("parse-flights"));
    assert!(stdout.contains("flightmsg-formats"));
}

#[test]
fn test_convert_ndjson() {
    let home = TempDir::new().unwrap();
    let out = command(&home)
        .args(["convert", "-i", SAMPLE])
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    let records: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(3, records.len());
    assert_eq!(1, records[0]["row_number"]);
    assert_eq!("1234", records[0]["flight_number"]);
    assert_eq!("ACME", records[0]["operator_name"]);
    assert_eq!(90, records[0]["flight_duration_minutes"]);
    assert_eq!(45, records[1]["flight_duration_minutes"]);
    assert_eq!("Не определен", records[2]["region_landing"]);

    // summary goes to stderr
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("skipped (empty)"));
}

#[test]
fn test_convert_csv_parallel() {
    let home = TempDir::new().unwrap();
    let output = home.path().join("flights.csv");

    command(&home)
        .args(["convert", "-P", "-F", "csv", "-i", SAMPLE, "-o"])
        .arg(&output)
        .assert()
        .success();

    let data = fs::read_to_string(&output).unwrap();
    let mut rdr = csv::Reader::from_reader(data.as_bytes());
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(3, rows.len());
    assert_eq!(Some("1"), rows[0].get(0));
    assert_eq!(Some("5"), rows[2].get(0));
}

#[test]
fn test_convert_bad_format() {
    let home = TempDir::new().unwrap();
    command(&home)
        .args(["convert", "-F", "parquet", "-i", SAMPLE])
        .assert()
        .failure();
}

#[test]
fn test_convert_no_file() {
    let home = TempDir::new().unwrap();
    command(&home)
        .args(["convert", "-i", "testdata/nope.csv"])
        .assert()
        .failure();
}

#[test]
fn test_bad_config_version() {
    let home = TempDir::new().unwrap();
    let cfg = home.path().join("bad.hcl");
    fs::write(&cfg, "version = 42\n").unwrap();

    command(&home)
        .arg("-c")
        .arg(&cfg)
        .args(["convert", "-i", SAMPLE])
        .assert()
        .failure();
}

#[test]
fn test_stats() {
    let home = TempDir::new().unwrap();
    let out = command(&home)
        .args(["stats", "-n", "5", "-i", SAMPLE])
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Aircraft type"));
    assert!(stdout.contains("BLA"));
    assert!(stdout.contains("Центральный федеральный округ"));
}
