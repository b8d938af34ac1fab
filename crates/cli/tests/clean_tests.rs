// Integration tests for `resift clean` and `resift inspect` over CSV fixtures.
// Run with: cargo test -p resift-cli --test clean_tests -- --nocapture

use std::path::Path;
use std::process::Command;

fn resift() -> Command {
    Command::new(env!("CARGO_BIN_EXE_resift"))
}

fn write_fixture(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

const REPORT_CSV: &str = "\
Created On,ParentID,Record Type
01/08/2024 09:00:00,A,change
01/10/2024 09:00:00,B,incident
";

const DUMP_CSV: &str = "\
Created On,ParentID,Record Type
01/05/2024 10:00:00,A,incident
01/06/2024 10:00:00,C,incident
01/08/2024 09:00:00,,Change
01/09/2024 09:00:00,B,Change
01/11/2024 10:00:00,Z,incident
";

// ---------------------------------------------------------------------------
// clean: happy path, counters, output file
// ---------------------------------------------------------------------------

#[test]
fn clean_writes_csv_output_and_reports_counters() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(dir.path(), "report.csv", REPORT_CSV);
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);
    let out = dir.path().join("cleaned.csv");

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("resift clean");

    assert!(output.status.success(), "exit code was {:?}", output.status);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("report horizon: 01/10/2024 09:00:00"), "{stderr}");
    assert!(stderr.contains("3 of 5 row(s) kept"), "{stderr}");
    assert!(stderr.contains("1 unmatched-parent row(s) removed"), "{stderr}");
    assert!(stderr.contains("1 new row(s) after horizon"), "{stderr}");
    assert!(stderr.contains("1 unmatched change row(s) removed"), "{stderr}");

    let cleaned = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = cleaned.lines().collect();
    assert_eq!(lines[0], "Created On,ParentID,Record Type");
    assert_eq!(lines.len(), 4);
    // before-horizon survivors first, then the after-horizon row
    assert!(lines[1].starts_with("01/05/2024 10:00:00,A"));
    assert!(lines[2].starts_with("01/08/2024 09:00:00,"));
    assert!(lines[3].starts_with("01/11/2024 10:00:00,Z"));
}

#[test]
fn clean_json_emits_full_result_on_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(dir.path(), "report.csv", REPORT_CSV);
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);
    let out = dir.path().join("cleaned.csv");

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
            "--json",
        ])
        .output()
        .expect("resift clean --json");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let result: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");

    assert_eq!(result["summary"]["dump_rows"], 5);
    assert_eq!(result["summary"]["cleaned_rows"], 3);
    assert_eq!(result["summary"]["removed_unmatched_parent"], 1);
    assert_eq!(result["summary"]["new_after_horizon"], 1);
    assert_eq!(result["summary"]["removed_unmatched_change"], 1);
    assert_eq!(result["cleaned"]["rows"].as_array().unwrap().len(), 3);
}

#[test]
fn clean_without_record_type_skips_cross_check() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(
        dir.path(),
        "report.csv",
        "Created On,ParentID\n01/10/2024 09:00:00,A\n",
    );
    let dump = write_fixture(
        dir.path(),
        "dump.csv",
        "Created On,ParentID,Record Type\n01/05/2024 10:00:00,A,change\n",
    );
    let out = dir.path().join("cleaned.csv");

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("resift clean");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("change cross-check skipped"), "{stderr}");
    assert!(stderr.contains("warning:"), "{stderr}");
}

// ---------------------------------------------------------------------------
// clean: error paths and exit codes
// ---------------------------------------------------------------------------

#[test]
fn missing_parent_column_exits_3_and_lists_columns() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(
        dir.path(),
        "report.csv",
        "Created On,Name\n01/10/2024 09:00:00,x\n",
    );
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);

    let output = resift()
        .args(["clean", report.to_str().unwrap(), dump.to_str().unwrap()])
        .output()
        .expect("resift clean");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("'ParentID' in report"), "{stderr}");
    assert!(stderr.contains("Name"), "column listing missing: {stderr}");
    assert!(stderr.contains("resift inspect"), "hint missing: {stderr}");
}

#[test]
fn bad_timestamp_exits_4_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(dir.path(), "report.csv", REPORT_CSV);
    let dump = write_fixture(
        dir.path(),
        "dump.csv",
        "Created On,ParentID\n13/40/2024 25:00:00,A\n",
    );
    let out = dir.path().join("cleaned.csv");

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("resift clean");

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("13/40/2024 25:00:00"), "{stderr}");
    assert!(!out.exists(), "no partial output on parse failure");
}

#[test]
fn empty_report_exits_3() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(dir.path(), "report.csv", "Created On,ParentID\n");
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);

    let output = resift()
        .args(["clean", report.to_str().unwrap(), dump.to_str().unwrap()])
        .output()
        .expect("resift clean");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no rows"), "{stderr}");
}

#[test]
fn bad_config_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(dir.path(), "report.csv", REPORT_CSV);
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);
    let config = write_fixture(dir.path(), "columns.toml", "timestamp_format = \"\"\n");

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("resift clean");

    assert_eq!(output.status.code(), Some(6));
}

#[test]
fn broken_strftime_config_exits_6() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(dir.path(), "report.csv", REPORT_CSV);
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);
    // trailing '%' is rejected up front; with date-typed Excel cells it
    // would otherwise only blow up while rendering during import
    let config = write_fixture(
        dir.path(),
        "columns.toml",
        "timestamp_format = \"%m/%d/%Y %H:%M:%\"\n",
    );

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("resift clean");

    assert_eq!(output.status.code(), Some(6));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not a valid strftime string"), "{stderr}");
}

#[test]
fn config_renames_columns() {
    let dir = tempfile::tempdir().unwrap();
    let report = write_fixture(
        dir.path(),
        "report.csv",
        "created,parent\n2024-01-10 09:00:00,A\n",
    );
    let dump = write_fixture(
        dir.path(),
        "dump.csv",
        "created,parent\n2024-01-05 10:00:00,A\n2024-01-05 11:00:00,C\n",
    );
    let config = write_fixture(
        dir.path(),
        "columns.toml",
        "timestamp_format = \"%Y-%m-%d %H:%M:%S\"\n\n[columns]\ncreated_on = \"created\"\nparent_id = \"parent\"\n",
    );
    let out = dir.path().join("cleaned.csv");

    let output = resift()
        .args([
            "clean",
            report.to_str().unwrap(),
            dump.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--output",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("resift clean");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("1 of 2 row(s) kept"), "{stderr}");
}

// ---------------------------------------------------------------------------
// inspect
// ---------------------------------------------------------------------------

#[test]
fn inspect_lists_columns_and_row_count() {
    let dir = tempfile::tempdir().unwrap();
    let dump = write_fixture(dir.path(), "dump.csv", DUMP_CSV);

    let output = resift()
        .args(["inspect", dump.to_str().unwrap()])
        .output()
        .expect("resift inspect");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("3 column(s), 5 row(s)"), "{stdout}");
    assert!(stdout.contains("ParentID"), "{stdout}");
    assert!(stdout.contains("Record Type"), "{stdout}");
}
