//! Integration tests for the report extractor binary.

mod common;

use assert_cmd::Command;
use common::{pdf_with_pages, report_content, write_report};
use predicates::prelude::*;

fn cmd_in(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("tabstream").unwrap();
    cmd.current_dir(dir);
    cmd
}

fn report_dir(contents: &[String]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), &pdf_with_pages(contents));
    dir
}

#[test]
fn prints_report_grid_then_pause() {
    let dir = report_dir(&[report_content()]);
    let output = cmd_in(dir.path()).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines[0],
        "{'accuracy': 100.0, 'whitespace': 55.56, 'order': 1, 'page': 1}"
    );
    // Header plus three rows.
    assert_eq!(lines.len(), 6);
    assert!(lines[2].contains("Name") && lines[2].contains("Total"));
    assert!(lines[3].contains("Apples") && lines[3].contains("4.50"));
    assert!(lines[4].contains("2.00") && !lines[4].contains("2.00."));
    assert_eq!(lines[5], "pause");
}

#[test]
fn missing_file_fails_before_output() {
    let dir = tempfile::tempdir().unwrap();
    cmd_in(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn plot_is_written_only_on_request() {
    let dir = report_dir(&[report_content()]);
    cmd_in(dir.path()).assert().success();
    let svgs = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|x| x == "svg"))
        .count();
    assert_eq!(svgs, 0);

    cmd_in(dir.path())
        .args(["--plot", "contour.svg"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("pause\n"));
    let svg = std::fs::read_to_string(dir.path().join("contour.svg")).unwrap();
    assert!(svg.starts_with("<svg"));
}

#[test]
fn empty_region_prints_empty_grid() {
    let dir = report_dir(&["BT /F1 10 Tf 30 50 Td (footer) Tj ET".to_string()]);
    cmd_in(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "{'accuracy': 0.0, 'whitespace': 0.0, 'order': 1, 'page': 1}\n",
        ))
        .stdout(predicate::str::contains(
            "Empty grid\nColumns: [0, 1, 2, 3, 4, 5, 6, 7, 8]\nIndex: []\npause\n",
        ));
}

#[test]
fn zero_pages_prints_zero_report() {
    let dir = report_dir(&[]);
    cmd_in(dir.path()).assert().success().stdout(
        "{'accuracy': 0.0, 'whitespace': 0.0, 'order': 0, 'page': 0}\n\
         Empty grid\nColumns: []\nIndex: []\npause\n",
    );
}

#[test]
fn unsupported_flavor_fails_without_pause() {
    let dir = report_dir(&[report_content()]);
    cmd_in(dir.path())
        .args(["--flavor", "lattice"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("pause").not())
        .stderr(predicate::str::contains("not supported"));
}

#[test]
fn corrupt_pdf_fails_without_pause() {
    let dir = tempfile::tempdir().unwrap();
    write_report(dir.path(), b"%PDF-1.5 garbage");
    cmd_in(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn output_is_deterministic() {
    let dir = report_dir(&[report_content(), report_content()]);
    let first = cmd_in(dir.path()).output().unwrap();
    let second = cmd_in(dir.path()).output().unwrap();
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn positional_file_and_all_tables() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("two.pdf");
    std::fs::write(&path, pdf_with_pages(&[report_content(), report_content()])).unwrap();
    let output = cmd_in(dir.path())
        .arg(&path)
        .arg("--all-tables")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.matches("'accuracy'").count(), 2);
    assert!(stdout.contains("'page': 2"));
    assert_eq!(stdout.matches("pause").count(), 1);
}

#[test]
fn json_format() {
    let dir = report_dir(&[report_content()]);
    let output = cmd_in(dir.path())
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let table = &json["tables"][0];
    assert_eq!(table["shape"], serde_json::json!([3, 9]));
    assert_eq!(table["parsing_report"]["page"], 1);
    assert_eq!(table["data"][1][1], "Apples");
}

#[test]
fn csv_format() {
    let dir = report_dir(&[report_content()]);
    cmd_in(dir.path())
        .args(["--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "accuracy,whitespace,order,page\n100,55.56,1,1\n\n\"\",\"Name\"",
        ))
        .stdout(predicate::str::contains("pause").not());
}
