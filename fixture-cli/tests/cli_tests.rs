#![allow(clippy::unwrap_used)]
//! Integration tests for the `fixcheck` commands.
//!
//! Commands are parsed with `Cli::try_parse_from` and executed against a
//! buffer, so no process is spawned.

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use clap::Parser;
use fixture_cli::cli::{Cli, execute};
use tempfile::TempDir;
use zip::write::{SimpleFileOptions, ZipWriter};

const STUDENTS: &str = "Name,Surname\nIvan,Ivanov\nPetr,Petrov\n";
const PERSON: &str = r#"{
  "firstName": "John",
  "lastName": "doe",
  "age": 26,
  "address": { "streetAddress": "naist street", "city": "Nara" }
}"#;

fn run(args: &[&str]) -> (anyhow::Result<bool>, String) {
    colored::control::set_override(false);
    let cli = Cli::try_parse_from(std::iter::once("fixcheck").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let result = execute(&cli, &mut out);
    (result, String::from_utf8(out).unwrap())
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(data).unwrap();
    }
    fs::write(path, writer.finish().unwrap().into_inner()).unwrap();
}

#[test]
fn test_classify_reports_unknown_names() {
    let (result, out) = run(&["classify", "guide.pdf", "example.xlsx", "sample.zip"]);
    assert!(result.unwrap());
    assert!(out.contains("guide.pdf\tpdf"), "{out}");
    assert!(out.contains("example.xlsx\tspreadsheet"), "{out}");
    assert!(out.contains("sample.zip\tarchive"), "{out}");

    let (result, out) = run(&["classify", "student.csv", "README.md"]);
    assert!(!result.unwrap());
    assert!(out.contains("README.md: unknown format"), "{out}");
}

#[test]
fn test_scan_lists_entries() {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("sample.zip");
    write_zip(&archive, &[("sample.txt", b"hello".as_slice())]);

    let (result, out) = run(&["scan", path_arg(&archive)]);
    assert!(result.unwrap());
    assert!(out.contains("1 entries"), "{out}");
    assert!(out.contains("sample.txt"), "{out}");
}

#[test]
fn test_scan_rejects_non_archive() {
    let tmp = TempDir::new().unwrap();
    let fake = tmp.path().join("fake.zip");
    fs::write(&fake, "not a zip").unwrap();

    let (result, _) = run(&["scan", path_arg(&fake)]);
    let msg = result.unwrap_err().to_string();
    assert!(msg.contains("fake.zip"), "got: {msg}");
}

#[test]
fn test_verify_uses_reference_expectations_by_default() {
    let tmp = TempDir::new().unwrap();
    let csv = tmp.path().join("student.csv");
    fs::write(&csv, STUDENTS).unwrap();

    let (result, out) = run(&["verify", path_arg(&csv)]);
    assert!(result.unwrap(), "{out}");
    assert!(out.starts_with("PASS"), "{out}");
    assert!(out.contains("[csv] 1 assertion(s)"), "{out}");
}

#[test]
fn test_verify_ad_hoc_assertions() {
    let tmp = TempDir::new().unwrap();
    let csv = tmp.path().join("student.csv");
    fs::write(&csv, STUDENTS).unwrap();

    let (result, out) = run(&["verify", path_arg(&csv), "--row", "Anna,Petrova"]);
    assert!(!result.unwrap());
    assert!(out.starts_with("FAIL"), "{out}");
    assert!(out.contains("Anna"), "{out}");
}

#[test]
fn test_verify_json_with_either_decoder() {
    let tmp = TempDir::new().unwrap();
    let json = tmp.path().join("example.json");
    fs::write(&json, PERSON).unwrap();

    for decoder in ["serde-json", "saphyr"] {
        let (result, out) = run(&[
            "verify",
            path_arg(&json),
            "--field",
            "address.streetAddress=naist street",
            "--field",
            "firstName=John",
            "--json-decoder",
            decoder,
        ]);
        assert!(result.unwrap(), "{decoder}: {out}");
    }
}

#[test]
fn test_verify_archive_checks_entries() {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("bundle.zip");
    write_zip(
        &archive,
        &[
            ("student.csv", STUDENTS.as_bytes()),
            ("example.json", b"{ broken".as_slice()),
        ],
    );

    let (result, out) = run(&["verify", path_arg(&archive), "--entry", "student.csv"]);
    assert!(!result.unwrap(), "{out}");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 3, "{out}");
    assert!(lines[0].starts_with("PASS"), "{out}");
    assert!(lines[1].starts_with("PASS") && lines[1].contains("bundle.zip!student.csv"));
    assert!(lines[2].starts_with("FAIL") && lines[2].contains("bundle.zip!example.json"));
}

#[test]
fn test_verify_with_manifest() {
    let tmp = TempDir::new().unwrap();
    let notes = tmp.path().join("notes.txt");
    fs::write(&notes, "JUnit 5.8.2 release notes").unwrap();
    let manifest = tmp.path().join("fixtures.json");
    fs::write(
        &manifest,
        r#"{"resources": {"notes.txt": [{"contains": "5.8.2"}, {"contains": "JUnit"}]}}"#,
    )
    .unwrap();

    let (result, out) = run(&[
        "verify",
        path_arg(&notes),
        "--manifest",
        path_arg(&manifest),
    ]);
    assert!(result.unwrap(), "{out}");
    assert!(out.contains("2 assertion(s)"), "{out}");
}

#[test]
fn test_check_json_report() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("student.csv"), STUDENTS).unwrap();
    fs::write(tmp.path().join("example.json"), PERSON).unwrap();
    fs::write(tmp.path().join("notes.txt"), "unlisted").unwrap();

    let (result, out) = run(&["check", path_arg(tmp.path()), "--json"]);
    assert!(result.unwrap(), "{out}");
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["passed"], 2);
    assert_eq!(report["ok"], true);

    let (result, out) = run(&["check", path_arg(tmp.path()), "--json", "--verify-unlisted"]);
    assert!(result.unwrap(), "{out}");
    let report: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(report["passed"], 3);
}

#[test]
fn test_check_human_report_and_exclude() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("student.csv"), "nobody,here\n").unwrap();
    fs::write(tmp.path().join("example.json"), PERSON).unwrap();

    let (result, out) = run(&["check", path_arg(tmp.path())]);
    assert!(!result.unwrap());
    assert!(out.contains("FIXTURE VERIFIER"), "{out}");
    assert!(out.contains("1 of 2 resource(s) failed verification"), "{out}");

    let (result, out) = run(&["check", path_arg(tmp.path()), "--exclude", "*.csv"]);
    assert!(result.unwrap(), "{out}");
}

#[test]
fn test_check_missing_path_is_error() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing");
    let (result, _) = run(&["check", path_arg(&missing)]);
    assert!(result.unwrap_err().to_string().contains("does not exist"));
}
