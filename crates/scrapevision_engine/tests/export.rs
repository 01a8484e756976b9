use std::fs;

use pretty_assertions::assert_eq;
use scrapevision_core::{ResultRecord, CSV_HEADER, EXPORT_MIME_TYPE};
use scrapevision_engine::{ensure_output_dir, export_csv, ExportError};
use tempfile::TempDir;

fn records() -> Vec<ResultRecord> {
    vec![
        ResultRecord::from_raw(
            "http://a".to_string(),
            "4 stars",
            "POSITIVE",
            Some(0.87),
            Some("Good".to_string()),
        ),
        ResultRecord::from_raw(
            "http://b".to_string(),
            "1 star",
            "NEGATIVE",
            Some(0.5),
            Some("Bad, \"really\"".to_string()),
        ),
    ]
}

#[test]
fn writes_results_csv_into_directory() {
    let dir = TempDir::new().expect("tempdir");
    let summary = export_csv(dir.path(), &records()).expect("export");

    assert_eq!(summary.path, dir.path().join("results.csv"));
    assert_eq!(summary.rows, 2);
    assert_eq!(summary.mime_type, EXPORT_MIME_TYPE);

    let written = fs::read_to_string(&summary.path).expect("read back");
    let mut lines = written.lines();
    assert_eq!(lines.next(), Some(CSV_HEADER));
    assert_eq!(
        lines.next(),
        Some("\"http://a\",\"4 stars\",\"POSITIVE\",0.870,\"Good\"")
    );
    assert_eq!(
        lines.next(),
        Some("\"http://b\",\"1 star\",\"NEGATIVE\",0.500,\"Bad, \"\"really\"\"\"")
    );
    assert_eq!(lines.next(), None);
}

#[test]
fn replaces_previous_export() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("results.csv"), "stale").expect("seed");

    let all = records();
    export_csv(dir.path(), &all[..1]).expect("export");

    let written = fs::read_to_string(dir.path().join("results.csv")).expect("read back");
    assert!(!written.contains("stale"));
    assert_eq!(written.lines().count(), 2);
}

#[test]
fn refuses_to_export_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let err = export_csv(dir.path(), &[]).unwrap_err();
    assert!(matches!(err, ExportError::NoResults));
    assert!(!dir.path().join("results.csv").exists());
}

#[test]
fn creates_missing_output_directory() {
    let dir = TempDir::new().expect("tempdir");
    let nested = dir.path().join("out").join("csv");
    export_csv(&nested, &records()).expect("export");
    assert!(nested.join("results.csv").is_file());
}

#[test]
fn output_path_that_is_a_file_is_rejected() {
    let dir = TempDir::new().expect("tempdir");
    let file = dir.path().join("not_a_dir");
    fs::write(&file, "x").expect("seed");

    assert!(matches!(
        ensure_output_dir(&file),
        Err(ExportError::OutputDir(_))
    ));
    assert!(matches!(
        export_csv(&file, &records()),
        Err(ExportError::OutputDir(_))
    ));
}
