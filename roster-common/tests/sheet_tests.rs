//! CSV sheet persistence

use roster_common::sheet::{CellRef, CsvSheet, Extent, Sheet};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_persist_pads_rows_and_preserves_quoting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, "Sr,Name\n1,\"Doe, Jane\"\n2\n").unwrap();

    let mut sheet = CsvSheet::open(&path).unwrap();
    assert_eq!(sheet.extent(), Extent { last_row: 3, last_col: 2 });
    assert_eq!(sheet.read_cell(CellRef::parse("B2").unwrap()).unwrap(), "Doe, Jane");

    sheet.write_cell(CellRef::parse("C1").unwrap(), "Status").unwrap();
    sheet.persist().unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Sr,Name,Status\n1,\"Doe, Jane\",\n2,,\n"
    );
    assert!(!dir.path().join("roster.csv.tmp").exists());
}

#[test]
fn test_redirect_writes_elsewhere() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.csv");
    let dst = dir.path().join("out.csv");
    fs::write(&src, "a,b\n").unwrap();

    let mut sheet = CsvSheet::open(&src).unwrap().redirect(dst.clone());
    sheet.write_cell(CellRef::parse("A2").unwrap(), "x").unwrap();
    sheet.persist().unwrap();

    assert_eq!(fs::read_to_string(&src).unwrap(), "a,b\n");
    assert_eq!(fs::read_to_string(&dst).unwrap(), "a,b\nx,\n");
}

#[test]
fn test_blank_lines_stay_as_empty_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, "Sr,AICF ID\n1,25MH00001\n\n9,25MH00002\n").unwrap();

    let sheet = CsvSheet::open(&path).unwrap();
    assert_eq!(sheet.read_cell(CellRef::parse("A3").unwrap()).unwrap(), "");
    assert_eq!(sheet.read_cell(CellRef::parse("A4").unwrap()).unwrap(), "9");
    assert_eq!(sheet.extent(), Extent { last_row: 4, last_col: 2 });
}

#[test]
fn test_quoted_line_break_does_not_add_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roster.csv");
    fs::write(&path, "Sr,Note\n1,\"two\nlines\"\n\n\n5,x\n").unwrap();

    let sheet = CsvSheet::open(&path).unwrap();
    assert_eq!(sheet.read_cell(CellRef::parse("B2").unwrap()).unwrap(), "two\nlines");
    assert_eq!(sheet.read_cell(CellRef::parse("A3").unwrap()).unwrap(), "");
    assert_eq!(sheet.read_cell(CellRef::parse("A4").unwrap()).unwrap(), "");
    assert_eq!(sheet.read_cell(CellRef::parse("A5").unwrap()).unwrap(), "5");
}

#[test]
fn test_open_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(CsvSheet::open(&dir.path().join("missing.csv")).is_err());
}
