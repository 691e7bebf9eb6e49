//! Behaviour tests for loading the ticker universe from disk.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use turtle_core::{load_universe, DataSourceError};

fn write_universe(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("nse_tickers.csv");
    fs::write(&path, contents).expect("universe file should be writable");
    path
}

fn symbols(path: &Path, column: &str) -> Vec<String> {
    load_universe(path, column)
        .expect("universe should load")
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn loads_tickers_in_file_order_with_duplicates() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_universe(
        &dir,
        "Ticker,Name\nTCS.NS,Tata Consultancy\nINFY.NS,Infosys\nTCS.NS,Tata Consultancy\n",
    );

    assert_eq!(symbols(&path, "Ticker"), vec!["TCS.NS", "INFY.NS", "TCS.NS"]);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_universe(&dir, "Name, Ticker \nReliance,  RELIANCE.NS \n");

    assert_eq!(symbols(&path, "Ticker"), vec!["RELIANCE.NS"]);
}

#[test]
fn custom_column_name_is_honoured() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_universe(&dir, "Symbol,Ticker\nHDFCBANK.NS,ignored\n");

    assert_eq!(symbols(&path, "Symbol"), vec!["HDFCBANK.NS"]);
}

#[test]
fn header_only_file_is_an_empty_universe() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_universe(&dir, "Ticker\n");

    assert!(symbols(&path, "Ticker").is_empty());
}

#[test]
fn missing_file_fails_to_open() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("absent.csv");

    let error = load_universe(&path, "Ticker").expect_err("file is absent");

    assert!(matches!(error, DataSourceError::Open { .. }));
    assert_eq!(error.code(), "universe.open");
    assert!(error.to_string().contains("absent.csv"));
}

#[test]
fn missing_column_is_reported_by_name() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_universe(&dir, "Symbol\nTCS.NS\n");

    let error = load_universe(&path, "Ticker").expect_err("no Ticker column");

    assert!(matches!(
        error,
        DataSourceError::MissingColumn { ref column } if column == "Ticker"
    ));
}

#[test]
fn blank_ticker_cell_names_its_row() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_universe(&dir, "Ticker,Name\nTCS.NS,Tata\n,Unknown\n");

    let error = load_universe(&path, "Ticker").expect_err("blank cell");

    assert!(matches!(error, DataSourceError::EmptyTicker { row: 3 }));
}
