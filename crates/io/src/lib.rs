//! `confere-io` — spreadsheet adapters for the reconciliation engine.
//!
//! Reads xlsx/xls/ods via calamine and CSV via the csv crate into the
//! engine's positional [`Table`] model, and writes assembled report
//! tables back out. Errors at this boundary are plain strings; callers
//! wrap them into their own error types.

pub mod csv;
pub mod xlsx;

use std::path::Path;

use confere_core::model::{OutputTable, Table};

/// Read a table, dispatching on the file extension: `.csv`/`.tsv` go to
/// the CSV adapter, everything else to the spreadsheet adapter.
pub fn read_table(path: &Path) -> Result<Table, String> {
    if is_csv(path) {
        csv::read_table(path)
    } else {
        xlsx::read_table(path)
    }
}

/// Write a report table, dispatching on the file extension.
pub fn write_table(path: &Path, table: &OutputTable) -> Result<(), String> {
    if is_csv(path) {
        csv::write_table(path, table)
    } else {
        xlsx::write_table(path, table)
    }
}

fn is_csv(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("tsv")
    )
}
