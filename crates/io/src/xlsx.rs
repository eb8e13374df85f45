// Excel import (xlsx, xls, xlsb, ods) and export (xlsx only).
//
// Import reads the first worksheet: the first row becomes the header, the
// rest become positional data rows. Export writes a single sheet with a
// bold header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDate;
use confere_core::model::{Cell, OutputTable, Table};
use rust_xlsxwriter::{Format, Workbook};

pub fn read_table(path: &Path) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| format!("{}: workbook has no sheets", path.display()))?
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    let mut rows_iter = range.rows();
    let header = rows_iter
        .next()
        .map(|row| row.iter().map(header_label).collect());

    let rows = rows_iter
        .map(|row| row.iter().map(convert).collect())
        .collect();

    Ok(Table { header, rows })
}

fn header_label(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

fn convert(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Error(e) => Cell::Text(format!("#{e:?}")),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ndt) => Cell::Date(ndt.date()),
            None => Cell::Empty,
        },
        Data::DateTimeIso(s) => {
            let day_part = s.get(..10).unwrap_or(s.as_str());
            match NaiveDate::parse_from_str(day_part, "%Y-%m-%d") {
                Ok(d) => Cell::Date(d),
                Err(_) => Cell::Text(s.clone()),
            }
        }
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

pub fn write_table(path: &Path, table: &OutputTable) -> Result<(), String> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header_format = Format::new().set_bold();

    for (col, name) in table.columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, name, &header_format)
            .map_err(|e| e.to_string())?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_idx = (r + 1) as u32;
        for (c, cell) in row.iter().enumerate() {
            let col_idx = c as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(n) => {
                    worksheet
                        .write_number(row_idx, col_idx, *n)
                        .map_err(|e| e.to_string())?;
                }
                Cell::Text(s) => {
                    worksheet
                        .write_string(row_idx, col_idx, s)
                        .map_err(|e| e.to_string())?;
                }
                Cell::Bool(b) => {
                    worksheet
                        .write_boolean(row_idx, col_idx, *b)
                        .map_err(|e| e.to_string())?;
                }
                // Dates circulate as dd/mm/yyyy text in these reports
                Cell::Date(_) => {
                    worksheet
                        .write_string(row_idx, col_idx, &cell.display())
                        .map_err(|e| e.to_string())?;
                }
            }
        }
    }

    workbook
        .save(path)
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;
    Ok(())
}
