use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::error::EngineError;
use crate::report::ReportKind;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A loosely-typed spreadsheet scalar, as table readers hand them back.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Render for report output. Whole-number floats print as integers
    /// (spreadsheet imports hand back `2052.0` for a code typed as `2052`);
    /// dates print `dd/mm/yyyy`, the format the reports circulate in.
    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{n}")
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format("%d/%m/%Y").to_string(),
            Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Empty => serializer.serialize_unit(),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Date(d) => serializer.serialize_str(&d.to_string()),
            Cell::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

/// A positional table: an optional header row plus data rows. Schemas are
/// positional throughout; header text is never used to locate a column.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        Table { header: None, rows }
    }

    pub fn with_header(header: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Table {
            header: Some(header),
            rows,
        }
    }

    /// Column count: the header's when present, else the widest data row.
    pub fn width(&self) -> usize {
        match &self.header {
            Some(h) => h.len(),
            None => self.rows.iter().map(Vec::len).max().unwrap_or(0),
        }
    }

    pub fn require_columns(&self, required: usize) -> Result<(), EngineError> {
        let found = self.width();
        if found < required {
            return Err(EngineError::TooFewColumns { required, found });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// One contacts-table row, shared by the code and name indexes.
#[derive(Debug, Clone)]
pub struct Contact {
    /// Canonical digit-string code; may be empty.
    pub code: String,
    /// The code cell exactly as it appeared in the contacts sheet.
    pub raw_code: Cell,
    pub display_name: String,
    pub contact: String,
    pub group: String,
}

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// A client code pulled from a report file name.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMatch {
    pub code: String,
    pub file_name: String,
}

/// One open parcel from a billing statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Parcel {
    pub code: String,
    pub company: String,
    /// Amount in cents. Never a float.
    pub amount_cents: i64,
    pub due: NaiveDate,
}

/// A contract still current at run time.
#[derive(Debug, Clone, PartialEq)]
pub struct Renewal {
    pub code: String,
    pub person: String,
    pub due: NaiveDate,
}

/// A certificate row with a registered tax id.
#[derive(Debug, Clone, PartialEq)]
pub struct CertificateRow {
    pub code: String,
    pub company: String,
    /// 14-digit tax id.
    pub tax_id: String,
    pub due: NaiveDate,
}

/// One robot task derived from the base schedule table.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub code: String,
    pub company: String,
    pub period: String,
    pub competence: String,
    pub save_as: String,
    pub path: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// An assembled report: named columns, rows in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Match-path counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows: usize,
    pub matched_code: usize,
    pub matched_name: usize,
    pub matched_fuzzy: usize,
    pub unmatched: usize,
}

/// Everything a run produces: the table to write plus its summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub kind: ReportKind,
    pub summary: RunSummary,
    pub table: OutputTable,
}
