use crate::model::{Cell, CertificateRow, Table};
use crate::normalize;
use crate::sink::LogSink;

/// Positional schema of the certificate base table: code, company, tax id,
/// then the due date at index 4 and the registry status at index 7. The
/// status column is read by operators but unused here.
pub const CERTIFICATE_COLUMNS: usize = 8;

const TAX_ID_COLUMN: usize = 2;
const DUE_COLUMN: usize = 4;

/// Certificate rows carrying a tax id, in table order. Rows whose due
/// cell is not a date cannot be classified and are dropped with a log
/// line.
pub fn scan(table: &Table, log: &dyn LogSink) -> Vec<CertificateRow> {
    let mut out = Vec::new();
    for row in &table.rows {
        let tax_cell = row.get(TAX_ID_COLUMN).unwrap_or(&Cell::Empty);
        if tax_cell.is_empty() {
            continue;
        }

        let code = normalize::code(row.first().unwrap_or(&Cell::Empty));
        let due = match row.get(DUE_COLUMN).and_then(Cell::as_date) {
            Some(d) => d,
            None => {
                log.log(&format!("skipping certificate row {code}: due cell is not a date"));
                continue;
            }
        };

        out.push(CertificateRow {
            code,
            company: row.get(1).map(Cell::display).unwrap_or_default(),
            tax_id: normalize::tax_id(tax_cell),
            due,
        });
    }
    out
}
