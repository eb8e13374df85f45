//! Canonical forms for the fields used to join records across documents.

use crate::model::Cell;

/// Canonicalize a client code into its shortest digit-string form.
///
/// Spreadsheet imports hand codes back as integers, floats with a spurious
/// `.0`, or padded text; all of them must compare equal. Unparseable input
/// falls back to its trimmed string form. Total and idempotent.
pub fn code(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Cell::Number(n) => strip_float_suffix(&n.to_string()),
        Cell::Text(s) => strip_float_suffix(s.trim()),
        other => strip_float_suffix(other.display().trim()),
    }
}

/// Comparison key for a display name: trimmed, lowercased. Accented
/// characters pass through unchanged.
pub fn name_key(cell: &Cell) -> String {
    match cell {
        Cell::Empty => String::new(),
        Cell::Text(s) => s.trim().to_lowercase(),
        other => other.display().trim().to_lowercase(),
    }
}

/// Reformat a CNPJ-style tax id into exactly 14 digits: drop a float
/// artifact, strip punctuation, left-pad with zeros. Registries export
/// these with the leading zeros eaten by numeric cell types.
pub fn tax_id(cell: &Cell) -> String {
    let raw = cell.display();
    let trimmed = raw.trim();
    let stem = trimmed.strip_suffix(".0").unwrap_or(trimmed);
    let digits: String = stem.chars().filter(char::is_ascii_digit).collect();
    format!("{digits:0>14}")
}

// Stripping the suffix can expose trailing whitespace ("12 .0"), so trim
// again after each strip; the result is a fixpoint of both steps.
fn strip_float_suffix(s: &str) -> String {
    let mut s = s.trim();
    while let Some(stripped) = s.strip_suffix(".0") {
        s = stripped.trim_end();
    }
    s.to_string()
}
