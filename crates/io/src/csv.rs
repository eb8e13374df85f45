// CSV/TSV import and export.
//
// Import sniffs the delimiter, tolerates Windows-1252 exports, and types
// each field: numbers, then dd/mm/yyyy or ISO dates, then text.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use confere_core::model::{Cell, OutputTable, Table};

pub fn read_table(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("cannot parse {}: {}", path.display(), e))?;
        if header.is_none() {
            header = Some(record.iter().map(|f| f.trim().to_string()).collect());
            continue;
        }
        rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(Table { header, rows })
}

pub fn write_table(path: &Path, table: &OutputTable) -> Result<(), String> {
    let mut writer = csv::WriterBuilder::new()
        .from_path(path)
        .map_err(|e| format!("cannot write {}: {}", path.display(), e))?;

    writer
        .write_record(&table.columns)
        .map_err(|e| e.to_string())?;
    for row in &table.rows {
        let record: Vec<String> = row.iter().map(Cell::display).collect();
        writer.write_record(&record).map_err(|e| e.to_string())?;
    }
    writer.flush().map_err(|e| e.to_string())?;
    Ok(())
}

fn parse_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Cell::Empty;
    }
    // Zero-padded codes ("00123") must survive as text
    let zero_padded = trimmed.len() > 1
        && trimmed.starts_with('0')
        && !trimmed.starts_with("0.")
        && trimmed.chars().all(|c| c.is_ascii_digit());
    if !zero_padded {
        if let Ok(n) = trimmed.parse::<f64>() {
            return Cell::Number(n);
        }
    }
    for format in ["%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, format) {
            return Cell::Date(d);
        }
    }
    Cell::Text(field.to_string())
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines. The candidate producing the most consistent
/// field count (>1 field) wins.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file and convert to UTF-8 if needed (Excel still exports
/// Windows-1252 CSVs).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}
