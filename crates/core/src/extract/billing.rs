//! Billing statement text scan.
//!
//! The statement lists one client block after another: a `Cliente:` line,
//! a `Nome:` line, then one line per open parcel carrying a due date and
//! an amount. The scan is a single forward pass threading the active
//! client code and name through the lines; a parcel only emits once both
//! are known. A line is allowed to fire more than one of the patterns.

use chrono::NaiveDate;
use regex::Regex;

use crate::model::{Cell, Parcel};
use crate::normalize;
use crate::sink::LogSink;

/// Scan extracted statement text into parcels, in document order.
/// Lines that match the parcel shape but carry an impossible date are
/// skipped and logged, never fatal.
pub fn scan(text: &str, log: &dyn LogSink) -> Vec<Parcel> {
    let client_re = Regex::new(r"Cliente: (\d+)").unwrap();
    let name_re = Regex::new(r"Nome: (.+)").unwrap();
    let parcel_re = Regex::new(r"(\d{2}/\d{2}/\d{4}) (\d{1,3}(?:\.\d{3})*,\d{2})").unwrap();

    let mut current_code: Option<String> = None;
    let mut current_name: Option<String> = None;
    let mut parcels = Vec::new();

    for line in text.lines() {
        if let Some(caps) = client_re.captures(line) {
            current_code = Some(normalize::code(&Cell::Text(caps[1].to_string())));
        }

        if let Some(caps) = name_re.captures(line) {
            if current_code.is_some() {
                current_name = Some(caps[1].trim_end().to_string());
            }
        }

        if let Some(caps) = parcel_re.captures(line) {
            if let (Some(code), Some(name)) = (current_code.as_ref(), current_name.as_ref()) {
                let due = match NaiveDate::parse_from_str(&caps[1], "%d/%m/%Y") {
                    Ok(d) => d,
                    Err(_) => {
                        log.log(&format!("skipping parcel line, bad date: {}", line.trim()));
                        continue;
                    }
                };
                let amount_cents = match parse_amount(&caps[2]) {
                    Some(cents) => cents,
                    None => {
                        log.log(&format!("skipping parcel line, bad amount: {}", line.trim()));
                        continue;
                    }
                };
                parcels.push(Parcel {
                    code: code.clone(),
                    company: name.clone(),
                    amount_cents,
                    due,
                });
            }
        }
    }

    parcels
}

/// `1.234,56` → 123456 cents. Integer math only.
fn parse_amount(s: &str) -> Option<i64> {
    let (whole, frac) = s.rsplit_once(',')?;
    let whole: i64 = whole
        .chars()
        .filter(|c| *c != '.')
        .collect::<String>()
        .parse()
        .ok()?;
    let frac: i64 = frac.parse().ok()?;
    Some(whole * 100 + frac)
}
