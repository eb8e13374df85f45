use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};

use crate::error::EngineError;
use crate::model::{Cell, Table, TaskRow};
use crate::normalize;

/// Positional schema of the robot's base table: code, company, task.
/// Only the first two columns feed the schedule.
pub const TASK_COLUMNS: usize = 3;

/// Share the generated statements land in.
const OUTPUT_DIR: &str = r"Z:\Pessoal\2025\GMS";
const OUTPUT_EXT: &str = ".pdf";

/// A validated MM/YYYY accounting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    month: u32,
    year: i32,
}

impl Period {
    /// Strict MM/YYYY: two-digit month 01..=12, four-digit year.
    pub fn parse(value: &str) -> Result<Self, EngineError> {
        let err = || EngineError::PeriodFormat {
            value: value.to_string(),
        };

        let (month, year) = value.split_once('/').ok_or_else(err)?;
        if month.len() != 2 || year.len() != 4 {
            return Err(err());
        }
        let month: u32 = month.parse().map_err(|_| err())?;
        let year: i32 = year.parse().map_err(|_| err())?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Period { month, year })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Period {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn label(&self) -> String {
        format!("{:02}/{:04}", self.month, self.year)
    }

    /// The period with its separator removed, as file names carry it.
    pub fn competence(&self) -> String {
        format!("{:02}{:04}", self.month, self.year)
    }
}

/// Build the de-duplicated task schedule. `period` comes from the
/// operator or defaults to the month of `today`. Duplicate
/// (code, company) pairs keep their first occurrence.
pub fn build(
    table: &Table,
    period: Option<&str>,
    today: NaiveDate,
) -> Result<Vec<TaskRow>, EngineError> {
    let period = match period {
        Some(value) => Period::parse(value)?,
        None => Period::from_date(today),
    };
    let competence = period.competence();

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut out = Vec::new();
    for row in &table.rows {
        let code = normalize::code(row.first().unwrap_or(&Cell::Empty));
        let company = row.get(1).map(Cell::display).unwrap_or_default();
        if !seen.insert((code.clone(), company.clone())) {
            continue;
        }

        let save_as = format!("{code}-{company}-{competence}");
        let path = format!(r"{OUTPUT_DIR}\{save_as}{OUTPUT_EXT}");
        out.push(TaskRow {
            code,
            company,
            period: period.label(),
            competence: competence.clone(),
            save_as,
            path,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(code: Cell, company: &str) -> Vec<Cell> {
        vec![code, Cell::Text(company.into()), Cell::Text("task".into())]
    }

    #[test]
    fn period_parses_strict_mm_yyyy() {
        assert_eq!(Period::parse("08/2025").unwrap().label(), "08/2025");
        assert_eq!(Period::parse("12/2024").unwrap().competence(), "122024");
    }

    #[test]
    fn period_rejects_loose_forms() {
        for bad in ["8/2025", "13/2025", "082025", "ab/cd", "08/25", "08/2025/x"] {
            let err = Period::parse(bad).unwrap_err();
            assert!(
                matches!(err, EngineError::PeriodFormat { .. }),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn defaults_to_the_current_month() {
        let table = Table::new(vec![row(Cell::Text("1".into()), "Acme")]);
        let rows = build(&table, None, date(2025, 8, 5)).unwrap();
        assert_eq!(rows[0].period, "08/2025");
        assert_eq!(rows[0].competence, "082025");
    }

    #[test]
    fn duplicates_keep_the_first_occurrence() {
        let table = Table::new(vec![
            row(Cell::Text("1".into()), "Acme"),
            row(Cell::Number(1.0), "Acme"),
            row(Cell::Text("1".into()), "Acme Filial"),
        ]);
        let rows = build(&table, Some("07/2025"), date(2025, 8, 5)).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company, "Acme");
        assert_eq!(rows[1].company, "Acme Filial");
    }

    #[test]
    fn derived_fields_compose() {
        let table = Table::new(vec![row(Cell::Text("42".into()), "Foo Corp")]);
        let rows = build(&table, Some("07/2025"), date(2025, 8, 5)).unwrap();
        assert_eq!(rows[0].save_as, "42-Foo Corp-072025");
        assert_eq!(rows[0].path, r"Z:\Pessoal\2025\GMS\42-Foo Corp-072025.pdf");
    }
}
