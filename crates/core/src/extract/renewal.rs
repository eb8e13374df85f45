use chrono::NaiveDate;

use crate::model::{Cell, Renewal, Table};
use crate::normalize;

/// Positional schema of the renewal base table: code, person, due date.
pub const RENEWAL_COLUMNS: usize = 3;

/// Contracts still current at run time, in table order. Rows with a
/// missing or non-date due cell are dropped, as are contracts whose due
/// date is strictly before `today`.
pub fn scan(table: &Table, today: NaiveDate) -> Vec<Renewal> {
    let mut out = Vec::new();
    for row in &table.rows {
        let due = match row.get(2).and_then(Cell::as_date) {
            Some(d) => d,
            None => continue,
        };
        if due < today {
            continue;
        }
        out.push(Renewal {
            code: normalize::code(row.first().unwrap_or(&Cell::Empty)),
            person: row.get(1).map(Cell::display).unwrap_or_default(),
            due,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(code: &str, person: &str, due: Cell) -> Vec<Cell> {
        vec![Cell::Text(code.into()), Cell::Text(person.into()), due]
    }

    #[test]
    fn expired_contracts_are_dropped() {
        let today = date(2024, 6, 15);
        let table = Table::new(vec![
            row("1", "Ana", Cell::Date(date(2024, 6, 14))),
            row("2", "Bruno", Cell::Date(date(2024, 6, 15))),
            row("3", "Carla", Cell::Date(date(2024, 7, 1))),
        ]);
        let kept = scan(&table, today);
        let codes: Vec<&str> = kept.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["2", "3"]);
    }

    #[test]
    fn non_date_due_cells_are_dropped() {
        let today = date(2024, 6, 15);
        let table = Table::new(vec![
            row("1", "Ana", Cell::Empty),
            row("2", "Bruno", Cell::Text("07/01/2024".into())),
            row("3", "Carla", Cell::Date(date(2024, 7, 1))),
        ]);
        let kept = scan(&table, today);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].code, "3");
    }

    #[test]
    fn codes_are_normalized() {
        let today = date(2024, 6, 15);
        let table = Table::new(vec![vec![
            Cell::Number(42.0),
            Cell::Text("Dora".into()),
            Cell::Date(date(2024, 8, 1)),
        ]]);
        let kept = scan(&table, today);
        assert_eq!(kept[0].code, "42");
        assert_eq!(kept[0].person, "Dora");
    }
}
