use std::collections::{BTreeMap, HashMap};

use crate::error::EngineError;
use crate::model::{Cell, Contact, Table};
use crate::normalize;
use crate::similarity;

/// Minimum columns in a contacts table: code, company, contact, group.
pub const CONTACT_COLUMNS: usize = 4;

/// Fuzzy name matches below this similarity are rejected.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// In-memory contact index, built once per run and discarded with it.
///
/// Both indexes point into the same slot vector, so a contact reachable by
/// code and by name is one value, not two copies. Duplicate codes and
/// duplicate name keys keep the last row.
#[derive(Debug)]
pub struct ContactDirectory {
    contacts: Vec<Contact>,
    by_code: HashMap<String, usize>,
    // BTreeMap keeps the fuzzy scan order (and therefore its tie-breaking)
    // stable across runs.
    by_name: BTreeMap<String, usize>,
}

impl ContactDirectory {
    /// Index a contacts table. The table must carry at least
    /// [`CONTACT_COLUMNS`] columns.
    pub fn from_table(table: &Table) -> Result<Self, EngineError> {
        table.require_columns(CONTACT_COLUMNS)?;

        let mut dir = ContactDirectory {
            contacts: Vec::with_capacity(table.rows.len()),
            by_code: HashMap::new(),
            by_name: BTreeMap::new(),
        };

        for row in &table.rows {
            let raw_code = row.first().cloned().unwrap_or(Cell::Empty);
            let code = normalize::code(&raw_code);
            let name_cell = row.get(1).cloned().unwrap_or(Cell::Empty);
            let name = normalize::name_key(&name_cell);

            let slot = dir.contacts.len();
            dir.contacts.push(Contact {
                code: code.clone(),
                raw_code,
                display_name: name_cell.display(),
                contact: row.get(2).map(Cell::display).unwrap_or_default(),
                group: row.get(3).map(Cell::display).unwrap_or_default(),
            });

            if !code.is_empty() {
                dir.by_code.insert(code, slot);
            }
            if !name.is_empty() {
                dir.by_name.insert(name, slot);
            }
        }

        Ok(dir)
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn lookup_code(&self, code: &str) -> Option<&Contact> {
        self.by_code.get(code).map(|&slot| &self.contacts[slot])
    }

    pub fn lookup_name(&self, name_key: &str) -> Option<&Contact> {
        self.by_name.get(name_key).map(|&slot| &self.contacts[slot])
    }

    /// Best fuzzy match scoring at or above `threshold`, with its score.
    /// Only a strictly better score displaces the current best, so ties
    /// keep the first name in scan order.
    pub fn lookup_fuzzy(&self, name_key: &str, threshold: f64) -> Option<(&Contact, f64)> {
        if name_key.is_empty() {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for (name, &slot) in &self.by_name {
            let score = similarity::ratio(name_key, name);
            if score >= threshold && best.map_or(true, |(_, s)| score > s) {
                best = Some((slot, score));
            }
        }

        best.map(|(slot, score)| (&self.contacts[slot], score))
    }
}
