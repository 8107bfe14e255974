//! Eligibility lookup across all loaded institution tables.

use std::collections::{BTreeMap, HashSet};

use crate::{EligibilityError, EligibilityTable};

/// Read-only set of institution tables, built once at startup.
///
/// A `Matcher` only exists once at least one table has been loaded, so every
/// lookup runs against initialized data. Share it behind an `Arc`; nothing in
/// it is mutated after construction.
#[derive(Debug, Clone)]
pub struct Matcher {
    tables: Vec<EligibilityTable>,
}

/// Counts reported after loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub institutions: usize,
    pub total_pairs: usize,
    pub empty_tables: usize,
}

impl Matcher {
    /// Fails with [`EligibilityError::Uninitialized`] when `tables` is empty
    /// and [`EligibilityError::DuplicateInstitution`] when two tables share a name.
    pub fn new(tables: Vec<EligibilityTable>) -> Result<Self, EligibilityError> {
        if tables.is_empty() {
            return Err(EligibilityError::Uninitialized);
        }
        let mut seen = HashSet::new();
        for table in &tables {
            if !seen.insert(table.institution()) {
                return Err(EligibilityError::DuplicateInstitution(
                    table.institution().to_string(),
                ));
            }
        }
        Ok(Self { tables })
    }

    /// Per-institution membership of the exact (olympiad, speciality) pair.
    ///
    /// The diploma level is deliberately not part of the key.
    pub fn lookup(&self, olympiad: &str, speciality: &str) -> BTreeMap<String, bool> {
        self.tables
            .iter()
            .map(|t| (t.institution().to_string(), t.contains(olympiad, speciality)))
            .collect()
    }

    pub fn institutions(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(EligibilityTable::institution)
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            institutions: self.tables.len(),
            total_pairs: self.tables.iter().map(EligibilityTable::len).sum(),
            empty_tables: self.tables.iter().filter(|t| t.is_empty()).count(),
        }
    }
}
