//! One institution's olympiad benefit table.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// One (olympiad, speciality) pair granting the benefit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub olympiad: String,
    pub speciality: String,
}

impl TableRow {
    pub fn new(olympiad: impl Into<String>, speciality: impl Into<String>) -> Self {
        Self {
            olympiad: olympiad.into(),
            speciality: speciality.into(),
        }
    }
}

/// Immutable set of (olympiad, speciality) pairs for one institution.
///
/// Keyed olympiad → specialities so lookups borrow the query strings instead
/// of building an owned tuple.
#[derive(Debug, Clone)]
pub struct EligibilityTable {
    institution: String,
    olympiads: HashMap<String, HashSet<String>>,
    pairs: usize,
}

impl EligibilityTable {
    /// Build a table from rows. Repeated pairs are stored once.
    pub fn from_rows(institution: impl Into<String>, rows: impl IntoIterator<Item = TableRow>) -> Self {
        let mut olympiads: HashMap<String, HashSet<String>> = HashMap::new();
        let mut pairs = 0;
        for row in rows {
            if olympiads
                .entry(row.olympiad)
                .or_default()
                .insert(row.speciality)
            {
                pairs += 1;
            }
        }
        Self {
            institution: institution.into(),
            olympiads,
            pairs,
        }
    }

    pub fn institution(&self) -> &str {
        &self.institution
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, olympiad: &str, speciality: &str) -> bool {
        self.olympiads
            .get(olympiad)
            .is_some_and(|specialities| specialities.contains(speciality))
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}
