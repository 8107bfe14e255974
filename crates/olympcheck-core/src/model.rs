//! Shared diploma types passed between the fetch pipeline and the API layer.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::jsliteral::integral_f64;

/// Identity of the person whose diplomas are being looked up.
///
/// Only ever used to derive a [`LookupKey`](crate::LookupKey); never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonQuery {
    pub lastname: String,
    pub firstname: String,
    pub middlename: String,
    /// ISO 8601 date (`YYYY-MM-DD`) on the wire.
    pub birthdate: NaiveDate,
}

/// One entry of the `diplomaCodes` array, as published.
///
/// The payload is loosely typed, so the record keeps the whole object and
/// exposes typed accessors for the fields the pipeline reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDiplomaRecord {
    fields: Map<String, Value>,
}

impl RawDiplomaRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Free-text diploma description (`oa`).
    pub fn description(&self) -> Option<&str> {
        self.fields.get("oa").and_then(Value::as_str)
    }

    /// School grade at the time of the diploma (`form`). `11` and `11.0` are
    /// the same grade.
    pub fn form(&self) -> Option<i64> {
        match self.fields.get("form")? {
            Value::Number(n) => as_integral(n),
            _ => None,
        }
    }

    /// Diploma file code (`code`), published either as a string or a number.
    pub fn code(&self) -> Option<String> {
        match self.fields.get("code")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(match as_integral(n) {
                Some(i) => i.to_string(),
                None => n.to_string(),
            }),
            _ => None,
        }
    }

    /// Identity echo (`hashed`) as returned by the site.
    pub fn hashed(&self) -> Option<&str> {
        self.fields.get("hashed").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A qualifying diploma annotated with per-institution eligibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiplomaResult {
    pub hashed: String,
    /// Original description the olympiad fields were parsed from.
    pub description: String,
    pub olympiad: String,
    pub speciality: String,
    pub level: u8,
    pub result: u8,
    pub link: String,
    pub form: u8,
    pub year: i32,
    /// institution name → whether this diploma grants the benefit there
    pub eligibility: BTreeMap<String, bool>,
}

impl DiplomaResult {
    /// Institutions where this diploma counts.
    pub fn eligible_at(&self) -> impl Iterator<Item = &str> {
        self.eligibility
            .iter()
            .filter(|(_, ok)| **ok)
            .map(|(name, _)| name.as_str())
    }
}

fn as_integral(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| n.as_f64().and_then(integral_f64))
}
