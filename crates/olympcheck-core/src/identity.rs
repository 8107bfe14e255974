//! Lookup keys derived from a person's identity.
//!
//! The results site publishes each person's diplomas under the SHA-256 of
//! `"<lastname> <firstname> <middlename> <YYYY-MM-DD>"`, hex-encoded.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::PersonQuery;

/// Length of a lookup key in hex characters.
pub const LOOKUP_KEY_LEN: usize = 64;

/// Opaque hex digest identifying a person on the results site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey(String);

impl LookupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PersonQuery {
    /// The space-separated string the site hashes.
    pub fn canonical(&self) -> String {
        format!(
            "{} {} {} {}",
            self.lastname,
            self.firstname,
            self.middlename,
            self.birthdate.format("%Y-%m-%d")
        )
    }

    pub fn lookup_key(&self) -> LookupKey {
        let mut hasher = Sha256::new();
        hasher.update(self.canonical().as_bytes());
        LookupKey(format!("{:x}", hasher.finalize()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn ivanov() -> PersonQuery {
        PersonQuery {
            lastname: "Иванов".into(),
            firstname: "Иван".into(),
            middlename: "Иванович".into(),
            birthdate: NaiveDate::from_ymd_opt(2005, 1, 1).unwrap(),
        }
    }

    #[test]
    fn canonical_string() {
        assert_eq!(ivanov().canonical(), "Иванов Иван Иванович 2005-01-01");
    }

    #[test]
    fn canonical_pads_month_and_day() {
        let mut p = ivanov();
        p.birthdate = NaiveDate::from_ymd_opt(2003, 2, 9).unwrap();
        assert!(p.canonical().ends_with(" 2003-02-09"));
    }

    #[test]
    fn key_is_lowercase_hex_of_fixed_length() {
        let key = ivanov().lookup_key();
        assert_eq!(key.as_str().len(), LOOKUP_KEY_LEN);
        assert!(
            key.as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn key_is_deterministic() {
        assert_eq!(ivanov().lookup_key(), ivanov().lookup_key());
    }

    #[test]
    fn known_ascii_digest() {
        let p = PersonQuery {
            lastname: "a".into(),
            firstname: "b".into(),
            middlename: "c".into(),
            birthdate: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        };
        let mut hasher = Sha256::new();
        hasher.update(b"a b c 2000-01-01");
        assert_eq!(p.lookup_key().as_str(), format!("{:x}", hasher.finalize()));
    }

    #[test]
    fn each_field_changes_the_key() {
        let base = ivanov().lookup_key();

        let mut p = ivanov();
        p.lastname = "Петров".into();
        assert_ne!(p.lookup_key(), base);

        let mut p = ivanov();
        p.firstname = "Пётр".into();
        assert_ne!(p.lookup_key(), base);

        let mut p = ivanov();
        p.middlename = "Петрович".into();
        assert_ne!(p.lookup_key(), base);

        let mut p = ivanov();
        p.birthdate = NaiveDate::from_ymd_opt(2005, 1, 2).unwrap();
        assert_ne!(p.lookup_key(), base);
    }

    #[test]
    fn display_matches_as_str() {
        let key = ivanov().lookup_key();
        assert_eq!(key.to_string(), key.as_str());
    }
}
