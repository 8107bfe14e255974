//! Loading institution tables from a JSON document.
//!
//! Expected shape:
//!
//! ```json
//! {
//!   "institutions": [
//!     {
//!       "name": "МГУ",
//!       "olympiads": [
//!         { "olympiad": "Турнир городов", "speciality": "математика", "level": 2 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `level` is accepted for reference and ignored; matching uses the
//! (olympiad, speciality) pair only.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::{EligibilityError, EligibilityTable, TableRow};

#[derive(Deserialize)]
struct TablesDocument {
    institutions: Vec<InstitutionTable>,
}

#[derive(Deserialize)]
struct InstitutionTable {
    name: String,
    #[serde(default)]
    olympiads: Vec<TableRow>,
}

/// Parse institution tables from JSON text.
pub fn parse_tables(json: &str) -> Result<Vec<EligibilityTable>, EligibilityError> {
    let doc: TablesDocument = serde_json::from_str(json)?;
    if doc.institutions.is_empty() {
        return Err(EligibilityError::Uninitialized);
    }
    Ok(doc
        .institutions
        .into_iter()
        .map(|inst| EligibilityTable::from_rows(inst.name, inst.olympiads))
        .collect())
}

/// Read and parse institution tables from a JSON file.
pub fn load_tables(path: &Path) -> Result<Vec<EligibilityTable>, EligibilityError> {
    let json = std::fs::read_to_string(path).map_err(|source| EligibilityError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tables = parse_tables(&json)?;
    info!(
        path = %path.display(),
        institutions = tables.len(),
        pairs = tables.iter().map(EligibilityTable::len).sum::<usize>(),
        "loaded eligibility tables"
    );
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::Matcher;

    const DOC: &str = r#"{
        "institutions": [
            {
                "name": "МГУ",
                "olympiads": [
                    { "olympiad": "Турнир городов", "speciality": "математика", "level": 2 },
                    { "olympiad": "Высшая проба", "speciality": "история" }
                ]
            },
            { "name": "МФТИ", "olympiads": [] },
            { "name": "СПбГУ" }
        ]
    }"#;

    #[test]
    fn parses_document() {
        let tables = parse_tables(DOC).unwrap();
        assert_eq!(tables.len(), 3);
        assert_eq!(tables[0].institution(), "МГУ");
        assert_eq!(tables[0].len(), 2);
        assert!(tables[0].contains("Турнир городов", "математика"));
        assert!(tables[1].is_empty());
        assert!(tables[2].is_empty());
    }

    #[test]
    fn level_does_not_affect_matching() {
        let tables = parse_tables(DOC).unwrap();
        let matcher = Matcher::new(tables).unwrap();
        let result = matcher.lookup("Турнир городов", "математика");
        assert!(result["МГУ"]);
    }

    #[test]
    fn no_institutions_is_uninitialized() {
        let err = parse_tables(r#"{"institutions": []}"#).unwrap_err();
        assert!(matches!(err, EligibilityError::Uninitialized));
    }

    #[test]
    fn malformed_json() {
        let err = parse_tables(r#"{"institutions": [{"olympiads": []}]}"#).unwrap_err();
        assert!(matches!(err, EligibilityError::Json(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let tables = load_tables(file.path()).unwrap();
        assert_eq!(tables.len(), 3);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = load_tables(&path).unwrap_err();
        match err {
            EligibilityError::Io { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }
}
