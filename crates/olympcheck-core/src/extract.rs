//! Pull the `diplomaCodes` array out of a `codes.js` payload.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::RawDiplomaRecord;
use crate::jsliteral::{LiteralError, parse_prefix};

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdiplomaCodes\s*=").expect("static assignment pattern")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("`diplomaCodes` assignment not found in payload")]
    AssignmentNotFound,
    #[error("malformed `diplomaCodes` literal: {0}")]
    Syntax(#[from] LiteralError),
    #[error("`diplomaCodes` is not an array")]
    NotAnArray,
    #[error("entry {index} of `diplomaCodes` is not an object")]
    NotAnObject { index: usize },
}

/// Byte offset of the right-hand side of the first `diplomaCodes = …`.
fn assignment_rhs(text: &str) -> Option<usize> {
    ASSIGNMENT
        .find_iter(text)
        .map(|m| m.end())
        // `diplomaCodes == x` is a comparison, not an assignment.
        .find(|&end| !text[end..].starts_with('='))
}

/// Extract the diploma records from decoded `codes.js` text.
///
/// The offsets inside [`ExtractError::Syntax`] are relative to the start of
/// the right-hand side of the assignment.
pub fn extract_records(text: &str) -> Result<Vec<RawDiplomaRecord>, ExtractError> {
    let start = assignment_rhs(text).ok_or(ExtractError::AssignmentNotFound)?;
    let (value, _) = parse_prefix(&text[start..])?;

    let Value::Array(items) = value else {
        return Err(ExtractError::NotAnArray);
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(RawDiplomaRecord::new(fields)),
            _ => Err(ExtractError::NotAnObject { index }),
        })
        .collect()
}
