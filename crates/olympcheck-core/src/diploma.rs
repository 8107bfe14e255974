//! Structured fields from a diploma's free-text description.
//!
//! The registry describes each diploma in one sentence:
//!
//! ```text
//! №5. "Турнир городов" ("код" "математика"), 2 уровень. Диплом 1 степени.
//!  ^    ^                ^          ^         ^                 ^
//!  |    olympiad name    |          |         level             result degree
//!  |                     |          speciality (last quoted token)
//!  diploma number        parenthesised clause
//! ```
//!
//! The parenthesised clause may carry other quoted tokens before the
//! speciality (an olympiad code, a profile). Quoted tokens may themselves
//! contain parentheses. Descriptions that do not fit are reported as `None`,
//! never as an error.

use std::sync::LazyLock;

use regex::Regex;

static DESCRIPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^№\s*([^.\s]+)\.\s*"([^"]+)"\s*\(((?:"[^"]*"|[^")])*)\),\s*(\d+)\s+уровень\.\s*Диплом\s+(\d+)\s+степени\."#,
    )
    .expect("static description pattern")
});

static QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]+)""#).expect("static quoted-token pattern"));

/// Olympiad fields parsed from one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOlympiadInfo {
    /// Diploma number as printed; not used for matching.
    pub number: String,
    pub name: String,
    pub speciality: String,
    pub level: u8,
    /// Diploma degree: 1 for winners, 2 and 3 for prize-winners.
    pub result: u8,
}

/// Parse a description, anchored at its start.
pub fn parse_description(text: &str) -> Option<ParsedOlympiadInfo> {
    let caps = DESCRIPTION.captures(text)?;
    let clause = caps.get(3)?.as_str();
    let speciality = QUOTED.captures_iter(clause).last()?.get(1)?.as_str();

    Some(ParsedOlympiadInfo {
        number: caps[1].to_string(),
        name: caps[2].to_string(),
        speciality: speciality.to_string(),
        level: caps[4].parse().ok()?,
        result: caps[5].parse().ok()?,
    })
}
