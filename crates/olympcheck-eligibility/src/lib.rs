//! Eligibility layer: which institutions grant a benefit for a given olympiad diploma.

mod error;
mod loader;
mod matcher;
mod table;

pub use error::EligibilityError;
pub use loader::{load_tables, parse_tables};
pub use matcher::{Matcher, TableSummary};
pub use table::{EligibilityTable, TableRow};
