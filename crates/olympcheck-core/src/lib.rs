pub mod decode;
pub mod diploma;
pub mod endpoint;
pub mod extract;
pub mod identity;
pub mod jsliteral;
pub mod model;

pub use decode::decode_payload;
pub use diploma::{ParsedOlympiadInfo, parse_description};
pub use endpoint::Endpoints;
pub use extract::{ExtractError, extract_records};
pub use identity::LookupKey;
pub use model::{DiplomaResult, PersonQuery, RawDiplomaRecord};
