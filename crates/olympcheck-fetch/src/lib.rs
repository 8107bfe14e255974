//! Fetch layer: HTTP transport and the per-year fan-out that turns a person
//! into annotated diploma results.

mod checker;
mod transport;

pub use checker::{CheckerConfig, DEFAULT_TIMEOUT, DEFAULT_YEARS_BACK, DiplomaChecker, FetchError};
pub use transport::{HttpTransport, Transport, TransportError, TransportResponse};
