//! Per-year fan-out: one fetch-decode-extract-match pipeline per probed year.
//!
//! All years are probed concurrently on the caller's task. A failing year
//! (network error, timeout, unexpected status, unparseable payload) is logged
//! and contributes nothing; it never aborts the other years.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use futures::future::join_all;
use olympcheck_core::{
    DiplomaResult, Endpoints, ExtractError, LookupKey, PersonQuery, RawDiplomaRecord,
    decode_payload, extract_records, parse_description,
};
use olympcheck_eligibility::Matcher;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::{Transport, TransportError};

/// Number of years probed, counting the current one.
pub const DEFAULT_YEARS_BACK: u32 = 7;

/// Per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Grades whose diplomas count.
const QUALIFYING_FORMS: [i64; 2] = [10, 11];

#[derive(Error, Debug)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("payload parse error: {0}")]
    Payload(#[from] ExtractError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerConfig {
    pub years_back: u32,
    pub timeout: Duration,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            years_back: DEFAULT_YEARS_BACK,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Looks up a person's diplomas across recent years and annotates each with
/// per-institution eligibility.
pub struct DiplomaChecker<T> {
    transport: T,
    endpoints: Endpoints,
    matcher: Arc<Matcher>,
    config: CheckerConfig,
}

impl<T: Transport> DiplomaChecker<T> {
    pub fn new(transport: T, endpoints: Endpoints, matcher: Arc<Matcher>, config: CheckerConfig) -> Self {
        Self {
            transport,
            endpoints,
            matcher,
            config,
        }
    }

    /// Years probed when the current year is `current_year`, newest first.
    pub fn years(&self, current_year: i32) -> impl Iterator<Item = i32> {
        let span = i32::try_from(self.config.years_back).unwrap_or(i32::MAX);
        (0..span).map(move |offset| current_year - offset)
    }

    /// Check the window ending at the current UTC year.
    pub async fn check(&self, person: &PersonQuery) -> Vec<DiplomaResult> {
        self.check_from(person, Utc::now().year()).await
    }

    /// Check the window ending at `current_year`.
    ///
    /// Results are concatenated in probe order (newest year first). Years that
    /// failed are indistinguishable from years with no diplomas.
    pub async fn check_from(&self, person: &PersonQuery, current_year: i32) -> Vec<DiplomaResult> {
        let key = person.lookup_key();
        let probes = self.years(current_year).map(|year| self.year_or_empty(year, &key));
        let results: Vec<DiplomaResult> = join_all(probes).await.into_iter().flatten().collect();
        info!(
            current_year,
            years = self.config.years_back,
            found = results.len(),
            "diploma check complete"
        );
        results
    }

    async fn year_or_empty(&self, year: i32, key: &LookupKey) -> Vec<DiplomaResult> {
        match self.fetch_year(year, key).await {
            Ok(results) => results,
            Err(e) => {
                error!(year, error = %e, "diploma lookup failed; treating year as empty");
                Vec::new()
            }
        }
    }

    /// Run one year's pipeline. A 404 means no diplomas that year.
    pub async fn fetch_year(&self, year: i32, key: &LookupKey) -> Result<Vec<DiplomaResult>, FetchError> {
        let url = self.endpoints.codes_url(year, key);
        let resp = self.transport.get(&url, self.config.timeout).await?;
        match resp.status {
            200 => {}
            404 => {
                debug!(year, "no diplomas published");
                return Ok(Vec::new());
            }
            status => return Err(FetchError::UnexpectedStatus { status, url }),
        }

        let text = decode_payload(&resp.body);
        let records = extract_records(&text)?;
        let total = records.len();
        let results: Vec<DiplomaResult> = records
            .iter()
            .filter_map(|record| self.annotate(year, record))
            .collect();
        info!(year, total, qualifying = results.len(), "diplomas fetched");
        Ok(results)
    }

    /// Grade filter, description parse, eligibility match for one record.
    fn annotate(&self, year: i32, record: &RawDiplomaRecord) -> Option<DiplomaResult> {
        let form = record.form().filter(|f| QUALIFYING_FORMS.contains(f))?;

        let Some(description) = record.description() else {
            warn!(year, "record without description; skipping");
            return None;
        };
        let Some(info) = parse_description(description) else {
            warn!(year, description, "description does not match diploma format; skipping");
            return None;
        };
        let Some(code) = record.code() else {
            warn!(year, description, "record without diploma code; skipping");
            return None;
        };

        Some(DiplomaResult {
            hashed: record.hashed().unwrap_or_default().to_string(),
            description: description.to_string(),
            eligibility: self.matcher.lookup(&info.name, &info.speciality),
            olympiad: info.name,
            speciality: info.speciality,
            level: info.level,
            result: info.result,
            link: self.endpoints.diploma_link(year, &code),
            form: form as u8,
            year,
        })
    }
}
