//! URL templates for the diploma results site.

use crate::LookupKey;

/// Static storage root of the public diploma registry.
pub const DEFAULT_BASE_URL: &str = "https://diploma.rsr-olymp.ru/files/rsosh-diplomas-static";

/// Builds per-year resource addresses under a storage root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    /// `base_url` should be the storage root, e.g. [`DEFAULT_BASE_URL`].
    /// A trailing slash is dropped.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Script listing a person's released diplomas for `year`.
    pub fn codes_url(&self, year: i32, key: &LookupKey) -> String {
        format!(
            "{}/compiled-storage-{year}/by-person-released/{key}/codes.js",
            self.base_url
        )
    }

    /// PDF of a single diploma.
    pub fn diploma_link(&self, year: i32, code: &str) -> String {
        format!(
            "{}/compiled-storage-{year}/by-code/{code}/white.pdf",
            self.base_url
        )
    }
}
