use thiserror::Error;

#[derive(Debug, Error)]
pub enum EligibilityError {
    #[error("eligibility tables are not initialized: no institution tables were loaded")]
    Uninitialized,

    #[error("duplicate institution table: {0}")]
    DuplicateInstitution(String),

    #[error("reading eligibility tables from {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("eligibility tables JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
