use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Malformed record {record_id}: {details}")]
    MalformedRecord { record_id: String, details: String },

    #[error("Invalid quarter {0}: must be between 1 and 4")]
    InvalidQuarter(u32),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Record store error: {0}")]
    StoreError(String),

    #[cfg(feature = "airtable")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
