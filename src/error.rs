use chrono::NaiveDateTime;

/// Errors surfaced by catalog loading, query construction, and data retrieval.
///
/// Nothing is retried or recovered internally; every failure propagates to the
/// immediate caller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested time range is empty or inverted.
    #[error("start time {start} must be earlier than end time {end}")]
    InvalidTimeRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    /// The dataset name is not in the loaded catalog.
    #[error("dataset {0} is not recognized; consider updating your catalog if this is unexpected")]
    UnknownDataset(String),

    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out")]
    Timeout { url: String },

    /// Transport failure (DNS, connection, TLS, non-2xx status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Malformed CSV in a data response or saved file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed catalog JSON, including a missing `dataset` top-level key.
    #[error("catalog JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A timestamp field that does not parse as a date or datetime.
    #[error("invalid timestamp {value:?} in column {column}")]
    Timestamp { column: String, value: String },

    /// A data field that does not parse as a number.
    #[error("invalid numeric value {value:?} in column {column}")]
    Numeric { column: String, value: String },

    /// A structurally valid catalog document with unusable content.
    #[error("catalog error: {0}")]
    Catalog(String),

    /// A response with no data rows where at least one was required.
    #[error("response has no data rows")]
    EmptyResponse,

    /// Filesystem failure while saving or loading a dataset file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for all client operations.
pub type Result<T> = std::result::Result<T, Error>;
