use thiserror::Error;

/// Errors raised by the data layer.
///
/// Per-cell coercion failures never surface here; they become missing
/// values in the table.
#[derive(Debug, Error)]
pub enum DataError {
    /// The source could not be fetched or is not readable as a CSV table.
    #[error("data unavailable from {source_addr}: {reason}")]
    DataUnavailable { source_addr: String, reason: String },
}

impl DataError {
    pub fn unavailable(source_addr: impl Into<String>, reason: impl ToString) -> Self {
        DataError::DataUnavailable {
            source_addr: source_addr.into(),
            reason: reason.to_string(),
        }
    }
}
