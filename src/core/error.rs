//! Error kinds raised by the quote core.

use chrono::NaiveDate;
use thiserror::Error;

/// Validation failures of the normalizer and the converter.
///
/// None of these are fatal; they go back to the caller, which decides how
/// to present them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuoteError {
    /// The source tag does not name any known rate source.
    #[error("Unknown source: {0}")]
    UnknownSource(String),

    /// The payload lacks the fields its source must provide.
    #[error("Malformed payload from {provider}: {reason}")]
    MalformedPayload {
        /// Label of the source whose payload was rejected
        provider: String,
        /// What was missing or invalid
        reason: String,
    },

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Invalid rate: {0}")]
    InvalidRate(f64),

    /// A zero rate is valid but cannot be divided by.
    #[error("Cannot convert with a zero rate")]
    DivisionByZero,

    /// Historical lookups are only defined up to today.
    #[error("Date {0} is in the future")]
    FutureDate(NaiveDate),

    #[error("No historical data for {0}")]
    NoHistoricalData(NaiveDate),
}

impl QuoteError {
    pub(crate) fn malformed(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::MalformedPayload {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}
