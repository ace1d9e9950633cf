//! Error taxonomy for the conversion flow.
//!
//! Validation failures are reported before any I/O happens. Cache and
//! provider failures are soft and only surface once every fallback is
//! exhausted.

use crate::core::currency::{Currency, MIN_SUPPORTED_YEAR};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("year {0} is before the minimum supported year {MIN_SUPPORTED_YEAR}")]
    UnsupportedYear(i32),

    #[error("no rate available for {currency} in {year}: all providers exhausted")]
    ProvidersExhausted { currency: Currency, year: i32 },

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ConvertError {
    /// Machine-readable tag, stable across message wording changes.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::InvalidInput(_) => "invalid_input",
            ConvertError::UnsupportedYear(_) => "unsupported_year",
            ConvertError::ProvidersExhausted { .. } => "providers_exhausted",
            ConvertError::Internal(_) => "internal",
        }
    }
}
