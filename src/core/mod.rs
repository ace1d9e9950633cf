//! Core business logic abstractions

pub mod currency;
pub mod error;
pub mod log;

// Re-export main types for cleaner imports
pub use currency::{
    BASE_CURRENCY, Currency, FOREIGN_CURRENCIES, MIN_SUPPORTED_YEAR, snapshot_date,
};
pub use error::ConvertError;
