//! Supported currencies and the historical snapshot convention.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Earliest year with rate data we consider reliable.
pub const MIN_SUPPORTED_YEAR: i32 = 2000;

/// The fixed reference currency all stored rates are quoted against.
pub const BASE_CURRENCY: Currency = Currency::Nok;

/// The supported quoted currencies, i.e. everything except the base.
pub const FOREIGN_CURRENCIES: [Currency; 2] = [Currency::Usd, Currency::Eur];

/// Closed set of currencies the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    Nok,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Nok => "NOK",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn is_base(&self) -> bool {
        *self == BASE_CURRENCY
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOK" => Ok(Currency::Nok),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            _ => Err(()),
        }
    }
}

/// Canonical calendar date representing "year Y" for rate lookups.
/// January 15 by convention; mid-month avoids year-boundary fixings.
pub fn snapshot_date(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 15).expect("January 15 exists in every year")
}
