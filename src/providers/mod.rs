pub mod exchangerate_host;
pub mod frankfurter;

pub use exchangerate_host::ExchangerateHostProvider;
pub use frankfurter::FrankfurterProvider;
