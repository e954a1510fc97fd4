//! Core business logic abstractions

pub mod config;
pub mod converter;
pub mod currency;
pub mod error;
pub mod log;
pub mod rate;
pub mod request_log;

// Re-export main types for cleaner imports
pub use converter::{Converter, RateSource};
pub use currency::{CurrencyCode, CurrencyPair, SupportedCurrencySet, validate};
pub use error::{ConverterError, ErrorKind};
pub use rate::{AverageResult, ConversionResult, HistoricalRate, RatePoint, SeriesQuery};
pub use request_log::{Operation, RequestLog, RequestRecord};
