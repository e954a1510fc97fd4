//! Failure taxonomy shared by the validator, upstream client, normalizer and aggregator.

use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Machine-readable kind reported alongside every failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Forbidden,
    BadRequest,
    InvalidCurrency,
    UpstreamError,
    ParseError,
    AggregationError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ErrorKind::Forbidden => "forbidden",
                ErrorKind::BadRequest => "bad_request",
                ErrorKind::InvalidCurrency => "invalid_currency",
                ErrorKind::UpstreamError => "upstream_error",
                ErrorKind::ParseError => "parse_error",
                ErrorKind::AggregationError => "aggregation_error",
            }
        )
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConverterError {
    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),
    #[error("{0}")]
    BadRequest(String),
    /// Transport failure, timeout or non-2xx status from the rate source.
    #[error("Upstream request failed: {0}")]
    Upstream(String),
    #[error("Failed to parse upstream response: {0}")]
    Parse(String),
    /// The upstream returned no samples to compute a result from.
    #[error("Cannot aggregate rates: {0}")]
    Aggregation(String),
}

impl ConverterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConverterError::InvalidCurrency(_) => ErrorKind::InvalidCurrency,
            ConverterError::BadRequest(_) => ErrorKind::BadRequest,
            ConverterError::Upstream(_) => ErrorKind::UpstreamError,
            ConverterError::Parse(_) => ErrorKind::ParseError,
            ConverterError::Aggregation(_) => ErrorKind::AggregationError,
        }
    }
}

pub type Result<T, E = ConverterError> = std::result::Result<T, E>;
