//! Rate-source abstraction and the operations exposed by the API.

use crate::core::currency::{CurrencyPair, SupportedCurrencySet, validate};
use crate::core::error::{ConverterError, Result};
use crate::core::rate::{
    self, AverageResult, ConversionResult, HistoricalRate, RatePoint, SeriesQuery,
};
use crate::core::request_log::{Operation, RequestLog, RequestRecord};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate_series(&self, query: &SeriesQuery) -> Result<Vec<RatePoint>>;
    async fn fetch_currencies(&self) -> Result<SupportedCurrencySet>;
}

/// Validator, upstream source and aggregator wired together per operation.
#[derive(Clone)]
pub struct Converter {
    source: Arc<dyn RateSource>,
    request_log: RequestLog,
    validate_membership: bool,
}

impl Converter {
    pub fn new(source: Arc<dyn RateSource>, request_log: RequestLog) -> Self {
        Self {
            source,
            request_log,
            validate_membership: false,
        }
    }

    /// Also require both codes to appear in the upstream currency list, fetched per request.
    pub fn with_membership_check(mut self, enabled: bool) -> Self {
        self.validate_membership = enabled;
        self
    }

    async fn validate_pair(&self, from: &str, to: &str) -> Result<CurrencyPair> {
        let pair = validate(from, to, None)?;
        if !self.validate_membership {
            return Ok(pair);
        }
        let supported = self.source.fetch_currencies().await?;
        debug!(count = supported.len(), "Checking currency membership");
        validate(from, to, Some(&supported))
    }

    pub async fn currencies(&self) -> Result<SupportedCurrencySet> {
        let currencies = self.source.fetch_currencies().await?;
        if currencies.is_empty() {
            return Err(ConverterError::Parse(
                "currency list page contained no currencies".to_string(),
            ));
        }
        self.request_log
            .record(Operation::Currencies, None, None)
            .await;
        Ok(currencies)
    }

    pub async fn convert(&self, from: &str, to: &str, amount: i64) -> Result<ConversionResult> {
        let pair = self.validate_pair(from, to).await?;
        let points = self
            .source
            .fetch_rate_series(&SeriesQuery::hourly(&pair))
            .await?;
        let result = rate::convert(&points, &pair, amount)?;
        self.request_log
            .record(Operation::Convert, Some(from), Some(to))
            .await;
        Ok(result)
    }

    pub async fn historical_rates(&self, from: &str, to: &str) -> Result<Vec<HistoricalRate>> {
        let pair = self.validate_pair(from, to).await?;
        let points = self
            .source
            .fetch_rate_series(&SeriesQuery::hourly(&pair))
            .await?;
        self.request_log
            .record(Operation::HistoricalRates, Some(from), Some(to))
            .await;
        Ok(rate::history(&points))
    }

    pub async fn average(&self, from: &str, to: &str, days: u32) -> Result<AverageResult> {
        if days == 0 {
            return Err(ConverterError::BadRequest(
                "duration must be at least 1 day".to_string(),
            ));
        }
        let pair = self.validate_pair(from, to).await?;
        let points = self
            .source
            .fetch_rate_series(&SeriesQuery::daily(&pair, days))
            .await?;
        let result = rate::average(&points, days)?;
        self.request_log
            .record(Operation::Average, Some(from), Some(to))
            .await;
        Ok(result)
    }

    pub async fn recent_requests(&self) -> Vec<RequestRecord> {
        self.request_log.snapshot().await
    }
}
