//! Turns raw upstream payloads into typed values.

use crate::core::currency::SupportedCurrencySet;
use crate::core::error::{ConverterError, Result};
use crate::core::rate::{RatePoint, SeriesQuery};
use chrono::{DateTime, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::debug;

static CODE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".currency-code").expect("Invalid selector"));
static NAME_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".currency-name").expect("Invalid selector"));

#[derive(Debug, Deserialize)]
struct UpstreamRatePoint {
    source: Option<String>,
    target: Option<String>,
    value: f64,
    time: f64,
}

/// Rounds epoch milliseconds to the nearest second, ties to even.
///
/// This is the legacy rendering and can move the displayed second by up to half a second.
/// Fractional milliseconds are accepted; non-finite values are not.
pub fn round_millis_to_secs(millis: f64) -> Option<i64> {
    let secs = (millis / 1000.0).round_ties_even();
    (secs.is_finite() && secs.abs() < i64::MAX as f64).then_some(secs as i64)
}

pub fn epoch_millis_to_datetime(millis: f64) -> Result<DateTime<Utc>> {
    round_millis_to_secs(millis)
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
        .ok_or_else(|| ConverterError::Parse(format!("timestamp {millis} is out of range")))
}

/// Parses a JSON rate series, keeping upstream order.
///
/// Points missing `source`/`target` inherit them from the query. An empty array is
/// returned as-is; rejecting it is up to the aggregation that needs a value.
pub fn parse_rate_series(body: &str, query: &SeriesQuery) -> Result<Vec<RatePoint>> {
    let raw: Vec<UpstreamRatePoint> = serde_json::from_str(body)
        .map_err(|e| ConverterError::Parse(format!("invalid rate series: {e}")))?;

    raw.into_iter()
        .map(|point| {
            if !point.value.is_finite() || point.value <= 0.0 {
                return Err(ConverterError::Parse(format!(
                    "rate {} at {} is not a positive number",
                    point.value, point.time
                )));
            }
            Ok(RatePoint {
                source: point.source.unwrap_or_else(|| query.source.clone()),
                target: point.target.unwrap_or_else(|| query.target.clone()),
                rate: point.value,
                timestamp: epoch_millis_to_datetime(point.time)?,
            })
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Pairs the i-th name element with the i-th code element in document order.
///
/// When the two lists differ in length the surplus on the longer side is dropped,
/// so the result has as many entries as the shorter list.
pub fn parse_currency_list(html: &str) -> Result<SupportedCurrencySet> {
    let document = Html::parse_document(html);
    let codes: Vec<String> = document.select(&CODE_SELECTOR).map(element_text).collect();
    let names: Vec<String> = document.select(&NAME_SELECTOR).map(element_text).collect();

    if codes.is_empty() {
        return Err(ConverterError::Parse(
            "no currency code elements found".to_string(),
        ));
    }
    if names.is_empty() {
        return Err(ConverterError::Parse(
            "no currency name elements found".to_string(),
        ));
    }
    if codes.len() != names.len() {
        debug!(
            codes = codes.len(),
            names = names.len(),
            "Currency list tags differ in length, truncating to the shorter"
        );
    }

    let entries = names
        .into_iter()
        .zip(codes)
        .map(|(name, code)| (code, name))
        .collect();
    Ok(SupportedCurrencySet::new(entries))
}
