//! Rate samples, upstream series queries, and the aggregations computed from them.

use crate::core::currency::CurrencyPair;
use crate::core::error::{ConverterError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Calendar form used for every timestamp exposed by the API.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const CONVERTED_AMOUNT_DP: u32 = 2;
const AVERAGE_RATE_DP: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    #[default]
    Hourly,
    Daily,
}

impl Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Resolution::Hourly => "hourly",
                Resolution::Daily => "daily",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Day,
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "day")
    }
}

/// Parameters of one rate-series request, built fresh for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub source: String,
    pub target: String,
    pub length: u32,
    pub resolution: Resolution,
    pub unit: Unit,
}

impl SeriesQuery {
    /// Last day of hourly samples, the upstream default window.
    pub fn hourly(pair: &CurrencyPair) -> Self {
        Self {
            source: pair.from.to_string(),
            target: pair.to.to_string(),
            length: 1,
            resolution: Resolution::default(),
            unit: Unit::default(),
        }
    }

    /// One daily sample per day over the last `days` days.
    pub fn daily(pair: &CurrencyPair, days: u32) -> Self {
        Self {
            length: days,
            resolution: Resolution::Daily,
            ..Self::hourly(pair)
        }
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("source", self.source.clone()),
            ("target", self.target.clone()),
            ("length", self.length.to_string()),
            ("resolution", self.resolution.to_string()),
            ("unit", self.unit.to_string()),
        ]
    }
}

/// One timestamped sample of a currency pair's rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub source: String,
    pub target: String,
    pub rate: f64,
    pub timestamp: DateTime<Utc>,
}

impl RatePoint {
    pub fn display_time(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionMetadata {
    pub time_of_conversion: String,
    pub from_currency: String,
    pub to_currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionResult {
    pub converted_amount: f64,
    pub mid_market_rate: f64,
    pub metadata: ConversionMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalRate {
    pub rate: f64,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageResult {
    pub average_rate: f64,
    pub duration_in_days: u32,
}

/// Rounds the exact binary value of `value`, so 2.675 (stored just below) goes to 2.67.
fn round_dp(value: f64, dp: u32) -> Result<f64> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven))
        .and_then(|d| d.to_f64())
        .ok_or_else(|| ConverterError::Aggregation(format!("{value} is not a representable rate")))
}

/// Converts `amount` at the most recent sample, i.e. the last one in upstream order.
///
/// The metadata echoes the requested pair rather than the labels upstream put on the sample.
pub fn convert(
    points: &[RatePoint],
    pair: &CurrencyPair,
    amount: i64,
) -> Result<ConversionResult> {
    let latest = points
        .last()
        .ok_or_else(|| ConverterError::Aggregation("upstream returned no rates".to_string()))?;

    Ok(ConversionResult {
        converted_amount: round_dp(amount as f64 * latest.rate, CONVERTED_AMOUNT_DP)?,
        mid_market_rate: latest.rate,
        metadata: ConversionMetadata {
            time_of_conversion: latest.display_time(),
            from_currency: pair.from.to_string(),
            to_currency: pair.to.to_string(),
        },
    })
}

/// Arithmetic mean over every returned sample; the window itself is chosen upstream.
pub fn average(points: &[RatePoint], days: u32) -> Result<AverageResult> {
    if points.is_empty() {
        return Err(ConverterError::Aggregation(format!(
            "upstream returned no rates for the last {days} days"
        )));
    }

    let sum: f64 = points.iter().map(|p| p.rate).sum();
    Ok(AverageResult {
        average_rate: round_dp(sum / points.len() as f64, AVERAGE_RATE_DP)?,
        duration_in_days: days,
    })
}

pub fn history(points: &[RatePoint]) -> Vec<HistoricalRate> {
    points
        .iter()
        .map(|p| HistoricalRate {
            rate: p.rate,
            time: p.display_time(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::validate;
    use chrono::TimeZone;

    fn usd_pln() -> CurrencyPair {
        validate("USD", "PLN", None).unwrap()
    }

    fn point(rate: f64, secs: i64) -> RatePoint {
        RatePoint {
            source: "USD".to_string(),
            target: "PLN".to_string(),
            rate,
            timestamp: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_convert_uses_last_point() {
        let points = vec![point(4.33, 1673816400), point(4.34, 1673900000)];
        let result = convert(&points, &usd_pln(), 1000).unwrap();
        assert_eq!(result.converted_amount, 4340.0);
        assert_eq!(result.mid_market_rate, 4.34);
        assert_eq!(result.metadata.time_of_conversion, "2023-01-16 20:13:20");
        assert_eq!(result.metadata.from_currency, "USD");
        assert_eq!(result.metadata.to_currency, "PLN");
    }

    #[test]
    fn test_convert_last_not_max() {
        let points = vec![point(5.0, 1), point(4.0, 2)];
        let result = convert(&points, &usd_pln(), 10).unwrap();
        assert_eq!(result.mid_market_rate, 4.0);
        assert_eq!(result.converted_amount, 40.0);
    }

    #[test]
    fn test_convert_rounds_to_two_places_and_keeps_rate() {
        let points = vec![point(4.33685, 1673906333)];
        let result = convert(&points, &usd_pln(), 3).unwrap();
        assert_eq!(result.converted_amount, 13.01);
        assert_eq!(result.mid_market_rate, 4.33685);
    }

    #[test]
    fn test_convert_rounds_exact_binary_value() {
        // 2.675 is stored as 2.67499999...
        let result = convert(&[point(2.675, 1)], &usd_pln(), 1).unwrap();
        assert_eq!(result.converted_amount, 2.67);
    }

    #[test]
    fn test_convert_metadata_echoes_requested_pair() {
        let mut latest = point(4.0, 1673816400);
        latest.source = "usd".to_string();
        latest.target = "pln".to_string();
        let result = convert(&[latest], &usd_pln(), 1).unwrap();
        assert_eq!(result.metadata.from_currency, "USD");
        assert_eq!(result.metadata.to_currency, "PLN");
    }

    #[test]
    fn test_convert_empty_series() {
        let result = convert(&[], &usd_pln(), 100);
        assert!(matches!(result, Err(ConverterError::Aggregation(_))));
    }

    #[test]
    fn test_average() {
        let points = vec![point(1.0, 1), point(2.0, 2), point(3.0, 3)];
        let result = average(&points, 3).unwrap();
        assert_eq!(result.average_rate, 2.0);
        assert_eq!(result.duration_in_days, 3);
    }

    #[test]
    fn test_average_rounds_to_four_places() {
        let points = vec![
            point(4.3316, 1),
            point(4.3313, 2),
            point(4.33235, 3),
            point(4.3364, 4),
        ];
        let result = average(&points, 4).unwrap();
        assert_eq!(result.average_rate, 4.3329);
    }

    #[test]
    fn test_average_rounds_exact_binary_value() {
        // 1.00005 is stored as 1.0000500000000001...
        let points = vec![point(1.00005, 1), point(1.00005, 2)];
        let result = average(&points, 2).unwrap();
        assert_eq!(result.average_rate, 1.0001);
    }

    #[test]
    fn test_average_empty_series() {
        let result = average(&[], 7);
        assert_eq!(
            result,
            Err(ConverterError::Aggregation(
                "upstream returned no rates for the last 7 days".to_string()
            ))
        );
    }

    #[test]
    fn test_history_preserves_order() {
        let points = vec![point(4.3316, 1673816400), point(4.3313, 1673820000)];
        let rates = history(&points);
        assert_eq!(
            rates,
            vec![
                HistoricalRate {
                    rate: 4.3316,
                    time: "2023-01-15 21:00:00".to_string()
                },
                HistoricalRate {
                    rate: 4.3313,
                    time: "2023-01-15 22:00:00".to_string()
                },
            ]
        );
        assert!(history(&[]).is_empty());
    }

    #[test]
    fn test_series_query_defaults() {
        let pair = validate("USD", "PLN", None).unwrap();
        let query = SeriesQuery::hourly(&pair);
        assert_eq!(
            query.query_pairs(),
            vec![
                ("source", "USD".to_string()),
                ("target", "PLN".to_string()),
                ("length", "1".to_string()),
                ("resolution", "hourly".to_string()),
                ("unit", "day".to_string()),
            ]
        );
    }

    #[test]
    fn test_daily_query_does_not_leak_into_hourly() {
        let pair = validate("GBP", "EUR", None).unwrap();
        let daily = SeriesQuery::daily(&pair, 30);
        assert_eq!(daily.length, 30);
        assert_eq!(daily.resolution, Resolution::Daily);

        let hourly = SeriesQuery::hourly(&pair);
        assert_eq!(hourly.length, 1);
        assert_eq!(hourly.resolution, Resolution::Hourly);
    }
}
