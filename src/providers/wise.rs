use crate::core::config::WiseProviderConfig;
use crate::core::converter::RateSource;
use crate::core::currency::SupportedCurrencySet;
use crate::core::error::{ConverterError, Result};
use crate::core::rate::{RatePoint, SeriesQuery};
use crate::providers::normalize::{parse_currency_list, parse_rate_series};
use crate::providers::util::upstream_call;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy)]
pub enum Endpoint<'a> {
    RateSeries(&'a SeriesQuery),
    CurrencyList,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// JSON array of `{source, target, value, time}` samples.
    RateSeries(String),
    /// HTML page listing the supported currencies.
    CurrencyList(String),
}

/// Client for the Wise public rate history and currency pages.
pub struct WiseClient {
    rates_url: String,
    currencies_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl WiseClient {
    pub fn new(config: &WiseProviderConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("midrate/0.1")
            .timeout(config.default_timeout())
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(WiseClient {
            rates_url: config.rates_url.clone(),
            currencies_url: config.currencies_url.clone(),
            timeout: config.timeout(),
            client,
        })
    }

    fn endpoint_url(&self, endpoint: Endpoint<'_>) -> Result<Url> {
        let url = match endpoint {
            Endpoint::RateSeries(query) => {
                Url::parse_with_params(&self.rates_url, query.query_pairs())
            }
            Endpoint::CurrencyList => Url::parse(&self.currencies_url),
        };
        url.map_err(|e| ConverterError::Upstream(format!("invalid upstream URL: {e}")))
    }

    /// Issues one GET against the given endpoint with the long upstream timeout.
    #[instrument(name = "WiseFetch", skip(self))]
    pub async fn fetch(&self, endpoint: Endpoint<'_>) -> Result<RawPayload> {
        let url = self.endpoint_url(endpoint)?;
        debug!("Requesting {}", url);

        let body = upstream_call(
            || async {
                self.client
                    .get(url.clone())
                    .timeout(self.timeout)
                    .send()
                    .await?
                    .error_for_status()?
                    .text()
                    .await
            },
            url.as_str(),
        )
        .await?;

        debug!(bytes = body.len(), "Received upstream response");
        Ok(match endpoint {
            Endpoint::RateSeries(_) => RawPayload::RateSeries(body),
            Endpoint::CurrencyList => RawPayload::CurrencyList(body),
        })
    }
}

#[async_trait]
impl RateSource for WiseClient {
    async fn fetch_rate_series(&self, query: &SeriesQuery) -> Result<Vec<RatePoint>> {
        match self.fetch(Endpoint::RateSeries(query)).await? {
            RawPayload::RateSeries(body) => parse_rate_series(&body, query),
            RawPayload::CurrencyList(_) => Err(ConverterError::Parse(
                "expected a rate series payload".to_string(),
            )),
        }
    }

    async fn fetch_currencies(&self) -> Result<SupportedCurrencySet> {
        match self.fetch(Endpoint::CurrencyList).await? {
            RawPayload::CurrencyList(body) => parse_currency_list(&body),
            RawPayload::RateSeries(_) => Err(ConverterError::Parse(
                "expected a currency list payload".to_string(),
            )),
        }
    }
}
