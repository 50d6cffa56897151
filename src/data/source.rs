//! Market Data Sources
//!
//! The external collaborator boundary for historical closing prices. The
//! provider treats every error from here as a fallback trigger, so sources
//! report failures freely instead of papering over them.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::series::HistoryPeriod;
use crate::error::{Result, TradesimError};

/// Collaborator returning chronological closing prices for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch closing prices over `period`, oldest first, gaps dropped
    async fn closing_prices(&self, ticker: &str, period: HistoryPeriod) -> Result<Vec<f64>>;
}

/// Yahoo Finance v8 chart API source
pub struct YahooFinanceSource {
    http: reqwest::Client,
    base_url: String,
}

impl YahooFinanceSource {
    pub fn new() -> Result<Self> {
        Self::with_base_url("https://query1.finance.yahoo.com")
    }

    /// Point the source at a different host, mainly for tests
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent("tradesim/0.1")
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl MarketDataSource for YahooFinanceSource {
    async fn closing_prices(&self, ticker: &str, period: HistoryPeriod) -> Result<Vec<f64>> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let response = self
            .http
            .get(&url)
            .query(&[("range", period.as_str()), ("interval", "1d")])
            .send()
            .await?
            .error_for_status()?;

        let body: ChartResponse = response.json().await?;

        if let Some(error) = body.chart.error {
            return Err(TradesimError::MarketDataUnavailable(format!(
                "{}: {}",
                ticker, error.code
            )));
        }

        let result = body
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| {
                TradesimError::MarketDataUnavailable(format!("{ticker}: empty chart result"))
            })?;

        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| {
                TradesimError::MarketDataUnavailable(format!("{ticker}: no quote block"))
            })?;

        let close = quote.close.ok_or_else(|| {
            TradesimError::MarketDataUnavailable(format!("{ticker}: no closing prices"))
        })?;

        // Missing sessions come back as nulls; drop them like any other gap
        let closes: Vec<f64> = close.into_iter().flatten().collect();
        debug!("Fetched {} closes for {} ({})", closes.len(), ticker, period);

        Ok(closes)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
struct QuoteBlock {
    close: Option<Vec<Option<f64>>>,
}
