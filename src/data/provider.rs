//! Price Series Acquisition with Fallback
//!
//! Always yields a usable series: real closing prices when the market data
//! source cooperates, a seeded synthetic path when it does not. Availability
//! over fidelity is the policy here, so no fetch problem ever reaches the
//! caller as an error.

use std::sync::Arc;

use dashmap::DashMap;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use super::series::{HistoryPeriod, PriceSeries, Provenance};
use super::source::MarketDataSource;
use super::synthetic::{GbmParams, SyntheticPriceGenerator};

/// Parameters for one series acquisition
#[derive(Debug, Clone)]
pub struct SeriesRequest {
    pub ticker: String,
    pub period: HistoryPeriod,
    /// Minimum usable length for a real series
    pub min_length: usize,
    /// Length of the synthetic fallback path
    pub fallback_length: usize,
    /// Fallback seed override; defaults to a stable hash of the ticker
    pub seed: Option<u64>,
}

/// Acquires price series, caching real fetches by ticker and period
pub struct PriceSeriesProvider {
    source: Arc<dyn MarketDataSource>,
    cache: DashMap<(String, HistoryPeriod), Arc<PriceSeries>>,
}

impl PriceSeriesProvider {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            cache: DashMap::new(),
        }
    }

    /// Acquire a price series, falling back to synthetic data on any failure.
    ///
    /// Cache entries are immutable once written and shared read-only across
    /// callers. Fallback results are never cached, so a recovered data source
    /// gets retried on the next request.
    pub async fn get_price_series(&self, request: &SeriesRequest) -> Arc<PriceSeries> {
        let key = (request.ticker.clone(), request.period);
        if let Some(hit) = self.cache.get(&key) {
            // A cached fetch still has to satisfy this caller's minimum
            if hit.len() >= request.min_length {
                return hit.clone();
            }
            return self.fallback(request);
        }

        match self
            .source
            .closing_prices(&request.ticker, request.period)
            .await
        {
            Ok(closes) if closes.len() >= request.min_length => {
                let series = Arc::new(PriceSeries::new(
                    &request.ticker,
                    Provenance::Real,
                    closes,
                ));
                self.cache.insert(key, series.clone());
                series
            }
            Ok(closes) => {
                warn!(
                    "Ticker {} returned insufficient data ({} points). Using fallback.",
                    request.ticker,
                    closes.len()
                );
                self.fallback(request)
            }
            Err(err) => {
                warn!("Failed to fetch {}: {}. Using fallback.", request.ticker, err);
                self.fallback(request)
            }
        }
    }

    fn fallback(&self, request: &SeriesRequest) -> Arc<PriceSeries> {
        info!("Generating synthetic data for {}", request.ticker);
        let seed = request.seed.unwrap_or_else(|| ticker_seed(&request.ticker));
        let generator = SyntheticPriceGenerator::new(GbmParams {
            length: request.fallback_length,
            ..GbmParams::default()
        });
        Arc::new(generator.generate(&request.ticker, seed))
    }
}

/// Stable per-ticker seed so offline runs are reproducible
fn ticker_seed(ticker: &str) -> u64 {
    let digest = Sha256::digest(ticker.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::MockMarketDataSource;
    use crate::error::TradesimError;

    fn request(ticker: &str, min_length: usize, fallback_length: usize) -> SeriesRequest {
        SeriesRequest {
            ticker: ticker.to_string(),
            period: HistoryPeriod::ThreeMonths,
            min_length,
            fallback_length,
            seed: None,
        }
    }

    #[tokio::test]
    async fn test_unreachable_source_falls_back_to_synthetic() {
        let mut source = MockMarketDataSource::new();
        source.expect_closing_prices().returning(|ticker, _| {
            Err(TradesimError::MarketDataUnavailable(ticker.to_string()))
        });
        let provider = PriceSeriesProvider::new(Arc::new(source));

        let series = provider.get_price_series(&request("TSLA", 45, 90)).await;

        assert_eq!(series.len(), 90);
        assert!(series.is_synthetic());
    }

    #[tokio::test]
    async fn test_insufficient_length_falls_back() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_closing_prices()
            .returning(|_, _| Ok(vec![100.0; 10]));
        let provider = PriceSeriesProvider::new(Arc::new(source));

        let series = provider.get_price_series(&request("AAPL", 45, 90)).await;

        assert!(series.is_synthetic());
        assert_eq!(series.len(), 90);
    }

    #[tokio::test]
    async fn test_successful_fetch_is_cached() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_closing_prices()
            .times(1)
            .returning(|_, _| Ok(vec![100.0; 50]));
        let provider = PriceSeriesProvider::new(Arc::new(source));

        let first = provider.get_price_series(&request("AAPL", 45, 90)).await;
        let second = provider.get_price_series(&request("AAPL", 45, 90)).await;

        assert_eq!(first.provenance(), Provenance::Real);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_closing_prices()
            .times(2)
            .returning(|_, _| Err(TradesimError::MarketDataUnavailable("offline".into())));
        let provider = PriceSeriesProvider::new(Arc::new(source));

        provider.get_price_series(&request("MSFT", 45, 90)).await;
        provider.get_price_series(&request("MSFT", 45, 90)).await;
    }

    #[tokio::test]
    async fn test_offline_fallback_is_reproducible_per_ticker() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_closing_prices()
            .returning(|_, _| Err(TradesimError::MarketDataUnavailable("offline".into())));
        let provider = PriceSeriesProvider::new(Arc::new(source));

        let a = provider.get_price_series(&request("GOOG", 45, 90)).await;
        let b = provider.get_price_series(&request("GOOG", 45, 90)).await;
        let other = provider.get_price_series(&request("AMZN", 45, 90)).await;

        assert_eq!(a.values(), b.values());
        assert_ne!(a.values(), other.values());
    }

    #[tokio::test]
    async fn test_explicit_seed_overrides_ticker_hash() {
        let mut source = MockMarketDataSource::new();
        source
            .expect_closing_prices()
            .returning(|_, _| Err(TradesimError::MarketDataUnavailable("offline".into())));
        let provider = PriceSeriesProvider::new(Arc::new(source));

        let mut seeded = request("JPM", 45, 90);
        seeded.seed = Some(1234);
        let a = provider.get_price_series(&seeded).await;
        let b = provider.get_price_series(&seeded).await;

        assert_eq!(a.values(), b.values());
    }
}
