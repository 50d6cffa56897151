//! End-to-end backtests over controlled data sources.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use tradesim::config::SimulationConfig;
use tradesim::data::{
    HistoryPeriod, MarketDataSource, PriceSeriesProvider, Provenance, SeriesRequest,
};
use tradesim::env::{Action, Observation, TradeKind};
use tradesim::error::{Result, TradesimError};
use tradesim::policy::Policy;
use tradesim::sim::SimulationRunner;

/// Source replaying one fixed series
struct FixedSource(Vec<f64>);

#[async_trait]
impl MarketDataSource for FixedSource {
    async fn closing_prices(&self, _ticker: &str, _period: HistoryPeriod) -> Result<Vec<f64>> {
        Ok(self.0.clone())
    }
}

/// Source simulating an unreachable network
struct OfflineSource;

#[async_trait]
impl MarketDataSource for OfflineSource {
    async fn closing_prices(&self, ticker: &str, _period: HistoryPeriod) -> Result<Vec<f64>> {
        Err(TradesimError::MarketDataUnavailable(ticker.to_string()))
    }
}

/// Policy replaying a scripted action sequence, then holding
struct ScriptedPolicy {
    actions: Vec<Action>,
    cursor: AtomicUsize,
}

impl ScriptedPolicy {
    fn new(actions: Vec<Action>) -> Self {
        Self {
            actions,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl Policy for ScriptedPolicy {
    fn predict(&self, _observation: &Observation, _deterministic: bool) -> Action {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.actions.get(index).copied().unwrap_or(Action::Hold)
    }
}

struct AlwaysHold;

impl Policy for AlwaysHold {
    fn predict(&self, _observation: &Observation, _deterministic: bool) -> Action {
        Action::Hold
    }
}

fn sim_config(min_length: usize, fallback_length: usize) -> SimulationConfig {
    SimulationConfig {
        min_length,
        fallback_length,
        ..SimulationConfig::default()
    }
}

#[tokio::test]
async fn scripted_buy_sell_buy_trajectory() {
    let provider = Arc::new(PriceSeriesProvider::new(Arc::new(FixedSource(vec![
        100.0, 105.0, 95.0, 110.0,
    ]))));
    let runner = SimulationRunner::new(provider, sim_config(2, 90));
    let policy = ScriptedPolicy::new(vec![Action::Buy, Action::Sell, Action::Buy]);

    let result = runner.run("TSLA", &policy).await.unwrap();

    assert_eq!(result.provenance, Provenance::Real);
    assert_eq!(result.portfolio_curve, vec![1005.0, 1005.0, 1020.0]);

    assert_eq!(result.trade_log.len(), 3);
    assert_eq!(result.trade_log[0].kind, TradeKind::Buy);
    assert_eq!(result.trade_log[0].price, 100.0);
    assert_eq!(result.trade_log[0].step, 0);
    assert_eq!(result.trade_log[1].kind, TradeKind::Sell);
    assert_eq!(result.trade_log[1].price, 105.0);
    assert_eq!(result.trade_log[2].kind, TradeKind::Buy);
    assert_eq!(result.trade_log[2].price, 95.0);

    assert_eq!(result.stats.initial_balance, 1000.0);
    assert_eq!(result.stats.final_value, 1020.0);
    assert_eq!(result.stats.return_pct, 2.0);
    assert_eq!(result.stats.total_trades, 3);
    assert_eq!(result.stats.buys, 2);
    assert_eq!(result.stats.sells, 1);
}

#[tokio::test]
async fn all_hold_returns_initial_balance() {
    let provider = Arc::new(PriceSeriesProvider::new(Arc::new(FixedSource(vec![
        100.0, 105.0, 95.0, 110.0, 120.0,
    ]))));
    let runner = SimulationRunner::new(provider, sim_config(2, 90));

    let result = runner.run("AAPL", &AlwaysHold).await.unwrap();

    assert_eq!(result.stats.final_value, result.stats.initial_balance);
    assert_eq!(result.stats.return_pct, 0.0);
    assert_eq!(result.stats.total_trades, 0);
    assert_eq!(result.stats.buys, 0);
    assert_eq!(result.stats.sells, 0);
    assert!(result.trade_log.is_empty());
}

#[tokio::test]
async fn inapplicable_actions_are_not_logged() {
    // Selling flat and buying broke both no-op; the log stays empty.
    let provider = Arc::new(PriceSeriesProvider::new(Arc::new(FixedSource(vec![
        100.0, 105.0, 95.0,
    ]))));
    let config = SimulationConfig {
        initial_balance: 10.0,
        ..sim_config(2, 90)
    };
    let runner = SimulationRunner::new(provider, config);
    let policy = ScriptedPolicy::new(vec![Action::Sell, Action::Buy]);

    let result = runner.run("MSFT", &policy).await.unwrap();

    assert!(result.trade_log.is_empty());
    assert_eq!(result.stats.final_value, 10.0);
}

#[tokio::test]
async fn unreachable_source_yields_synthetic_series_of_fallback_length() {
    let provider = Arc::new(PriceSeriesProvider::new(Arc::new(OfflineSource)));

    let series = provider
        .get_price_series(&SeriesRequest {
            ticker: "TSLA".to_string(),
            period: HistoryPeriod::ThreeMonths,
            min_length: 45,
            fallback_length: 90,
            seed: None,
        })
        .await;

    assert_eq!(series.len(), 90);
    assert_eq!(series.provenance(), Provenance::Synthetic);
}

#[tokio::test]
async fn offline_backtest_runs_on_synthetic_data() {
    let provider = Arc::new(PriceSeriesProvider::new(Arc::new(OfflineSource)));
    let runner = SimulationRunner::new(provider, sim_config(45, 90));

    let result = runner.run("TSLA", &AlwaysHold).await.unwrap();

    assert_eq!(result.provenance, Provenance::Synthetic);
    assert_eq!(result.portfolio_curve.len(), 89);
    assert_eq!(result.stats.return_pct, 0.0);
}
