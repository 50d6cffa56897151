//! Backtest Runner
//!
//! Drives a trained policy through one episode over a short-horizon series
//! and reduces the trajectory to a portfolio curve, trade log, and summary
//! statistics.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::SimulationConfig;
use crate::data::{PriceSeriesProvider, Provenance, SeriesRequest};
use crate::env::{TradeKind, TradingEnvironment};
use crate::error::Result;
use crate::policy::Policy;

/// One executed trade, append-only
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeRecord {
    pub kind: TradeKind,
    /// Fill price at execution
    pub price: f64,
    /// Step the trade executed on
    pub step: usize,
}

/// Fixed-key summary of one simulation
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStats {
    pub initial_balance: f64,
    pub final_value: f64,
    pub return_pct: f64,
    pub total_trades: usize,
    pub buys: usize,
    pub sells: usize,
}

/// Full output of one backtest run
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub ticker: String,
    pub provenance: Provenance,
    /// Portfolio valuation after each step
    pub portfolio_curve: Vec<f64>,
    pub trade_log: Vec<TradeRecord>,
    pub stats: SimulationStats,
}

/// Deterministic backtester over one price series
pub struct SimulationRunner {
    provider: Arc<PriceSeriesProvider>,
    config: SimulationConfig,
}

impl SimulationRunner {
    pub fn new(provider: Arc<PriceSeriesProvider>, config: SimulationConfig) -> Self {
        Self { provider, config }
    }

    /// Backtest `policy` on `ticker` over the configured horizon.
    ///
    /// Decisions are deterministic; a trade is logged only when the action
    /// actually executed, never when the environment no-opped it.
    pub async fn run(&self, ticker: &str, policy: &dyn Policy) -> Result<SimulationResult> {
        let series = self
            .provider
            .get_price_series(&SeriesRequest {
                ticker: ticker.to_string(),
                period: self.config.period,
                min_length: self.config.min_length,
                fallback_length: self.config.fallback_length,
                seed: None,
            })
            .await;

        let mut env = TradingEnvironment::new(series.clone(), self.config.initial_balance)?;
        let mut observation = env.reset();

        let mut portfolio_curve = Vec::with_capacity(series.len().saturating_sub(1));
        let mut trade_log = Vec::new();

        for step in 0..series.len() - 1 {
            let action = policy.predict(&observation, true);
            let outcome = env.step(action);

            if let Some(execution) = outcome.info.execution {
                trade_log.push(TradeRecord {
                    kind: execution.kind,
                    price: execution.price,
                    step,
                });
            }
            portfolio_curve.push(outcome.info.portfolio_value);

            observation = outcome.observation;
            if outcome.done {
                break;
            }
        }

        let stats = summarize(self.config.initial_balance, &portfolio_curve, &trade_log);
        info!(
            "Backtest for {} finished: return {:.2}%, {} trades",
            ticker, stats.return_pct, stats.total_trades
        );

        Ok(SimulationResult {
            ticker: ticker.to_string(),
            provenance: series.provenance(),
            portfolio_curve,
            trade_log,
            stats,
        })
    }
}

fn summarize(
    initial_balance: f64,
    curve: &[f64],
    trades: &[TradeRecord],
) -> SimulationStats {
    let final_value = curve.last().copied().unwrap_or(initial_balance);
    let return_pct = (final_value - initial_balance) / initial_balance * 100.0;
    let buys = trades.iter().filter(|t| t.kind == TradeKind::Buy).count();

    SimulationStats {
        initial_balance,
        final_value,
        return_pct,
        total_trades: trades.len(),
        buys,
        sells: trades.len() - buys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty_curve_returns_initial_balance() {
        let stats = summarize(1000.0, &[], &[]);

        assert_eq!(stats.final_value, 1000.0);
        assert_eq!(stats.return_pct, 0.0);
        assert_eq!(stats.total_trades, 0);
    }

    #[test]
    fn test_summarize_partitions_trade_counts() {
        let trades = [
            TradeRecord {
                kind: TradeKind::Buy,
                price: 100.0,
                step: 0,
            },
            TradeRecord {
                kind: TradeKind::Sell,
                price: 105.0,
                step: 1,
            },
            TradeRecord {
                kind: TradeKind::Buy,
                price: 95.0,
                step: 2,
            },
        ];
        let stats = summarize(1000.0, &[1005.0, 1005.0, 1020.0], &trades);

        assert_eq!(stats.final_value, 1020.0);
        assert_eq!(stats.return_pct, 2.0);
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.buys, 2);
        assert_eq!(stats.sells, 1);
    }
}
