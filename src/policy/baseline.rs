//! Baseline Band Policy
//!
//! The stock training collaborator: a buy-low / sell-high band over the
//! observed price, calibrated by searching quantile placements against
//! pooled rollouts. Real deployments can swap in any `PolicyTrainer`
//! without touching the engine.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Policy, PolicyArtifact, PolicyTrainer};
use crate::env::{Action, EnvironmentPool, Observation};
use crate::error::{Result, TradesimError};

/// Policy buying at or below its lower band and selling at or above its
/// upper band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BandPolicy {
    pub buy_below: f64,
    pub sell_above: f64,
}

impl Policy for BandPolicy {
    fn predict(&self, observation: &Observation, _deterministic: bool) -> Action {
        // The band policy has no stochastic mode; the flag exists for
        // policies that explore during training.
        if observation.price <= self.buy_below {
            Action::Buy
        } else if observation.holding > 0 && observation.price >= self.sell_above {
            Action::Sell
        } else {
            Action::Hold
        }
    }
}

/// Trainer searching band placements over pooled rollouts
pub struct BandTrainer {
    /// Candidate quantile pairs (buy, sell) evaluated during the search
    candidates: Vec<(f64, f64)>,
}

impl Default for BandTrainer {
    fn default() -> Self {
        Self {
            candidates: vec![(0.1, 0.9), (0.2, 0.8), (0.3, 0.7), (0.4, 0.6)],
        }
    }
}

#[async_trait]
impl PolicyTrainer for BandTrainer {
    async fn train(
        &self,
        mut pool: EnvironmentPool,
        total_timesteps: u32,
    ) -> Result<PolicyArtifact> {
        // A quarter of the budget observes prices, the rest evaluates bands
        let sample_budget = (total_timesteps as usize / 4).max(1);
        let mut prices = collect_prices(&mut pool, sample_budget);
        prices.retain(|p| *p > 0.0);
        if prices.is_empty() {
            return Err(TradesimError::PolicyUnavailable(
                "no usable prices observed during calibration".into(),
            ));
        }
        prices.sort_by(|a, b| a.total_cmp(b));

        let eval_budget =
            ((total_timesteps as usize * 3 / 4) / self.candidates.len().max(1)).max(1);

        let mut best: Option<(f64, BandPolicy)> = None;
        for &(buy_q, sell_q) in &self.candidates {
            let candidate = BandPolicy {
                buy_below: quantile(&prices, buy_q),
                sell_above: quantile(&prices, sell_q),
            };
            let score = rollout_score(&mut pool, &candidate, eval_budget);
            debug!(
                "Band candidate q=({}, {}) scored {:.4}",
                buy_q, sell_q, score
            );

            if best.as_ref().map_or(true, |(s, _)| score > *s) {
                best = Some((score, candidate));
            }
        }

        let (score, policy) = best.ok_or_else(|| {
            TradesimError::PolicyUnavailable("no candidate bands evaluated".into())
        })?;
        info!(
            "Calibrated band policy (score {:.4}): buy<={:.2}, sell>={:.2}",
            score, policy.buy_below, policy.sell_above
        );

        Ok(PolicyArtifact(serde_json::to_vec(&policy)?))
    }

    fn decode(&self, artifact: &PolicyArtifact) -> Result<Arc<dyn Policy>> {
        let policy: BandPolicy = serde_json::from_slice(&artifact.0)?;
        Ok(Arc::new(policy))
    }
}

/// Observe prices by holding through pooled episodes
fn collect_prices(pool: &mut EnvironmentPool, budget: usize) -> Vec<f64> {
    let mut prices = Vec::with_capacity(budget);
    let mut obs = pool.reset();

    for _ in 0..budget {
        prices.push(obs.price);
        let outcome = pool.step(Action::Hold);
        obs = if outcome.done {
            pool.reset()
        } else {
            outcome.observation
        };
    }

    prices
}

/// Nearest-rank quantile over a sorted slice
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
    sorted[idx]
}

/// Mean episode reward of `policy` over pooled rollouts
fn rollout_score(pool: &mut EnvironmentPool, policy: &BandPolicy, budget: usize) -> f64 {
    let mut total_reward = 0.0;
    let mut episodes = 0usize;
    let mut obs = pool.reset();

    for _ in 0..budget {
        let action = policy.predict(&obs, false);
        let outcome = pool.step(action);
        total_reward += outcome.reward;
        obs = if outcome.done {
            episodes += 1;
            pool.reset()
        } else {
            outcome.observation
        };
    }

    total_reward / episodes.max(1) as f64
}
