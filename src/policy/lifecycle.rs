//! Policy Lifecycle
//!
//! Resolves a usable policy for an artifact path: load when present,
//! train-and-persist otherwise. Resolution is serialized per path, so at
//! most one training run executes per artifact even under concurrent
//! callers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::info;

use super::{Policy, PolicyStore, PolicyTrainer};
use crate::config::TrainingConfig;
use crate::data::{PriceSeriesProvider, SeriesRequest};
use crate::env::{EnvironmentPool, TradingEnvironment};
use crate::error::{Result, TradesimError};

/// Train-or-load resolution for policy artifacts
pub struct PolicyLifecycleManager {
    provider: Arc<PriceSeriesProvider>,
    trainer: Arc<dyn PolicyTrainer>,
    store: Arc<dyn PolicyStore>,
    config: TrainingConfig,
    /// One lock per artifact path; late arrivals block on the in-flight
    /// training and then load the same artifact
    in_flight: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl PolicyLifecycleManager {
    pub fn new(
        provider: Arc<PriceSeriesProvider>,
        trainer: Arc<dyn PolicyTrainer>,
        store: Arc<dyn PolicyStore>,
        config: TrainingConfig,
    ) -> Self {
        Self {
            provider,
            trainer,
            store,
            config,
            in_flight: DashMap::new(),
        }
    }

    /// Resolve the policy stored at `model_path`, training it first if the
    /// artifact is missing.
    pub async fn resolve(&self, model_path: &Path) -> Result<Arc<dyn Policy>> {
        if self.store.exists(model_path) {
            return self.load(model_path);
        }

        let lock = self
            .in_flight
            .entry(model_path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // Re-check under the lock: an earlier holder may have trained already
        if self.store.exists(model_path) {
            return self.load(model_path);
        }

        info!(
            "Policy artifact missing at {:?}, triggering fresh training run",
            model_path
        );
        let pool = self.build_pool().await?;
        let artifact = self
            .trainer
            .train(pool, self.config.total_timesteps)
            .await
            .map_err(|err| TradesimError::PolicyUnavailable(err.to_string()))?;
        self.store.save(model_path, &artifact)?;

        self.load(model_path)
    }

    fn load(&self, model_path: &Path) -> Result<Arc<dyn Policy>> {
        let artifact = self.store.load(model_path)?;
        self.trainer.decode(&artifact)
    }

    /// One environment per configured training instrument
    async fn build_pool(&self) -> Result<EnvironmentPool> {
        let mut envs = Vec::with_capacity(self.config.tickers.len());
        for ticker in &self.config.tickers {
            let series = self
                .provider
                .get_price_series(&SeriesRequest {
                    ticker: ticker.clone(),
                    period: self.config.period,
                    min_length: self.config.min_length,
                    fallback_length: self.config.fallback_length,
                    seed: None,
                })
                .await;
            envs.push(TradingEnvironment::new(series, self.config.initial_balance)?);
        }
        EnvironmentPool::new(envs, self.config.pool_seed)
    }
}
