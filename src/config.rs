use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::HistoryPeriod;
use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub training: TrainingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl AppConfig {
    /// Load configuration from an optional file plus `TRADESIM_*` overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(Environment::with_prefix("TRADESIM").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

/// Training data and budget settings
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Instruments the policy trains across
    #[serde(default = "default_tickers")]
    pub tickers: Vec<String>,
    /// History window fetched per instrument
    #[serde(default = "default_training_period")]
    pub period: HistoryPeriod,
    /// Minimum usable length for a real series
    #[serde(default = "default_training_min_length")]
    pub min_length: usize,
    /// Length of the synthetic fallback path
    #[serde(default = "default_training_fallback_length")]
    pub fallback_length: usize,
    /// Starting cash per training episode
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
    /// Environment steps granted to the trainer
    #[serde(default = "default_total_timesteps")]
    pub total_timesteps: u32,
    /// Seed for the episode sampler
    #[serde(default)]
    pub pool_seed: u64,
    /// Artifact path for the trained policy
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            tickers: default_tickers(),
            period: default_training_period(),
            min_length: default_training_min_length(),
            fallback_length: default_training_fallback_length(),
            initial_balance: default_initial_balance(),
            total_timesteps: default_total_timesteps(),
            pool_seed: 0,
            model_path: default_model_path(),
        }
    }
}

/// Backtest horizon settings
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    /// History window for the backtest, shorter than training
    #[serde(default = "default_simulation_period")]
    pub period: HistoryPeriod,
    /// Minimum usable length for a real series
    #[serde(default = "default_simulation_min_length")]
    pub min_length: usize,
    /// Length of the synthetic fallback path
    #[serde(default = "default_simulation_fallback_length")]
    pub fallback_length: usize,
    /// Starting cash for the backtest
    #[serde(default = "default_initial_balance")]
    pub initial_balance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            period: default_simulation_period(),
            min_length: default_simulation_min_length(),
            fallback_length: default_simulation_fallback_length(),
            initial_balance: default_initial_balance(),
        }
    }
}

fn default_tickers() -> Vec<String> {
    ["AAPL", "MSFT", "GOOG", "TSLA", "AMZN", "JPM"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_training_period() -> HistoryPeriod {
    HistoryPeriod::OneYear
}

fn default_training_min_length() -> usize {
    120
}

fn default_training_fallback_length() -> usize {
    252
}

fn default_initial_balance() -> f64 {
    1000.0
}

fn default_total_timesteps() -> u32 {
    20_000
}

fn default_model_path() -> PathBuf {
    PathBuf::from("trader_model.json")
}

fn default_simulation_period() -> HistoryPeriod {
    HistoryPeriod::ThreeMonths
}

fn default_simulation_min_length() -> usize {
    45
}

fn default_simulation_fallback_length() -> usize {
    90
}
