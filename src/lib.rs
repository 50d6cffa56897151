pub mod cli;
pub mod config;
pub mod data;
pub mod env;
pub mod error;
pub mod policy;
pub mod sim;

pub use config::AppConfig;
pub use data::{
    HistoryPeriod, MarketDataSource, PriceSeries, PriceSeriesProvider, Provenance, SeriesRequest,
    SyntheticPriceGenerator, YahooFinanceSource,
};
pub use env::{Action, EnvironmentPool, Observation, StepOutcome, TradeKind, TradingEnvironment};
pub use error::{Result, TradesimError};
pub use policy::{
    BandPolicy, BandTrainer, FsPolicyStore, Policy, PolicyArtifact, PolicyLifecycleManager,
    PolicyStore, PolicyTrainer,
};
pub use sim::{SimulationResult, SimulationRunner, SimulationStats, TradeRecord};
