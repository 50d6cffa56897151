//! Episodic Trading Environments
//!
//! The market-interaction state machine and the multi-instrument sampler
//! built on top of it.

pub mod pool;
pub mod trading;

pub use pool::EnvironmentPool;
pub use trading::{
    Action, Execution, Observation, StepInfo, StepOutcome, TradeKind, TradingEnvironment,
    OBSERVATION_DIM,
};
