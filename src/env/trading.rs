//! Episodic Trading Environment
//!
//! A gym-style state machine over one price series: step/reset, balance and
//! holding bookkeeping, mark-to-market rewards, terminal detection.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;
use crate::error::{Result, TradesimError};

/// Number of features in an observation
pub const OBSERVATION_DIM: usize = 3;

/// Discrete action space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    /// Do nothing
    Hold = 0,
    /// Buy one unit at the current price
    Buy = 1,
    /// Sell one unit at the current price
    Sell = 2,
}

impl Action {
    /// Convert from a raw action index.
    ///
    /// An index outside the action space is a caller error, distinct from a
    /// valid-but-inapplicable action (which the environment no-ops).
    pub fn from_index(index: usize) -> Result<Self> {
        match index {
            0 => Ok(Self::Hold),
            1 => Ok(Self::Buy),
            2 => Ok(Self::Sell),
            other => Err(TradesimError::InvalidAction(other)),
        }
    }

    pub fn to_index(self) -> usize {
        self as usize
    }

    pub fn all() -> &'static [Action] {
        &[Self::Hold, Self::Buy, Self::Sell]
    }
}

/// Kind of an executed trade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    Buy,
    Sell,
}

/// Fixed-shape view of the environment handed to policies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Price at the current step
    pub price: f64,
    /// Uncommitted cash
    pub balance: f64,
    /// Units held
    pub holding: u32,
}

impl Observation {
    /// Flatten into the fixed feature vector consumed by policies
    pub fn features(&self) -> [f32; OBSERVATION_DIM] {
        [self.price as f32, self.balance as f32, self.holding as f32]
    }
}

/// Trade executed during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Execution {
    pub kind: TradeKind,
    /// Fill price: the price at the step the action executed
    pub price: f64,
}

/// Per-step bookkeeping the backtest runner consumes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepInfo {
    /// Trade that actually executed this step, if any
    pub execution: Option<Execution>,
    /// Portfolio valuation after the step, at the new step's price
    pub portfolio_value: f64,
}

/// Result of taking a step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

/// Episodic trading environment over one instrument
///
/// Owns its state exclusively; all mutation goes through `reset` and `step`.
/// Balance and holding never go negative: Buy executes only with sufficient
/// balance, Sell only with a unit held, and anything else is a no-op.
pub struct TradingEnvironment {
    series: Arc<PriceSeries>,
    initial_balance: f64,
    current_step: usize,
    balance: f64,
    holding: u32,
}

impl TradingEnvironment {
    /// Build an environment over a series of at least two prices
    pub fn new(series: Arc<PriceSeries>, initial_balance: f64) -> Result<Self> {
        if series.len() < 2 {
            return Err(TradesimError::SeriesTooShort {
                len: series.len(),
                min: 2,
            });
        }
        Ok(Self {
            series,
            initial_balance,
            current_step: 0,
            balance: initial_balance,
            holding: 0,
        })
    }

    /// Start a fresh episode and return the initial observation
    pub fn reset(&mut self) -> Observation {
        self.current_step = 0;
        self.balance = self.initial_balance;
        self.holding = 0;
        self.observation()
    }

    /// Apply an action and advance one step.
    ///
    /// The reward is the mark-to-market value change: the portfolio valued at
    /// the new step's price minus the pre-step valuation. Unrealized moves
    /// count, so holding through a rally is rewarded without a sale.
    ///
    /// Stepping a finished episode is a guarded no-op: the terminal
    /// observation comes back with zero reward and `done` still set.
    pub fn step(&mut self, action: Action) -> StepOutcome {
        if self.is_terminal() {
            return StepOutcome {
                observation: self.observation(),
                reward: 0.0,
                done: true,
                info: StepInfo {
                    execution: None,
                    portfolio_value: self.portfolio_value(),
                },
            };
        }

        let price = self.series.price_at(self.current_step);
        let value_before = self.portfolio_value();

        let execution = match action {
            Action::Buy if self.balance >= price => {
                self.balance -= price;
                self.holding += 1;
                Some(Execution {
                    kind: TradeKind::Buy,
                    price,
                })
            }
            Action::Sell if self.holding > 0 => {
                self.balance += price;
                self.holding -= 1;
                Some(Execution {
                    kind: TradeKind::Sell,
                    price,
                })
            }
            // Hold, or an inapplicable Buy/Sell
            _ => None,
        };

        self.current_step += 1;

        let value_after = self.portfolio_value();

        StepOutcome {
            observation: self.observation(),
            reward: value_after - value_before,
            done: self.is_terminal(),
            info: StepInfo {
                execution,
                portfolio_value: value_after,
            },
        }
    }

    /// Portfolio valuation at the current step's price
    pub fn portfolio_value(&self) -> f64 {
        self.balance + f64::from(self.holding) * self.series.price_at(self.current_step)
    }

    fn observation(&self) -> Observation {
        Observation {
            price: self.series.price_at(self.current_step),
            balance: self.balance,
            holding: self.holding,
        }
    }

    fn is_terminal(&self) -> bool {
        self.current_step >= self.series.len() - 1
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn holding(&self) -> u32 {
        self.holding
    }

    pub fn initial_balance(&self) -> f64 {
        self.initial_balance
    }

    /// Instrument this environment trades
    pub fn ticker(&self) -> &str {
        self.series.ticker()
    }

    /// Length of the underlying series
    pub fn series_len(&self) -> usize {
        self.series.len()
    }
}
