//! Price Series Types
//!
//! A price series is the unit of market data everything downstream consumes:
//! an ordered run of closing prices for one instrument, tagged with where it
//! came from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Origin of a price series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Historical closing prices from a market data source
    Real,
    /// Generated geometric Brownian motion path
    Synthetic,
}

/// History window understood by market data sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl HistoryPeriod {
    /// Range parameter understood by chart-style APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMonth => "1mo",
            Self::ThreeMonths => "3mo",
            Self::SixMonths => "6mo",
            Self::OneYear => "1y",
            Self::TwoYears => "2y",
            Self::FiveYears => "5y",
        }
    }
}

impl fmt::Display for HistoryPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered closing prices for one instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSeries {
    ticker: String,
    provenance: Provenance,
    values: Vec<f64>,
}

impl PriceSeries {
    /// Build a series, sanitizing non-finite values to zero.
    ///
    /// Zeroing NaN/Inf is lossy but keeps every downstream valuation finite;
    /// a gap in the data is not worth aborting a simulation over.
    pub fn new(ticker: impl Into<String>, provenance: Provenance, mut values: Vec<f64>) -> Self {
        for value in values.iter_mut() {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
        Self {
            ticker: ticker.into(),
            provenance,
            values,
        }
    }

    /// Instrument identifier
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    pub fn is_synthetic(&self) -> bool {
        self.provenance == Provenance::Synthetic
    }

    /// Prices in chronological order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Price at a step index.
    ///
    /// Callers stay within `0..len()`; the environment guarantees this by
    /// construction.
    pub fn price_at(&self, step: usize) -> f64 {
        self.values[step]
    }
}
