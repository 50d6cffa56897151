//! Price Series Acquisition
//!
//! Real closing prices with a deterministic synthetic fallback, behind one
//! provider interface.

pub mod provider;
pub mod series;
pub mod source;
pub mod synthetic;

pub use provider::{PriceSeriesProvider, SeriesRequest};
pub use series::{HistoryPeriod, PriceSeries, Provenance};
pub use source::{MarketDataSource, YahooFinanceSource};
pub use synthetic::{GbmParams, SyntheticPriceGenerator};
