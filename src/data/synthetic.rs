//! Synthetic Price Generation
//!
//! Geometric Brownian motion paths used as a deterministic fallback when
//! real market data is unavailable.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::series::{PriceSeries, Provenance};

/// Geometric Brownian motion parameters
#[derive(Debug, Clone, Copy)]
pub struct GbmParams {
    /// Number of prices to generate
    pub length: usize,
    /// First price anchor
    pub start_price: f64,
    /// Mean of the per-step log-return
    pub drift: f64,
    /// Standard deviation of the per-step log-return
    pub volatility: f64,
}

impl Default for GbmParams {
    fn default() -> Self {
        Self {
            length: 252,
            start_price: 100.0,
            drift: 0.0005,
            volatility: 0.02,
        }
    }
}

/// Seeded GBM price path generator
///
/// Identical parameters and seed yield bit-identical output, which is what
/// makes the offline fallback reproducible.
pub struct SyntheticPriceGenerator {
    params: GbmParams,
}

impl SyntheticPriceGenerator {
    pub fn new(params: GbmParams) -> Self {
        Self { params }
    }

    /// Generate a price path for `ticker` from `seed`
    pub fn generate(&self, ticker: &str, seed: u64) -> PriceSeries {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cumulative = 0.0;
        let mut values = Vec::with_capacity(self.params.length);

        for _ in 0..self.params.length {
            cumulative += self.params.drift + self.params.volatility * sample_normal(&mut rng);
            values.push(self.params.start_price * cumulative.exp());
        }

        PriceSeries::new(ticker, Provenance::Synthetic, values)
    }
}

impl Default for SyntheticPriceGenerator {
    fn default() -> Self {
        Self::new(GbmParams::default())
    }
}

/// Standard normal sample via the Box-Muller transform
fn sample_normal(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(0.0001..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}
