use evcharge_search::prelude::{compare_floats, Float};
use serde::{Deserialize, Serialize};

/// A price used when the energy price curve is empty.
pub const DEFAULT_ENERGY_PRICE: Float = 50.0;

/// An energy price at a specific point of simulated time.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct EnergyPrice {
    /// Time in hours from simulation start.
    pub time: Float,
    /// Energy cost at that time.
    pub price: Float,
}

/// A nearest-time lookup over an energy price series.
#[derive(Clone, Debug)]
pub struct PriceBook {
    prices: Vec<EnergyPrice>,
}

impl PriceBook {
    /// Creates a new instance of `PriceBook` over the given series.
    pub fn new(prices: Vec<EnergyPrice>) -> Self {
        Self { prices }
    }

    /// Returns the price closest in time to the given moment, or [`DEFAULT_ENERGY_PRICE`]
    /// when the series is empty. The earlier entry wins on equally distant entries.
    pub fn price_at(&self, time: Float) -> Float {
        self.prices
            .iter()
            .min_by(|a, b| compare_floats((a.time - time).abs(), (b.time - time).abs()))
            .map(|entry| entry.price)
            .unwrap_or(DEFAULT_ENERGY_PRICE)
    }

    /// Returns the average price over the whole series, or [`DEFAULT_ENERGY_PRICE`] when empty.
    pub fn average(&self) -> Float {
        if self.prices.is_empty() {
            DEFAULT_ENERGY_PRICE
        } else {
            self.prices.iter().map(|entry| entry.price).sum::<Float>() / self.prices.len() as Float
        }
    }
}
