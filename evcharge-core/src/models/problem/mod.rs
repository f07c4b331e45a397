//! Problem definition models: vehicle arrivals, charger infrastructure and energy prices.
//! All types here are immutable inputs produced by an external configuration loader,
//! the core itself performs no parsing.

#[cfg(test)]
#[path = "../../../tests/unit/models/problem_test.rs"]
mod problem_test;

mod chargers;
pub use self::chargers::*;

mod prices;
pub use self::prices::*;

mod vehicles;
pub use self::vehicles::*;

use serde::{Deserialize, Serialize};

/// Defines the whole scheduling problem: who arrives, what infrastructure serves them
/// and how energy is priced over time.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Vehicle arrivals to be scheduled.
    pub arrivals: Vec<VehicleArrivalSpec>,
    /// Energy price curve over simulated time.
    pub energy_prices: Vec<EnergyPrice>,
    /// Charging station configuration.
    #[serde(rename = "parkingConfig")]
    pub station: StationConfig,
}

impl Problem {
    /// Builds a price lookup over the problem's energy price curve.
    pub fn price_book(&self) -> PriceBook {
        PriceBook::new(self.energy_prices.clone())
    }
}
