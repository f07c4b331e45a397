use evcharge_search::prelude::Float;
use serde::{Deserialize, Serialize};

/// A unique vehicle identifier.
pub type VehicleId = u32;

/// Describes a single electric vehicle arrival: when it shows up, when it plans to leave
/// and what its battery can accept. Times are in hours from simulation start, energy in
/// kWh, rates in kW.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleArrivalSpec {
    /// Unique vehicle id.
    pub id: VehicleId,
    /// Arrival time at the station.
    pub arrival_time: Float,
    /// Planned departure time.
    pub departure_time: Float,
    /// Brand and model, e.g. "Renault Zoe 52kWh".
    pub brand: String,
    /// Total battery capacity.
    pub battery_capacity: Float,
    /// Energy the vehicle needs to charge.
    pub required_energy: Float,
    /// Minimum acceptable charge rate.
    pub min_charge_rate: Float,
    /// Maximum charge rate the battery accepts.
    pub max_charge_rate: Float,
    /// Maximum charge rate on an AC charger.
    pub ac_charge_rate: Float,
    /// Maximum charge rate on a DC charger.
    pub dc_charge_rate: Float,
    /// Priority class: 1 is the highest, 3 the lowest.
    pub priority: u8,
    /// Willingness to pay multiplier over the base energy price.
    pub willingness_to_pay: Float,
    /// Charging efficiency of the vehicle side.
    pub efficiency: Float,
}

impl VehicleArrivalSpec {
    /// Returns the planned stay duration.
    pub fn stay_duration(&self) -> Float {
        self.departure_time - self.arrival_time
    }
}
