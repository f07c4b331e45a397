use evcharge_search::prelude::Float;
use serde::{Deserialize, Serialize};

/// A unique charger identifier.
pub type ChargerId = u32;

/// Specifies a charger current kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum ChargerKind {
    /// Alternating current charger.
    #[serde(rename = "AC")]
    Ac,
    /// Direct current charger.
    #[serde(rename = "DC")]
    Dc,
}

/// Describes a single charger of the station: its electrical characteristics, economics
/// and the vehicle brands it can serve.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargerSpec {
    /// Unique charger id.
    #[serde(rename = "chargerId")]
    pub id: ChargerId,
    /// Maximum power output in kW.
    pub power: Float,
    /// Current kind.
    #[serde(rename = "type")]
    pub kind: ChargerKind,
    /// One-off installation cost.
    pub installation_cost: Float,
    /// Operating cost per hour, on top of the energy cost.
    pub operation_cost_per_hour: Float,
    /// Conversion efficiency of the charger.
    pub efficiency: Float,
    /// Vehicle brands this charger can serve.
    #[serde(rename = "compatibleVehicles")]
    pub compatible_brands: Vec<String>,
}

impl ChargerSpec {
    /// Returns the real achievable charging rate for a pairing with the given vehicle
    /// maximum charge rate.
    pub fn effective_power(&self, max_charge_rate: Float) -> Float {
        self.power.min(max_charge_rate)
    }
}

/// Hard electrical grid constraints of the station.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridConstraints {
    /// Maximum power allowed per phase in kW.
    pub max_power_per_phase: Float,
    /// Maximum allowed voltage drop as a fraction.
    pub voltage_drop_limit: Float,
    /// Minimum allowed power factor.
    pub power_factor_limit: Float,
    /// Overall system efficiency, when known.
    #[serde(default)]
    pub system_efficiency: Option<Float>,
}

/// Describes the charging station infrastructure.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationConfig {
    /// Total amount of parking spots.
    #[serde(rename = "nSpots")]
    pub spots: usize,
    /// Chargers installed at the station.
    pub chargers: Vec<ChargerSpec>,
    /// Maximum aggregate power the transformer sustains in kW.
    pub transformer_limit: Float,
    /// Overall electrical efficiency of the station.
    pub efficiency: Float,
    /// Simulation time step in hours, e.g. 0.25 for 15 minutes.
    pub time_resolution: Float,
    /// Electrical grid constraints, when present.
    #[serde(default)]
    pub grid_constraints: Option<GridConstraints>,
}

impl StationConfig {
    /// Returns the charger with the given id.
    pub fn charger(&self, id: ChargerId) -> Option<&ChargerSpec> {
        self.chargers.iter().find(|charger| charger.id == id)
    }
}
