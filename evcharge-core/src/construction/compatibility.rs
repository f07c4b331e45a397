#[cfg(test)]
#[path = "../../tests/unit/construction/compatibility_test.rs"]
mod compatibility_test;

use crate::models::problem::{ChargerId, ChargerSpec, VehicleArrivalSpec};
use evcharge_search::prelude::Float;

const POWER_WEIGHT: Float = 0.5;
const EFFICIENCY_WEIGHT: Float = 0.3;
const OPERATION_COST_WEIGHT: Float = 0.2;

/// Normalizes a vehicle brand to its first two tokens, e.g. "Renault Zoe 52kWh"
/// becomes "renault zoe". Shorter brands are kept whole.
pub fn base_brand(brand: &str) -> String {
    brand.split_whitespace().take(2).collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Checks brand compatibility of a vehicle-charger pairing: the normalized vehicle brand
/// and any entry of the charger's compatible list must contain each other, case-insensitive,
/// in either direction.
pub fn is_compatible(vehicle: &VehicleArrivalSpec, charger: &ChargerSpec) -> bool {
    let base = base_brand(&vehicle.brand);

    charger.compatible_brands.iter().any(|compatible| {
        let compatible = compatible.to_lowercase();
        base.contains(&compatible) || compatible.contains(&base)
    })
}

/// Scores how well a charger suits a vehicle: rewards effective power close to the vehicle
/// limit, charger efficiency and low operation cost. Returns zero for incompatible pairs.
pub fn compatibility_score(vehicle: &VehicleArrivalSpec, charger: &ChargerSpec) -> Float {
    if !is_compatible(vehicle, charger) {
        return 0.;
    }

    let power_factor = charger.effective_power(vehicle.max_charge_rate) / vehicle.max_charge_rate;
    let cost_factor = 1. / (1. + charger.operation_cost_per_hour);

    POWER_WEIGHT * power_factor + EFFICIENCY_WEIGHT * charger.efficiency + OPERATION_COST_WEIGHT * cost_factor
}

/// Picks the best compatible charger for a vehicle among the given free chargers. The first
/// charger wins on equal scores. Returns `None` when no compatible charger remains.
pub fn best_charger<'a, I>(vehicle: &VehicleArrivalSpec, free_chargers: I) -> Option<ChargerId>
where
    I: Iterator<Item = &'a ChargerSpec>,
{
    let mut best: Option<(ChargerId, Float)> = None;

    for charger in free_chargers {
        if !is_compatible(vehicle, charger) {
            continue;
        }

        let score = compatibility_score(vehicle, charger);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((charger.id, score));
        }
    }

    best.map(|(id, _)| id)
}
