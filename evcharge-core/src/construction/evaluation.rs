#[cfg(test)]
#[path = "../../tests/unit/construction/evaluation_test.rs"]
mod evaluation_test;

use crate::models::problem::{ChargerId, StationConfig, VehicleId};
use crate::models::solution::VehicleSession;
use evcharge_search::prelude::{get_mean_slice, get_variance, Float};

const COST_WEIGHT: Float = -1.0;
const VALUE_WEIGHT: Float = 1.5;
const FAIRNESS_WEIGHT: Float = 0.8;
const EFFICIENCY_WEIGHT: Float = 1.0;

/// Share of the delivered energy granted as a bonus per normalized priority point.
pub(crate) const PRIORITY_BONUS_RATE: Float = 0.1;

/// Scores a candidate assignment on four objectives: estimated energy cost (penalized),
/// estimated delivered value with priority bonus, fairness of charge distribution and
/// average charger efficiency. Weights are fixed constants of the model. An empty
/// candidate scores zero.
pub fn evaluate_candidate(
    pairs: &[(VehicleId, ChargerId)],
    sessions: &[VehicleSession],
    station: &StationConfig,
    current_price: Float,
    time: Float,
) -> Float {
    if pairs.is_empty() {
        return 0.;
    }

    let mut cost_estimate = 0.;
    let mut value_estimate = 0.;
    let mut completions = Vec::with_capacity(pairs.len());
    let mut efficiencies = Vec::with_capacity(pairs.len());

    for &(vehicle_id, charger_id) in pairs {
        let session = sessions.iter().find(|session| session.spec.id == vehicle_id);
        let charger = station.charger(charger_id);

        let (session, charger) = match (session, charger) {
            (Some(session), Some(charger)) => (session, charger),
            _ => continue,
        };

        let time_available = session.time_left(time);
        let effective_power = charger.effective_power(session.spec.max_charge_rate);
        let energy_estimate = (effective_power * time_available).min(session.spec.required_energy);

        cost_estimate += energy_estimate * current_price;
        value_estimate += energy_estimate * (1. + PRIORITY_BONUS_RATE * session.normalized_priority);

        completions.push(session.completion_pct());
        efficiencies.push(charger.efficiency);
    }

    let fairness = if completions.is_empty() { 0. } else { 100. / (1. + get_variance(&completions)) };
    let avg_efficiency = get_mean_slice(&efficiencies);

    COST_WEIGHT * cost_estimate
        + VALUE_WEIGHT * value_estimate
        + FAIRNESS_WEIGHT * fairness
        + EFFICIENCY_WEIGHT * avg_efficiency
}
