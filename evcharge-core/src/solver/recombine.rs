#[cfg(test)]
#[path = "../../tests/unit/solver/recombine_test.rs"]
mod recombine_test;

use crate::models::problem::{ChargerId, VehicleId};
use crate::models::solution::Solution;
use evcharge_search::prelude::Float;
use rustc_hash::FxHashMap;

/// Merges the per-vehicle charger choices of two parent solutions into a preference map
/// for a recombined child run:
/// - a vehicle assigned by both parents keeps the pick of the parent which delivered more
///   energy to it,
/// - a charger claimed by several vehicles keeps the claim backed by the higher aggregate
///   objective (more delivered energy on equal objectives), the losers fall back to
///   normal charger selection.
pub fn merge_assignments(a: &Solution, b: &Solution) -> FxHashMap<VehicleId, ChargerId> {
    let delivered_a = delivered_by_vehicle(a);
    let delivered_b = delivered_by_vehicle(b);

    let objective_a = a.objective_value();
    let objective_b = b.objective_value();

    // (vehicle, charger, parent objective, delivered energy), vehicles sorted for determinism
    let mut claims: Vec<(VehicleId, ChargerId, Float, Float)> = Vec::new();

    let mut vehicle_ids: Vec<VehicleId> = a.assignments.keys().chain(b.assignments.keys()).copied().collect();
    vehicle_ids.sort_unstable();
    vehicle_ids.dedup();

    for vehicle_id in vehicle_ids {
        let from_a = a.assignments.get(&vehicle_id).copied();
        let from_b = b.assignments.get(&vehicle_id).copied();

        let claim = match (from_a, from_b) {
            (Some(charger_a), Some(charger_b)) => {
                let energy_a = delivered_a.get(&vehicle_id).copied().unwrap_or(0.);
                let energy_b = delivered_b.get(&vehicle_id).copied().unwrap_or(0.);

                if energy_a >= energy_b {
                    (charger_a, objective_a, energy_a)
                } else {
                    (charger_b, objective_b, energy_b)
                }
            }
            (Some(charger_a), None) => (charger_a, objective_a, delivered_a.get(&vehicle_id).copied().unwrap_or(0.)),
            (None, Some(charger_b)) => (charger_b, objective_b, delivered_b.get(&vehicle_id).copied().unwrap_or(0.)),
            (None, None) => continue,
        };

        claims.push((vehicle_id, claim.0, claim.1, claim.2));
    }

    let mut winners: FxHashMap<ChargerId, (VehicleId, Float, Float)> = FxHashMap::default();
    for (vehicle_id, charger_id, objective, energy) in claims {
        match winners.get(&charger_id) {
            Some(&(_, best_objective, best_energy))
                if best_objective > objective || (best_objective == objective && best_energy >= energy) => {}
            _ => {
                winners.insert(charger_id, (vehicle_id, objective, energy));
            }
        }
    }

    winners.into_iter().map(|(charger_id, (vehicle_id, _, _))| (vehicle_id, charger_id)).collect()
}

fn delivered_by_vehicle(solution: &Solution) -> FxHashMap<VehicleId, Float> {
    solution.sessions.iter().map(|session| (session.spec.id, session.energy_delivered)).collect()
}
