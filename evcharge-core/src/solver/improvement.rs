#[cfg(test)]
#[path = "../../tests/unit/solver/improvement_test.rs"]
mod improvement_test;

use crate::construction::{is_compatible, PRIORITY_BONUS_RATE};
use crate::construction::{ConstructiveScheduler, SchedulerConfig};
use crate::models::problem::{ChargerId, Problem, VehicleId};
use crate::models::solution::{normalize_priority, Solution};
use crate::telemetry::NoopSink;
use evcharge_search::prelude::{Environment, Float};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Applies bounded local search to a solution: pairwise charger exchanges and
/// reassignments to unused chargers over the final assignment map, re-scored with a
/// static deliverable-energy estimator. When a better map is found, the schedule is
/// re-simulated under it as assignment hints; the better of the two solutions wins.
pub fn improve_solution(problem: &Arc<Problem>, solution: Solution, max_rounds: usize, seed: u64) -> Solution {
    let mut assignments: Vec<(VehicleId, ChargerId)> = solution.assignments.iter().map(|(&v, &c)| (v, c)).collect();
    assignments.sort_unstable();

    if assignments.is_empty() {
        return solution;
    }

    let mut best_estimate = estimate_assignments(problem, &assignments);
    let mut improved_any = false;

    for _ in 0..max_rounds {
        let mut improved = false;

        // pairwise charger exchange
        for i in 0..assignments.len() {
            for j in (i + 1)..assignments.len() {
                let mut swapped = assignments.clone();
                swapped[i].1 = assignments[j].1;
                swapped[j].1 = assignments[i].1;

                if !pairings_compatible(problem, &swapped[i..=i]) || !pairings_compatible(problem, &swapped[j..=j]) {
                    continue;
                }

                let estimate = estimate_assignments(problem, &swapped);
                if estimate > best_estimate {
                    assignments = swapped;
                    best_estimate = estimate;
                    improved = true;
                }
            }
        }

        // reassignment to chargers unused by the map
        let used: Vec<ChargerId> = assignments.iter().map(|&(_, charger)| charger).collect();
        let unused: Vec<ChargerId> = problem
            .station
            .chargers
            .iter()
            .map(|charger| charger.id)
            .filter(|id| !used.contains(id))
            .collect();

        for i in 0..assignments.len() {
            for &charger_id in unused.iter() {
                let mut moved = assignments.clone();
                moved[i].1 = charger_id;

                if !pairings_compatible(problem, &moved[i..=i]) {
                    continue;
                }

                let estimate = estimate_assignments(problem, &moved);
                if estimate > best_estimate {
                    assignments = moved;
                    best_estimate = estimate;
                    improved = true;
                }
            }
        }

        if improved {
            improved_any = true;
        } else {
            break;
        }
    }

    if !improved_any {
        return solution;
    }

    // materialize the improved map through a real simulation
    let hints: FxHashMap<VehicleId, ChargerId> = assignments.into_iter().collect();
    let environment = Arc::new(Environment::new_with_seed(seed));
    let config = SchedulerConfig { assignment_hints: hints, ..SchedulerConfig::default() };
    let candidate =
        ConstructiveScheduler::with_config(problem.clone(), environment, Arc::new(NoopSink), config).run();

    if candidate.objective_value() > solution.objective_value() {
        candidate
    } else {
        solution
    }
}

fn pairings_compatible(problem: &Problem, pairings: &[(VehicleId, ChargerId)]) -> bool {
    pairings.iter().all(|&(vehicle_id, charger_id)| {
        problem
            .arrivals
            .iter()
            .find(|arrival| arrival.id == vehicle_id)
            .zip(problem.station.charger(charger_id))
            .is_some_and(|(vehicle, charger)| is_compatible(vehicle, charger))
    })
}

/// Estimates the aggregate objective of an assignment map without simulation: each vehicle
/// gets as much of its required energy as its stay and the effective power allow, costed
/// at the average price.
pub(crate) fn estimate_assignments(problem: &Problem, assignments: &[(VehicleId, ChargerId)]) -> Float {
    let avg_price = problem.price_book().average();

    let mut value = 0.;
    let mut cost = 0.;

    for &(vehicle_id, charger_id) in assignments {
        let vehicle = problem.arrivals.iter().find(|arrival| arrival.id == vehicle_id);
        let charger = problem.station.charger(charger_id);

        let (vehicle, charger) = match (vehicle, charger) {
            (Some(vehicle), Some(charger)) => (vehicle, charger),
            _ => continue,
        };

        let conversion = charger.efficiency * vehicle.efficiency;
        let power = charger.effective_power(vehicle.max_charge_rate);
        let window = vehicle.stay_duration().max(0.);
        let deliverable = (power * window * conversion).min(vehicle.required_energy);

        value += deliverable * (1. + PRIORITY_BONUS_RATE * normalize_priority(vehicle));

        if conversion > 0. && power > 0. {
            let drawn = deliverable / conversion;
            let occupied = drawn / power;
            cost += drawn * avg_price + occupied * charger.operation_cost_per_hour;
        }
    }

    0.5 * value - cost
}
