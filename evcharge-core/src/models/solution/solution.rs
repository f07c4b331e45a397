#[cfg(test)]
#[path = "../../../tests/unit/models/solution_test.rs"]
mod solution_test;

use crate::models::problem::{ChargerId, VehicleId};
use crate::models::solution::VehicleSession;
use evcharge_search::prelude::Float;
use rustc_hash::FxHashMap;

/// Weight of the delivered value in the aggregate objective.
const OBJECTIVE_VALUE_WEIGHT: Float = 0.5;
/// Weight of the total cost in the aggregate objective.
const OBJECTIVE_COST_WEIGHT: Float = 1.0;

/// The aggregate outcome of one full constructive scheduler run. Cloning produces a deep,
/// fully independent value copy.
#[derive(Clone, Debug, Default)]
pub struct Solution {
    /// Total operating cost: energy plus charger operation.
    pub total_cost: Float,
    /// Energy cost share of the total.
    pub energy_cost: Float,
    /// Value of the charge delivered to customers, priority bonus included.
    pub delivered_value: Float,
    /// Total energy delivered.
    pub energy_delivered: Float,
    /// Total energy requested by all vehicles.
    pub energy_required: Float,
    /// Delivered share of the requested energy, in percent.
    pub delivered_pct: Float,
    /// Amount of vehicles which ever occupied a charger.
    pub vehicles_served: usize,
    /// Amount of vehicles charged to completion.
    pub vehicles_completed: usize,
    /// Average completion percentage over served vehicles.
    pub avg_completion_pct: Float,
    /// Average wait before the first charge (stay duration for never served vehicles).
    pub avg_wait_time: Float,
    /// Average efficiency of the chargers used by the final assignments.
    pub avg_charger_efficiency: Float,
    /// Final vehicle to charger mapping.
    pub assignments: FxHashMap<VehicleId, ChargerId>,
    /// How often each heuristic won the candidate selection.
    pub heuristic_usage: FxHashMap<&'static str, usize>,
    /// Final snapshot of all vehicle sessions.
    pub sessions: Vec<VehicleSession>,
    /// Wall clock duration of the run in milliseconds.
    pub runtime_ms: u128,
}

impl Solution {
    /// Returns the aggregate objective: reward delivered value, penalize total cost.
    /// The weights are fixed constants of the model.
    pub fn objective_value(&self) -> Float {
        OBJECTIVE_VALUE_WEIGHT * self.delivered_value - OBJECTIVE_COST_WEIGHT * self.total_cost
    }

    /// Returns the heuristic which won the most iterations, if any selection happened.
    pub fn most_used_heuristic(&self) -> Option<&'static str> {
        self.heuristic_usage
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .filter(|(_, &count)| count > 0)
            .map(|(&name, _)| name)
    }

    /// Re-derives the delivered percentage from the energy fields, clamped to `[0, 100]`.
    pub fn recalc_delivered_pct(&mut self) {
        if self.energy_required > 0. {
            self.delivered_pct = (self.energy_delivered / self.energy_required * 100.).clamp(0., 100.);
        }
    }
}
