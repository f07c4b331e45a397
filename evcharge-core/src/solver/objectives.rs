#[cfg(test)]
#[path = "../../tests/unit/solver/objectives_test.rs"]
mod objectives_test;

use crate::models::solution::Solution;
use evcharge_search::pareto::DominanceOrd;
use evcharge_search::prelude::Float;

/// Index of the (sign-flipped) total cost objective.
pub const MINIMIZE_COST: usize = 0;
/// Index of the delivered energy objective.
pub const MAXIMIZE_ENERGY: usize = 1;
/// Index of the served vehicles objective.
pub const MAXIMIZE_VEHICLES: usize = 2;
/// Index of the (sign-flipped) average wait time objective.
pub const MINIMIZE_WAIT_TIME: usize = 3;
/// Index of the charger efficiency objective.
pub const MAXIMIZE_EFFICIENCY: usize = 4;
/// Index of the delivered percentage objective.
pub const MAXIMIZE_DELIVERED_PCT: usize = 5;

/// A solution projected into the six dimensional objective space used for Pareto analysis.
/// Minimization objectives are sign-flipped so that every entry is "larger is better",
/// which keeps the dominance test direction uniform.
#[derive(Clone, Debug)]
pub struct SolutionObjectives {
    solution: Solution,
    objectives: [Float; 6],
}

impl SolutionObjectives {
    /// Creates a new instance of `SolutionObjectives` over the given solution.
    pub fn new(solution: Solution) -> Self {
        let objectives = [
            -solution.total_cost,
            solution.energy_delivered,
            solution.vehicles_served as Float,
            -solution.avg_wait_time,
            solution.avg_charger_efficiency * 100.,
            solution.delivered_pct,
        ];

        Self { solution, objectives }
    }

    /// Returns the wrapped solution.
    pub fn solution(&self) -> &Solution {
        &self.solution
    }

    /// Unwraps the solution.
    pub fn into_solution(self) -> Solution {
        self.solution
    }
}

impl DominanceOrd for SolutionObjectives {
    fn objectives(&self) -> &[Float] {
        &self.objectives
    }
}
