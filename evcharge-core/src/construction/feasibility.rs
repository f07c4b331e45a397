#[cfg(test)]
#[path = "../../tests/unit/construction/feasibility_test.rs"]
mod feasibility_test;

use crate::construction::is_compatible;
use crate::models::problem::{ChargerSpec, StationConfig};
use crate::models::solution::VehicleSession;
use evcharge_search::prelude::Float;
use std::fmt;

/// The outcome of a feasibility check of one vehicle-charger pairing. Failures are expected
/// control-flow results, not errors. The variant order is the check order: the first failed
/// check decides the outcome.
#[derive(Clone, Debug, PartialEq)]
pub enum Feasibility {
    /// All hard constraints hold, the pairing can be applied.
    Feasible,
    /// The vehicle brand does not match the charger's compatible list.
    Incompatible,
    /// The vehicle is already due to depart.
    AlreadyDeparted,
    /// No charging time remains before departure.
    NoTimeLeft,
    /// Applying the pairing would exceed the transformer limit.
    TransformerLimitExceeded {
        /// Current aggregate charging load.
        load: Float,
        /// Effective power the pairing would add.
        added: Float,
        /// Transformer limit.
        limit: Float,
    },
    /// Applying the pairing would exceed the per-phase grid limit.
    GridPhaseLimitExceeded {
        /// Resulting load per phase.
        per_phase: Float,
        /// Per-phase limit.
        limit: Float,
    },
}

impl Feasibility {
    /// Checks whether the outcome allows the assignment.
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible)
    }
}

impl fmt::Display for Feasibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feasibility::Feasible => write!(f, "feasible"),
            Feasibility::Incompatible => write!(f, "vehicle incompatible with charger"),
            Feasibility::AlreadyDeparted => write!(f, "vehicle already due to depart"),
            Feasibility::NoTimeLeft => write!(f, "no time left before departure"),
            Feasibility::TransformerLimitExceeded { load, added, limit } => {
                write!(f, "exceeds transformer limit: {load:.1} + {added:.1} > {limit:.1} kW")
            }
            Feasibility::GridPhaseLimitExceeded { per_phase, limit } => {
                write!(f, "exceeds per-phase limit: {per_phase:.1} > {limit:.1} kW")
            }
        }
    }
}

/// Runs the ordered feasibility checks for assigning the given charger to the vehicle at
/// the given time, with `current_load` being the aggregate effective power of all charging
/// vehicles.
pub fn check_feasibility(
    session: &VehicleSession,
    charger: &ChargerSpec,
    time: Float,
    current_load: Float,
    station: &StationConfig,
) -> Feasibility {
    if !is_compatible(&session.spec, charger) {
        return Feasibility::Incompatible;
    }

    if session.is_due(time) {
        return Feasibility::AlreadyDeparted;
    }

    if session.spec.departure_time - time <= 0. {
        return Feasibility::NoTimeLeft;
    }

    let added = charger.effective_power(session.spec.max_charge_rate);
    if current_load + added > station.transformer_limit {
        return Feasibility::TransformerLimitExceeded { load: current_load, added, limit: station.transformer_limit };
    }

    if let Some(grid) = station.grid_constraints.as_ref() {
        // assuming balanced three-phase distribution
        let per_phase = (current_load + added) / 3.;
        if per_phase > grid.max_power_per_phase {
            return Feasibility::GridPhaseLimitExceeded { per_phase, limit: grid.max_power_per_phase };
        }
    }

    Feasibility::Feasible
}
