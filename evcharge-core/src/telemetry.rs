//! This module provides structured events emitted by the scheduler and the optimizer.
//! Consumers decide formatting and persistence; the built-in sinks either drop events
//! or render compact log lines.

#[cfg(test)]
#[path = "../tests/unit/telemetry_test.rs"]
mod telemetry_test;

use crate::models::problem::{ChargerId, VehicleId};
use evcharge_search::prelude::{Float, InfoLogger};

/// A structured event describing one observable step of the algorithms.
#[derive(Clone, Debug)]
pub enum Event {
    /// A scheduler iteration started.
    IterationStarted {
        /// Simulation time.
        time: Float,
        /// Amount of vehicles waiting for a charger.
        waiting: usize,
        /// Amount of free chargers.
        free_chargers: usize,
    },
    /// A candidate assignment won the multi-objective selection.
    CandidateSelected {
        /// Simulation time.
        time: Float,
        /// Name of the winning heuristic.
        heuristic: &'static str,
        /// Amount of vehicle-charger pairs in the candidate.
        assigned: usize,
        /// Evaluation score of the candidate.
        score: Float,
    },
    /// A vehicle-charger pairing failed a feasibility check.
    AssignmentRejected {
        /// Simulation time.
        time: Float,
        /// Vehicle id.
        vehicle_id: VehicleId,
        /// Charger id.
        charger_id: ChargerId,
        /// Human readable rejection reason.
        reason: String,
    },
    /// A vehicle started charging.
    VehicleAssigned {
        /// Simulation time.
        time: Float,
        /// Vehicle id.
        vehicle_id: VehicleId,
        /// Charger id.
        charger_id: ChargerId,
    },
    /// A vehicle got its full required energy.
    ChargingCompleted {
        /// Simulation time.
        time: Float,
        /// Vehicle id.
        vehicle_id: VehicleId,
        /// Total energy delivered to the vehicle.
        energy_delivered: Float,
    },
    /// A vehicle left the station.
    VehicleDeparted {
        /// Simulation time.
        time: Float,
        /// Vehicle id.
        vehicle_id: VehicleId,
        /// Charge completion at departure, in percent.
        completion_pct: Float,
    },
    /// A charging vehicle was forced back to waiting to shed transformer load.
    VehiclePreempted {
        /// Simulation time.
        time: Float,
        /// Vehicle id.
        vehicle_id: VehicleId,
        /// Charger id which got released.
        charger_id: ChargerId,
        /// Effective power released by the preemption.
        released_power: Float,
    },
    /// Result of the per-step transformer limit check.
    TransformerCheck {
        /// Simulation time.
        time: Float,
        /// Aggregate charging load.
        load: Float,
        /// Transformer limit.
        limit: Float,
        /// Whether the load exceeds the limit.
        violation: bool,
    },
    /// A transformer violation could not be resolved by shedding low priority vehicles.
    TransformerOverload {
        /// Simulation time.
        time: Float,
        /// Remaining excess over the limit.
        excess: Float,
    },
    /// Derived grid constraint metrics for the current step.
    GridReport {
        /// Simulation time.
        time: Float,
        /// Load per phase, assuming balanced three-phase distribution.
        per_phase_load: Float,
        /// Estimated voltage drop.
        voltage_drop: Float,
        /// Estimated power factor.
        power_factor: Float,
    },
    /// A per-step snapshot of the simulation state.
    TimeSample {
        /// Simulation time.
        time: Float,
        /// Aggregate charging load.
        load: Float,
        /// Amount of occupied chargers.
        occupied_chargers: usize,
        /// Amount of charging vehicles.
        charging: usize,
        /// Amount of waiting vehicles.
        waiting: usize,
        /// Amount of completed vehicles.
        completed: usize,
        /// Total energy delivered so far.
        energy_delivered: Float,
    },
    /// A full scheduler run finished.
    SolutionCompleted {
        /// Delivered share of the requested energy, in percent.
        delivered_pct: Float,
        /// Total energy delivered.
        energy_delivered: Float,
        /// Total energy requested.
        energy_required: Float,
    },
    /// A scatter search phase progressed.
    ScatterPhase {
        /// Phase name.
        phase: &'static str,
        /// Free-form phase details.
        details: String,
    },
    /// A scatter search iteration finished.
    ScatterIteration {
        /// Iteration number.
        iteration: usize,
        /// Best known aggregate objective.
        best_objective: Float,
        /// Whether this iteration improved the reference set or the front.
        improved: bool,
        /// Current reference set size.
        reference_size: usize,
        /// Current Pareto front size.
        front_size: usize,
    },
}

/// Receives structured events. Implementations must be cheap and non-blocking, both
/// algorithms call them from their hot loops.
pub trait EventSink: Send + Sync {
    /// Consumes a single event.
    fn notify(&self, event: &Event);
}

/// A sink which drops all events.
#[derive(Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn notify(&self, _: &Event) {}
}

/// A sink which renders compact single line messages through an [`InfoLogger`].
pub struct LogSink {
    logger: InfoLogger,
}

impl LogSink {
    /// Creates a new instance of `LogSink`.
    pub fn new(logger: InfoLogger) -> Self {
        Self { logger }
    }
}

impl EventSink for LogSink {
    fn notify(&self, event: &Event) {
        let message = match event {
            Event::IterationStarted { time, waiting, free_chargers } => {
                format!("[t={time:.2}] iteration: {waiting} waiting, {free_chargers} chargers free")
            }
            Event::CandidateSelected { time, heuristic, assigned, score } => {
                format!("[t={time:.2}] selected {heuristic}: {assigned} assignments, score {score:.2}")
            }
            Event::AssignmentRejected { time, vehicle_id, charger_id, reason } => {
                format!("[t={time:.2}] rejected vehicle {vehicle_id} on charger {charger_id}: {reason}")
            }
            Event::VehicleAssigned { time, vehicle_id, charger_id } => {
                format!("[t={time:.2}] vehicle {vehicle_id} charging on {charger_id}")
            }
            Event::ChargingCompleted { time, vehicle_id, energy_delivered } => {
                format!("[t={time:.2}] vehicle {vehicle_id} complete, {energy_delivered:.2} kWh delivered")
            }
            Event::VehicleDeparted { time, vehicle_id, completion_pct } => {
                format!("[t={time:.2}] vehicle {vehicle_id} departed at {completion_pct:.1}%")
            }
            Event::VehiclePreempted { time, vehicle_id, charger_id, released_power } => {
                format!("[t={time:.2}] preempted vehicle {vehicle_id} from {charger_id}, released {released_power:.1} kW")
            }
            Event::TransformerCheck { time, load, limit, violation } => {
                format!("[t={time:.2}] transformer load {load:.1}/{limit:.1} kW{}", if *violation { " VIOLATION" } else { "" })
            }
            Event::TransformerOverload { time, excess } => {
                format!("[t={time:.2}] unresolved transformer overload: {excess:.1} kW excess")
            }
            Event::GridReport { time, per_phase_load, voltage_drop, power_factor } => {
                format!("[t={time:.2}] grid: {per_phase_load:.1} kW/phase, drop {voltage_drop:.3}, pf {power_factor:.2}")
            }
            Event::TimeSample { time, load, occupied_chargers, charging, waiting, completed, energy_delivered } => {
                format!(
                    "[t={time:.2}] load {load:.1} kW, {occupied_chargers} occupied, {charging} charging, {waiting} waiting, {completed} completed, {energy_delivered:.1} kWh"
                )
            }
            Event::SolutionCompleted { delivered_pct, energy_delivered, energy_required } => {
                format!("run complete: {energy_delivered:.1}/{energy_required:.1} kWh ({delivered_pct:.1}%)")
            }
            Event::ScatterPhase { phase, details } => format!("scatter {phase}: {details}"),
            Event::ScatterIteration { iteration, best_objective, improved, reference_size, front_size } => {
                format!(
                    "scatter iteration {iteration}: best {best_objective:.2}{}, refset {reference_size}, front {front_size}",
                    if *improved { " (improved)" } else { "" }
                )
            }
        };

        (self.logger)(&message);
    }
}
