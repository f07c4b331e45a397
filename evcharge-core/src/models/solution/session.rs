#[cfg(test)]
#[path = "../../../tests/unit/models/session_test.rs"]
mod session_test;

use crate::models::problem::{ChargerId, VehicleArrivalSpec};
use evcharge_search::prelude::Float;
use std::sync::Arc;

/// Specifies a vehicle state during simulation. `Completed` and `Withdrawn` are terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum VehicleState {
    /// Waiting for a charger assignment.
    Waiting,
    /// Currently charging.
    Charging,
    /// Required energy was fully delivered.
    Completed,
    /// Left the station, charged or not.
    Withdrawn,
}

/// A single entry of the charger usage history of a vehicle.
#[derive(Clone, Debug)]
pub struct ChargerUsage {
    /// Used charger id.
    pub charger_id: ChargerId,
    /// Time the usage started.
    pub start: Float,
    /// Time the usage ended, when it did.
    pub end: Option<Float>,
    /// Whether the usage was cut short by load shedding.
    pub preempted: bool,
}

/// Mutable simulation state of one vehicle, layered over its immutable arrival data.
/// Owned exclusively by a scheduler run, created at simulation init and kept until run end.
#[derive(Clone, Debug)]
pub struct VehicleSession {
    /// Immutable arrival data.
    pub spec: Arc<VehicleArrivalSpec>,
    /// Current simulation state.
    pub state: VehicleState,
    /// Energy delivered so far, never exceeds the required energy.
    pub energy_delivered: Float,
    /// Currently assigned charger, implies `Charging` state.
    pub assigned_charger: Option<ChargerId>,
    /// Time the vehicle started waiting.
    pub wait_start: Float,
    /// Time of the first charger assignment.
    pub charge_start: Option<Float>,
    /// Time charging ended for good.
    pub charge_end: Option<Float>,
    /// Accumulated energy cost.
    pub energy_cost: Float,
    /// Accumulated charger operation cost.
    pub operation_cost: Float,
    /// Derived priority score in the `[1, 10]` range, used only in scoring.
    pub normalized_priority: Float,
    /// Charger usage history.
    pub usage: Vec<ChargerUsage>,
    /// Amount of times the vehicle was preempted.
    pub preemptions: usize,
}

impl VehicleSession {
    /// Creates a new instance of `VehicleSession` in the waiting state.
    pub fn new(spec: Arc<VehicleArrivalSpec>) -> Self {
        let wait_start = spec.arrival_time;
        let normalized_priority = normalize_priority(&spec);

        Self {
            spec,
            state: VehicleState::Waiting,
            energy_delivered: 0.,
            assigned_charger: None,
            wait_start,
            charge_start: None,
            charge_end: None,
            energy_cost: 0.,
            operation_cost: 0.,
            normalized_priority,
            usage: Vec::new(),
            preemptions: 0,
        }
    }

    /// Assigns a charger and opens a usage history entry.
    pub fn assign(&mut self, charger_id: ChargerId, time: Float) {
        if let Some(last) = self.usage.last_mut() {
            if last.end.is_none() {
                last.end = Some(time);
            }
        }

        self.usage.push(ChargerUsage { charger_id, start: time, end: None, preempted: false });
        self.assigned_charger = Some(charger_id);
        self.state = VehicleState::Charging;

        if self.charge_start.is_none() {
            self.charge_start = Some(time);
        }
    }

    /// Registers a preemption: the open usage entry is closed and flagged, the vehicle
    /// goes back to waiting.
    pub fn record_preemption(&mut self, time: Float) {
        if let Some(last) = self.usage.last_mut() {
            last.end = Some(time);
            last.preempted = true;
        }

        self.preemptions += 1;
        self.assigned_charger = None;
        self.state = VehicleState::Waiting;
    }

    /// Closes the open usage entry without changing state.
    pub fn close_usage(&mut self, time: Float) {
        if let Some(last) = self.usage.last_mut() {
            if last.end.is_none() {
                last.end = Some(time);
            }
        }
    }

    /// Simulates one charging step: delivers energy (capped at the required amount) and
    /// accrues energy and operation costs. Returns true when the charge got complete.
    pub fn apply_charging(
        &mut self,
        power: Float,
        price: Float,
        charger_efficiency: Float,
        time_resolution: Float,
        operation_cost_per_hour: Float,
    ) -> bool {
        let gained = power * time_resolution * charger_efficiency * self.spec.efficiency;
        self.energy_delivered = (self.energy_delivered + gained).min(self.spec.required_energy);

        self.energy_cost += power * time_resolution * price;
        self.operation_cost += time_resolution * operation_cost_per_hour;

        debug_assert!(self.energy_delivered >= 0.);

        if self.energy_delivered >= self.spec.required_energy {
            self.state = VehicleState::Completed;
            true
        } else {
            false
        }
    }

    /// Returns energy still to be delivered.
    pub fn remaining_energy(&self) -> Float {
        (self.spec.required_energy - self.energy_delivered).max(0.)
    }

    /// Returns charge completion in percent, capped at 100. A vehicle which requires no
    /// energy counts as fully complete.
    pub fn completion_pct(&self) -> Float {
        if self.spec.required_energy <= 0. {
            100.
        } else {
            (self.energy_delivered / self.spec.required_energy * 100.).min(100.)
        }
    }

    /// Checks whether the vehicle has arrived at the given time.
    pub fn has_arrived(&self, time: Float) -> bool {
        time >= self.spec.arrival_time
    }

    /// Checks whether the vehicle is due to depart at the given time.
    pub fn is_due(&self, time: Float) -> bool {
        time >= self.spec.departure_time
    }

    /// Returns time left before departure.
    pub fn time_left(&self, time: Float) -> Float {
        (self.spec.departure_time - time).max(0.)
    }

    /// Returns how long the vehicle has been waiting at the given time.
    pub fn wait_time(&self, time: Float) -> Float {
        (time - self.wait_start).max(0.)
    }

    /// Returns accumulated energy plus operation cost.
    pub fn total_cost(&self) -> Float {
        self.energy_cost + self.operation_cost
    }

    /// Checks whether the vehicle reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, VehicleState::Completed | VehicleState::Withdrawn)
    }

    /// Checks whether the vehicle ever occupied a charger.
    pub fn was_served(&self) -> bool {
        !self.usage.is_empty()
    }
}

/// Blends the raw priority class with time pressure into a `[1, 10]` score.
pub fn normalize_priority(spec: &VehicleArrivalSpec) -> Float {
    let base = match spec.priority {
        1 => 2.,
        2 => 5.,
        _ => 8.,
    };

    let stay = spec.stay_duration();
    let pressure = if stay > 0. { spec.required_energy / stay } else { 1. };
    let factor = (pressure / 10.).min(2.);

    (base + factor).clamp(1., 10.)
}
