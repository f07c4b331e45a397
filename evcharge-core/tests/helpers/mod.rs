//! Shared test fixtures.

use crate::models::problem::*;
use crate::models::solution::VehicleSession;
use crate::telemetry::{Event, EventSink};
use std::sync::{Arc, Mutex};

pub fn create_vehicle(id: VehicleId) -> VehicleArrivalSpec {
    VehicleArrivalSpec {
        id,
        arrival_time: 0.,
        departure_time: 2.,
        brand: "Nissan Leaf 40kWh".to_string(),
        battery_capacity: 40.,
        required_energy: 10.,
        min_charge_rate: 3.,
        max_charge_rate: 10.,
        ac_charge_rate: 7.,
        dc_charge_rate: 50.,
        priority: 2,
        willingness_to_pay: 1.,
        efficiency: 1.,
    }
}

pub fn create_charger(id: ChargerId) -> ChargerSpec {
    ChargerSpec {
        id,
        power: 10.,
        kind: ChargerKind::Ac,
        installation_cost: 1000.,
        operation_cost_per_hour: 0.,
        efficiency: 1.,
        compatible_brands: vec!["Nissan Leaf".to_string(), "Renault Zoe".to_string()],
    }
}

pub fn create_problem(arrivals: Vec<VehicleArrivalSpec>, chargers: Vec<ChargerSpec>) -> Problem {
    Problem {
        arrivals,
        energy_prices: vec![EnergyPrice { time: 0., price: 50. }],
        station: StationConfig {
            spots: chargers.len(),
            chargers,
            transformer_limit: 1000.,
            efficiency: 0.95,
            time_resolution: 0.25,
            grid_constraints: None,
        },
    }
}

pub fn create_session(spec: VehicleArrivalSpec) -> VehicleSession {
    VehicleSession::new(Arc::new(spec))
}

/// A sink which keeps all received events for later inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn notify(&self, event: &Event) {
        self.events.lock().unwrap().push(event.clone());
    }
}
