use super::*;
use crate::helpers::{create_session, create_vehicle};

#[test]
fn can_start_in_waiting_state() {
    let session = create_session(create_vehicle(1));

    assert_eq!(session.state, VehicleState::Waiting);
    assert_eq!(session.energy_delivered, 0.);
    assert!(session.assigned_charger.is_none());
    assert!(!session.was_served());
}

#[test]
fn can_normalize_priority_classes() {
    // 10 kWh over a 2h stay: pressure 5, factor 0.5
    let mut spec = create_vehicle(1);

    spec.priority = 1;
    assert_eq!(normalize_priority(&spec), 2.5);

    spec.priority = 2;
    assert_eq!(normalize_priority(&spec), 5.5);

    spec.priority = 3;
    assert_eq!(normalize_priority(&spec), 8.5);
}

#[test]
fn can_clamp_normalized_priority() {
    let mut spec = create_vehicle(1);
    spec.priority = 3;
    spec.required_energy = 500.;
    spec.departure_time = 1.;

    // pressure factor saturates at 2
    assert_eq!(normalize_priority(&spec), 10.);
}

#[test]
fn can_keep_energy_within_required_bound() {
    let mut session = create_session(create_vehicle(1));
    session.assign(1, 0.);

    for _ in 0..100 {
        session.apply_charging(10., 50., 1., 0.25, 0.);
        assert!(session.energy_delivered <= session.spec.required_energy + f64::EPSILON);
        assert!(session.energy_delivered >= 0.);
    }

    assert_eq!(session.energy_delivered, 10.);
    assert_eq!(session.state, VehicleState::Completed);
}

#[test]
fn can_complete_zero_required_energy_on_first_tick() {
    let mut spec = create_vehicle(1);
    spec.required_energy = 0.;
    let mut session = create_session(spec);
    session.assign(1, 0.);

    let completed = session.apply_charging(10., 50., 1., 0.25, 0.);

    assert!(completed);
    assert_eq!(session.state, VehicleState::Completed);
    assert_eq!(session.energy_delivered, 0.);
    assert_eq!(session.completion_pct(), 100.);
}

#[test]
fn can_accrue_costs_per_step() {
    let mut session = create_session(create_vehicle(1));
    session.assign(1, 0.);

    session.apply_charging(10., 50., 0.9, 0.25, 2.);

    // energy: 10 kW * 0.25 h * 0.9 * 1.0
    assert!((session.energy_delivered - 2.25).abs() < 1e-9);
    // energy cost: 10 kW * 0.25 h * 50
    assert_eq!(session.energy_cost, 125.);
    // operation cost: 0.25 h * 2 per hour
    assert_eq!(session.operation_cost, 0.5);
    assert_eq!(session.total_cost(), 125.5);
}

#[test]
fn can_record_preemption_history() {
    let mut session = create_session(create_vehicle(1));

    session.assign(3, 0.5);
    assert_eq!(session.state, VehicleState::Charging);
    assert_eq!(session.assigned_charger, Some(3));
    assert_eq!(session.charge_start, Some(0.5));

    session.record_preemption(1.);

    assert_eq!(session.state, VehicleState::Waiting);
    assert!(session.assigned_charger.is_none());
    assert_eq!(session.preemptions, 1);
    assert_eq!(session.usage.len(), 1);
    assert!(session.usage[0].preempted);
    assert_eq!(session.usage[0].end, Some(1.));

    // a later assignment opens a fresh usage entry, charge start is kept
    session.assign(4, 1.5);
    assert_eq!(session.usage.len(), 2);
    assert_eq!(session.charge_start, Some(0.5));
}

#[test]
fn can_cap_completion_percentage() {
    let mut session = create_session(create_vehicle(1));
    session.energy_delivered = 8.;

    assert_eq!(session.completion_pct(), 80.);

    session.energy_delivered = 10.;
    assert_eq!(session.completion_pct(), 100.);
}

#[test]
fn can_report_timing_predicates() {
    let session = create_session(create_vehicle(1));

    assert!(session.has_arrived(0.));
    assert!(!session.is_due(1.9));
    assert!(session.is_due(2.));
    assert_eq!(session.time_left(1.5), 0.5);
    assert_eq!(session.time_left(3.), 0.);
    assert_eq!(session.wait_time(1.), 1.);
}
