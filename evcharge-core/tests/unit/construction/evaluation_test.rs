use super::*;
use crate::helpers::{create_charger, create_problem, create_session, create_vehicle};

#[test]
fn can_score_empty_candidate_as_zero() {
    let problem = create_problem(vec![], vec![create_charger(1)]);

    assert_eq!(evaluate_candidate(&[], &[], &problem.station, 50., 0.), 0.);
}

#[test]
fn can_combine_weighted_components() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let sessions = vec![create_session(create_vehicle(1))];

    let score = evaluate_candidate(&[(1, 1)], &sessions, &problem.station, 50., 0.);

    // energy estimate: min(10 kW * 2 h, 10 kWh) = 10 kWh
    // cost: 10 * 50 = 500, value: 10 * (1 + 0.1 * 5.5) = 15.5
    // fairness: 100 / (1 + 0), efficiency: 1.0
    // -1.0 * 500 + 1.5 * 15.5 + 0.8 * 100 + 1.0 * 1.0
    assert!((score - (-395.75)).abs() < 1e-9);
}

#[test]
fn can_cap_energy_estimate_at_required() {
    let problem = create_problem(vec![], vec![create_charger(1)]);

    let mut short_stay = create_vehicle(1);
    short_stay.departure_time = 0.5;
    let sessions = vec![create_session(short_stay)];

    // only 5 kWh fit into the remaining 0.5 h window, normalized priority is 5 + 2 = 7
    let score = evaluate_candidate(&[(1, 1)], &sessions, &problem.station, 50., 0.);
    let expected = -1.0 * (5. * 50.) + 1.5 * (5. * (1. + 0.1 * 7.)) + 0.8 * 100. + 1.0;

    assert!((score - expected).abs() < 1e-9);
}

#[test]
fn can_reward_lower_charge_variance() {
    let problem = create_problem(vec![], vec![create_charger(1), create_charger(2)]);

    let mut even_a = create_session(create_vehicle(1));
    let mut even_b = create_session(create_vehicle(2));
    even_a.energy_delivered = 5.;
    even_b.energy_delivered = 5.;

    let mut skewed_a = create_session(create_vehicle(1));
    let mut skewed_b = create_session(create_vehicle(2));
    skewed_a.energy_delivered = 9.;
    skewed_b.energy_delivered = 1.;

    let pairs = [(1, 1), (2, 2)];
    let even = evaluate_candidate(&pairs, &[even_a, even_b], &problem.station, 50., 0.);
    let skewed = evaluate_candidate(&pairs, &[skewed_a, skewed_b], &problem.station, 50., 0.);

    assert!(even > skewed);
}
