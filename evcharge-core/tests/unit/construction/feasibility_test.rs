use super::*;
use crate::helpers::{create_charger, create_problem, create_session, create_vehicle};
use crate::models::problem::GridConstraints;

#[test]
fn can_accept_feasible_pairing() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let session = create_session(create_vehicle(1));

    let outcome = check_feasibility(&session, &problem.station.chargers[0], 0., 0., &problem.station);

    assert!(outcome.is_feasible());
}

#[test]
fn can_reject_incompatible_first() {
    let problem = create_problem(vec![], vec![create_charger(1)]);

    let mut spec = create_vehicle(1);
    spec.brand = "Tesla ModelY".to_string();
    // departed as well: compatibility still decides, it is checked first
    let session = create_session(spec);

    let outcome = check_feasibility(&session, &problem.station.chargers[0], 5., 0., &problem.station);

    assert_eq!(outcome, Feasibility::Incompatible);
}

#[test]
fn can_reject_departed_vehicle() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let session = create_session(create_vehicle(1));

    let outcome = check_feasibility(&session, &problem.station.chargers[0], 2., 0., &problem.station);

    assert_eq!(outcome, Feasibility::AlreadyDeparted);
}

#[test]
fn can_reject_transformer_overload_with_numeric_overage() {
    let mut problem = create_problem(vec![], vec![create_charger(1)]);
    problem.station.transformer_limit = 15.;

    let session = create_session(create_vehicle(1));

    let outcome = check_feasibility(&session, &problem.station.chargers[0], 0., 8., &problem.station);

    assert_eq!(outcome, Feasibility::TransformerLimitExceeded { load: 8., added: 10., limit: 15. });
}

#[test]
fn can_reject_grid_phase_overload() {
    let mut problem = create_problem(vec![], vec![create_charger(1)]);
    problem.station.grid_constraints = Some(GridConstraints {
        max_power_per_phase: 4.,
        voltage_drop_limit: 0.05,
        power_factor_limit: 0.9,
        system_efficiency: None,
    });

    let session = create_session(create_vehicle(1));

    let outcome = check_feasibility(&session, &problem.station.chargers[0], 0., 5., &problem.station);

    assert_eq!(outcome, Feasibility::GridPhaseLimitExceeded { per_phase: 5., limit: 4. });
}

#[test]
fn can_check_transformer_before_grid() {
    let mut problem = create_problem(vec![], vec![create_charger(1)]);
    problem.station.transformer_limit = 5.;
    problem.station.grid_constraints = Some(GridConstraints {
        max_power_per_phase: 1.,
        voltage_drop_limit: 0.05,
        power_factor_limit: 0.9,
        system_efficiency: None,
    });

    let session = create_session(create_vehicle(1));

    let outcome = check_feasibility(&session, &problem.station.chargers[0], 0., 0., &problem.station);

    assert!(matches!(outcome, Feasibility::TransformerLimitExceeded { .. }));
}

#[test]
fn can_render_rejection_reasons() {
    assert_eq!(Feasibility::Incompatible.to_string(), "vehicle incompatible with charger");
    assert_eq!(Feasibility::NoTimeLeft.to_string(), "no time left before departure");
    assert!(Feasibility::TransformerLimitExceeded { load: 8., added: 10., limit: 15. }
        .to_string()
        .contains("8.0 + 10.0 > 15.0"));
}
