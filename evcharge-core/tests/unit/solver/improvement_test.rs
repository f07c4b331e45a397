use super::*;
use crate::helpers::{create_charger, create_problem, create_vehicle};

#[test]
fn can_estimate_empty_assignment_as_zero() {
    let problem = create_problem(vec![create_vehicle(1)], vec![create_charger(1)]);

    assert_eq!(estimate_assignments(&problem, &[]), 0.);
}

#[test]
fn can_estimate_deliverable_energy_value_and_cost() {
    let problem = create_problem(vec![create_vehicle(1)], vec![create_charger(1)]);

    // deliverable 10 kWh, value 10 * (1 + 0.55), drawn 10 kWh at avg price 50
    let estimate = estimate_assignments(&problem, &[(1, 1)]);

    assert!((estimate - (0.5 * 15.5 - 500.)).abs() < 1e-9);
}

#[test]
fn can_keep_solution_when_nothing_to_improve() {
    let problem = Arc::new(create_problem(vec![create_vehicle(1)], vec![create_charger(1)]));

    let solution = Solution { total_cost: 10., delivered_value: 100., ..Solution::default() };
    let improved = improve_solution(&problem, solution.clone(), 5, 1);

    assert_eq!(improved.objective_value(), solution.objective_value());
}

#[test]
fn cannot_return_worse_solution() {
    let mut weak = create_charger(1);
    weak.power = 2.;
    let strong = create_charger(2);

    let mut vehicle = create_vehicle(1);
    vehicle.departure_time = 1.;

    let problem = Arc::new(create_problem(vec![vehicle], vec![weak, strong]));

    // force the initial schedule onto the weak charger
    let mut hints = FxHashMap::default();
    hints.insert(1u32, 1u32);
    let environment = Arc::new(Environment::new_with_seed(5));
    let config = SchedulerConfig { assignment_hints: hints, ..SchedulerConfig::default() };
    let initial =
        ConstructiveScheduler::with_config(problem.clone(), environment, Arc::new(NoopSink), config).run();

    let improved = improve_solution(&problem, initial.clone(), 5, 11);

    assert!(improved.objective_value() >= initial.objective_value());
}
