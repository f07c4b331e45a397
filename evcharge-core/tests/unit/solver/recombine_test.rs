use super::*;
use crate::helpers::{create_session, create_vehicle};

fn create_parent(
    objective: Float,
    assignments: &[(VehicleId, ChargerId)],
    delivered: &[(VehicleId, Float)],
) -> Solution {
    let mut solution = Solution {
        // objective_value() = 0.5 * delivered_value, total cost stays zero
        delivered_value: objective * 2.,
        ..Solution::default()
    };

    for &(vehicle, charger) in assignments {
        solution.assignments.insert(vehicle, charger);
    }

    for &(vehicle, energy) in delivered {
        let mut session = create_session(create_vehicle(vehicle));
        session.energy_delivered = energy;
        solution.sessions.push(session);
    }

    solution
}

#[test]
fn can_union_disjoint_assignments() {
    let a = create_parent(10., &[(1, 1)], &[(1, 5.)]);
    let b = create_parent(10., &[(2, 2)], &[(2, 5.)]);

    let merged = merge_assignments(&a, &b);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged.get(&1), Some(&1));
    assert_eq!(merged.get(&2), Some(&2));
}

#[test]
fn can_prefer_parent_with_more_delivered_energy_per_vehicle() {
    // both parents assign vehicle 1, parent b delivered more energy to it
    let a = create_parent(100., &[(1, 1)], &[(1, 2.)]);
    let b = create_parent(10., &[(1, 2)], &[(1, 8.)]);

    let merged = merge_assignments(&a, &b);

    assert_eq!(merged.get(&1), Some(&2));
}

#[test]
fn can_resolve_charger_conflict_by_parent_objective() {
    // vehicle 1 (from the stronger parent a) and vehicle 2 (from b) claim charger 5
    let a = create_parent(100., &[(1, 5)], &[(1, 5.)]);
    let b = create_parent(10., &[(2, 5)], &[(2, 5.)]);

    let merged = merge_assignments(&a, &b);

    assert_eq!(merged.len(), 1);
    assert_eq!(merged.get(&1), Some(&5));
    assert_eq!(merged.get(&2), None);
}

#[test]
fn can_merge_empty_parents() {
    let a = create_parent(0., &[], &[]);
    let b = create_parent(0., &[], &[]);

    assert!(merge_assignments(&a, &b).is_empty());
}
