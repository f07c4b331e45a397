use super::*;
use crate::helpers::{create_charger, create_problem, create_session, create_vehicle};
use evcharge_search::prelude::DefaultRandom;

fn ranking_context(problem: &crate::models::problem::Problem) -> RankingContext<'_> {
    RankingContext { station: &problem.station, time: 0., current_price: 50., avg_price: 50. }
}

#[test]
fn can_order_edf_by_departure_then_arrival() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let random = DefaultRandom::new_with_seed(1);

    let mut early = create_vehicle(1);
    early.departure_time = 1.;
    let mut late = create_vehicle(2);
    late.departure_time = 2.;

    let sessions = vec![create_session(late), create_session(early)];

    let ordered = Heuristic::Edf.rank(&sessions, &[0, 1], &ranking_context(&problem), &random);

    // the earlier deadline always goes first, regardless of input order
    assert_eq!(ordered, vec![1, 0]);
}

#[test]
fn can_break_edf_ties_by_arrival() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let random = DefaultRandom::new_with_seed(1);

    let mut first = create_vehicle(1);
    first.arrival_time = 0.5;
    let mut second = create_vehicle(2);
    second.arrival_time = 0.;

    let sessions = vec![create_session(first), create_session(second)];

    let ordered = Heuristic::Edf.rank(&sessions, &[0, 1], &ranking_context(&problem), &random);

    assert_eq!(ordered, vec![1, 0]);
}

#[test]
fn can_order_fairness_by_completion() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let random = DefaultRandom::new_with_seed(1);

    let mut ahead = create_session(create_vehicle(1));
    ahead.energy_delivered = 8.;
    let behind = create_session(create_vehicle(2));

    let sessions = vec![ahead, behind];

    let ordered = Heuristic::Fairness.rank(&sessions, &[0, 1], &ranking_context(&problem), &random);

    assert_eq!(ordered, vec![1, 0]);
}

#[test]
fn can_order_sjf_by_estimated_charge_time() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let random = DefaultRandom::new_with_seed(1);

    let mut big = create_vehicle(1);
    big.required_energy = 30.;
    let small = create_vehicle(2);

    let sessions = vec![create_session(big), create_session(small)];

    let ordered = Heuristic::Sjf.rank(&sessions, &[0, 1], &ranking_context(&problem), &random);

    assert_eq!(ordered, vec![1, 0]);
}

#[test]
fn can_prefer_urgent_vehicles_in_priority_order() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let random = DefaultRandom::new_with_seed(1);

    let mut urgent = create_vehicle(1);
    urgent.departure_time = 1.05;
    let mut relaxed = create_vehicle(2);
    relaxed.departure_time = 12.;

    let sessions = vec![create_session(relaxed), create_session(urgent)];

    let ordered = Heuristic::HighestPriority.rank(&sessions, &[0, 1], &ranking_context(&problem), &random);

    assert_eq!(ordered, vec![1, 0]);
}

#[test]
fn can_order_price_reactive_by_urgency() {
    let problem = create_problem(vec![], vec![create_charger(1)]);
    let random = DefaultRandom::new_with_seed(1);

    // almost done charging: close to zero urgency
    let mut almost_done = create_session(create_vehicle(1));
    almost_done.energy_delivered = 9.9;
    let needy = create_session(create_vehicle(2));

    let sessions = vec![almost_done, needy];

    let mut ctx = ranking_context(&problem);
    ctx.current_price = 30.;

    let ordered = Heuristic::PriceReactive.rank(&sessions, &[0, 1], &ctx, &random);

    assert_eq!(ordered, vec![1, 0]);
}

#[test]
fn can_shuffle_exploration_reproducibly() {
    let problem = create_problem(vec![], vec![create_charger(1)]);

    let sessions: Vec<_> = (0..8).map(|id| create_session(create_vehicle(id))).collect();
    let waiting: Vec<usize> = (0..8).collect();

    let first =
        Heuristic::Exploration.rank(&sessions, &waiting, &ranking_context(&problem), &DefaultRandom::new_with_seed(7));
    let second =
        Heuristic::Exploration.rank(&sessions, &waiting, &ranking_context(&problem), &DefaultRandom::new_with_seed(7));

    assert_eq!(first, second);

    let mut sorted = first.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, waiting);
}

#[test]
fn can_build_candidate_consuming_chargers() {
    let problem = create_problem(vec![], vec![create_charger(1), create_charger(2)]);

    let sessions = vec![create_session(create_vehicle(1)), create_session(create_vehicle(2))];
    let free = vec![1, 2];
    let hints = rustc_hash::FxHashMap::default();

    let candidate =
        build_candidate(Heuristic::Edf, &sessions, &[0, 1], &free, &ranking_context(&problem), &hints);

    assert_eq!(candidate.pairs.len(), 2);
    assert_ne!(candidate.pairs[0].1, candidate.pairs[1].1);
}

#[test]
fn can_prefer_hinted_charger() {
    let mut weak = create_charger(1);
    weak.power = 3.;
    let strong = create_charger(2);
    let problem = create_problem(vec![], vec![weak, strong]);

    let sessions = vec![create_session(create_vehicle(1))];
    let free = vec![1, 2];

    let mut hints = rustc_hash::FxHashMap::default();
    hints.insert(1, 1);

    let candidate =
        build_candidate(Heuristic::Edf, &sessions, &[0], &free, &ranking_context(&problem), &hints);

    // scoring would pick charger 2, the hint forces charger 1
    assert_eq!(candidate.pairs, vec![(1, 1)]);
}

#[test]
fn can_ignore_hint_for_incompatible_charger() {
    let mut foreign = create_charger(1);
    foreign.compatible_brands = vec!["Tesla ModelY".to_string()];
    let problem = create_problem(vec![], vec![foreign, create_charger(2)]);

    let sessions = vec![create_session(create_vehicle(1))];
    let free = vec![1, 2];

    let mut hints = rustc_hash::FxHashMap::default();
    hints.insert(1, 1);

    let candidate =
        build_candidate(Heuristic::Edf, &sessions, &[0], &free, &ranking_context(&problem), &hints);

    assert_eq!(candidate.pairs, vec![(1, 2)]);
}

#[test]
fn can_only_improve_score_in_local_search() {
    let mut slow = create_charger(1);
    slow.power = 3.;
    let fast = create_charger(2);
    let problem = create_problem(vec![], vec![slow, fast]);

    // the urgent vehicle starts on the slow charger
    let mut urgent = create_vehicle(1);
    urgent.departure_time = 0.5;
    urgent.required_energy = 5.;
    let mut relaxed = create_vehicle(2);
    relaxed.departure_time = 12.;

    let sessions = vec![create_session(urgent), create_session(relaxed)];
    let ctx = ranking_context(&problem);

    let mut candidate =
        CandidateAssignment { heuristic: Heuristic::LocalSearch, pairs: vec![(1, 1), (2, 2)], score: 0. };

    let before = evaluate_candidate(&candidate.pairs, &sessions, ctx.station, ctx.current_price, ctx.time);
    local_search_exchange(&mut candidate, &sessions, &ctx);
    let after = evaluate_candidate(&candidate.pairs, &sessions, ctx.station, ctx.current_price, ctx.time);

    assert!(after >= before);
}

#[test]
fn can_name_all_heuristics() {
    assert_eq!(Heuristic::Edf.name(), "EDF");
    assert_eq!(Heuristic::HighestPriority.name(), "HighestPriority");
    assert_eq!(Heuristic::Fairness.name(), "Fairness");
    assert_eq!(Heuristic::Sjf.name(), "SJF");
    assert_eq!(Heuristic::PriceReactive.name(), "PriceReactive");
    assert_eq!(Heuristic::LocalSearch.name(), "LocalSearch");
    assert_eq!(Heuristic::Exploration.name(), "Exploration");
    assert_eq!(Heuristic::deterministic().len(), 6);
}
