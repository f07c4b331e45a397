//! Seven interchangeable vehicle ranking strategies. Each heuristic maps the waiting set
//! to a fully ordered sequence; candidate construction then greedily pairs every ranked
//! vehicle with its best compatible free charger.

#[cfg(test)]
#[path = "../../../tests/unit/construction/heuristics_test.rs"]
mod heuristics_test;

use crate::construction::compatibility::{best_charger, is_compatible};
use crate::construction::evaluation::evaluate_candidate;
use crate::models::problem::{ChargerId, StationConfig, VehicleId};
use crate::models::solution::VehicleSession;
use evcharge_search::prelude::{compare_floats, Float, Random};
use rand::seq::SliceRandom;
use rustc_hash::FxHashMap;

/// Probability of generating the exploratory shuffled candidate per iteration.
pub const DEFAULT_EXPLORATION_PROBABILITY: Float = 0.1;

/// Maximum amount of exchange rounds of the local search heuristic.
const LOCAL_SEARCH_ROUNDS: usize = 10;

/// A closed set of vehicle ranking strategies competing each scheduler iteration.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Heuristic {
    /// Earliest deadline first.
    Edf,
    /// Multifactor priority score.
    HighestPriority,
    /// Least complete vehicles first.
    Fairness,
    /// Shortest estimated full-charge time first.
    Sjf,
    /// Urgency scaled by the current price advantage.
    PriceReactive,
    /// Priority order refined by bounded pairwise charger exchange.
    LocalSearch,
    /// Uniformly shuffled order, generated with low probability.
    Exploration,
}

impl Heuristic {
    /// Returns a stable heuristic name.
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Edf => "EDF",
            Heuristic::HighestPriority => "HighestPriority",
            Heuristic::Fairness => "Fairness",
            Heuristic::Sjf => "SJF",
            Heuristic::PriceReactive => "PriceReactive",
            Heuristic::LocalSearch => "LocalSearch",
            Heuristic::Exploration => "Exploration",
        }
    }

    /// Returns the heuristics generated on every iteration, in generation order.
    pub fn deterministic() -> [Heuristic; 6] {
        [
            Heuristic::Edf,
            Heuristic::HighestPriority,
            Heuristic::Fairness,
            Heuristic::Sjf,
            Heuristic::PriceReactive,
            Heuristic::LocalSearch,
        ]
    }

    /// Orders the waiting set (given as indices into `sessions`) according to this
    /// heuristic's ranking key.
    pub fn rank(
        &self,
        sessions: &[VehicleSession],
        waiting: &[usize],
        ctx: &RankingContext<'_>,
        random: &dyn Random,
    ) -> Vec<usize> {
        let mut ordered = waiting.to_vec();

        match self {
            Heuristic::Edf => {
                ordered.sort_by(|&a, &b| {
                    let (a, b) = (&sessions[a].spec, &sessions[b].spec);
                    compare_floats(a.departure_time, b.departure_time)
                        .then_with(|| compare_floats(a.arrival_time, b.arrival_time))
                });
            }
            Heuristic::HighestPriority | Heuristic::LocalSearch => {
                ordered.sort_by(|&a, &b| {
                    compare_floats(priority_score(&sessions[b], ctx), priority_score(&sessions[a], ctx))
                });
            }
            Heuristic::Fairness => {
                ordered.sort_by(|&a, &b| {
                    compare_floats(sessions[a].completion_pct(), sessions[b].completion_pct())
                });
            }
            Heuristic::Sjf => {
                ordered.sort_by(|&a, &b| {
                    compare_floats(
                        estimate_full_charge_time(&sessions[a], ctx.station),
                        estimate_full_charge_time(&sessions[b], ctx.station),
                    )
                });
            }
            Heuristic::PriceReactive => {
                let advantage = ((ctx.avg_price - ctx.current_price) / ctx.avg_price).max(0.);
                ordered.sort_by(|&a, &b| {
                    compare_floats(
                        price_reactive_score(&sessions[b], advantage, ctx.time),
                        price_reactive_score(&sessions[a], advantage, ctx.time),
                    )
                });
            }
            Heuristic::Exploration => {
                ordered.shuffle(&mut random.get_rng());
            }
        }

        ordered
    }
}

/// Shared inputs of the ranking keys.
pub struct RankingContext<'a> {
    /// Station configuration.
    pub station: &'a StationConfig,
    /// Current simulation time.
    pub time: Float,
    /// Energy price at the current time.
    pub current_price: Float,
    /// Average price over the whole curve.
    pub avg_price: Float,
}

/// A candidate assignment produced by one heuristic within one scheduler iteration:
/// an ordered mapping of vehicles to chargers with unique vehicle keys, plus the
/// multi-objective evaluation score assigned during selection.
#[derive(Clone, Debug)]
pub struct CandidateAssignment {
    /// The heuristic which produced the candidate.
    pub heuristic: Heuristic,
    /// Ordered vehicle to charger pairs.
    pub pairs: Vec<(VehicleId, ChargerId)>,
    /// Multi-objective evaluation score.
    pub score: Float,
}

/// Builds a candidate by greedily pairing ranked vehicles with their best compatible free
/// charger, consuming chargers as they get picked. A hinted charger wins the pick when it
/// is still free and compatible.
pub fn build_candidate(
    heuristic: Heuristic,
    sessions: &[VehicleSession],
    ordered: &[usize],
    free_chargers: &[ChargerId],
    ctx: &RankingContext<'_>,
    hints: &FxHashMap<VehicleId, ChargerId>,
) -> CandidateAssignment {
    let mut remaining: Vec<ChargerId> = free_chargers.to_vec();
    let mut pairs = Vec::new();

    let count = ordered.len().min(free_chargers.len());

    for &session_idx in ordered.iter().take(count) {
        let session = &sessions[session_idx];

        let hinted = hints.get(&session.spec.id).copied().filter(|id| {
            remaining.contains(id)
                && ctx.station.charger(*id).is_some_and(|charger| is_compatible(&session.spec, charger))
        });

        let picked = hinted.or_else(|| {
            best_charger(&session.spec, remaining.iter().filter_map(|&id| ctx.station.charger(id)))
        });

        if let Some(charger_id) = picked {
            pairs.push((session.spec.id, charger_id));
            remaining.retain(|&id| id != charger_id);
        }
    }

    CandidateAssignment { heuristic, pairs, score: 0. }
}

/// Refines a candidate with bounded pairwise charger exchange, accepting only swaps which
/// improve the candidate evaluation score and keep both pairings brand compatible.
pub fn local_search_exchange(candidate: &mut CandidateAssignment, sessions: &[VehicleSession], ctx: &RankingContext<'_>) {
    let mut best_score = evaluate_candidate(&candidate.pairs, sessions, ctx.station, ctx.current_price, ctx.time);

    for _ in 0..LOCAL_SEARCH_ROUNDS {
        let mut improved = false;

        for i in 0..candidate.pairs.len() {
            for j in (i + 1)..candidate.pairs.len() {
                let (vehicle_i, charger_i) = candidate.pairs[i];
                let (vehicle_j, charger_j) = candidate.pairs[j];

                let compatible = [(vehicle_i, charger_j), (vehicle_j, charger_i)].iter().all(|&(vehicle, charger)| {
                    sessions
                        .iter()
                        .find(|session| session.spec.id == vehicle)
                        .zip(ctx.station.charger(charger))
                        .is_some_and(|(session, charger)| is_compatible(&session.spec, charger))
                });
                if !compatible {
                    continue;
                }

                let mut swapped = candidate.pairs.clone();
                swapped[i] = (vehicle_i, charger_j);
                swapped[j] = (vehicle_j, charger_i);

                let score = evaluate_candidate(&swapped, sessions, ctx.station, ctx.current_price, ctx.time);
                if score > best_score {
                    candidate.pairs = swapped;
                    best_score = score;
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }
}

/// Multifactor priority: temporal urgency, normalized energy need, willingness to pay,
/// priority class and accumulated waiting time.
fn priority_score(session: &VehicleSession, ctx: &RankingContext<'_>) -> Float {
    let spec = &session.spec;

    let time_left = session.time_left(ctx.time);
    let urgency = if time_left > 0. { 1. / time_left } else { 10. };
    let energy_norm = session.remaining_energy() / spec.battery_capacity;
    let priority = 4. - Float::from(spec.priority);
    let wait_penalty = session.wait_time(ctx.time) * 0.1;

    urgency * 0.3 + energy_norm * 0.2 + spec.willingness_to_pay * 0.2 + priority * 0.2 + wait_penalty * 0.1
}

/// Estimates the time to a full charge on the fastest compatible charger of the station.
/// Returns infinity when no charger is compatible.
fn estimate_full_charge_time(session: &VehicleSession, station: &StationConfig) -> Float {
    let fastest = station
        .chargers
        .iter()
        .filter(|charger| is_compatible(&session.spec, charger))
        .map(|charger| charger.power)
        .fold(0., Float::max);

    if fastest == 0. {
        return Float::INFINITY;
    }

    session.remaining_energy() / fastest.min(session.spec.max_charge_rate)
}

/// Charging urgency scaled by how attractive the current price is to this customer.
fn price_reactive_score(session: &VehicleSession, price_advantage: Float, time: Float) -> Float {
    let urgency = charging_urgency(session, time);

    urgency * (1. + price_advantage * session.spec.willingness_to_pay)
}

/// Ratio of the minimum required charging time to the time left, capped at 10.
fn charging_urgency(session: &VehicleSession, time: Float) -> Float {
    let time_left = session.time_left(time);
    let min_time_needed = session.remaining_energy() / session.spec.max_charge_rate;

    if time_left == 0. {
        return 100.;
    }
    if min_time_needed == 0. {
        return 0.;
    }

    (min_time_needed / time_left).min(10.)
}
