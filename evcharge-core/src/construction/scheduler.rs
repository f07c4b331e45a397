#[cfg(test)]
#[path = "../../tests/unit/construction/scheduler_test.rs"]
mod scheduler_test;

use crate::construction::evaluation::{evaluate_candidate, PRIORITY_BONUS_RATE};
use crate::construction::feasibility::check_feasibility;
use crate::construction::heuristics::{
    build_candidate, local_search_exchange, CandidateAssignment, Heuristic, RankingContext,
    DEFAULT_EXPLORATION_PROBABILITY,
};
use crate::models::problem::{ChargerId, PriceBook, Problem, VehicleId};
use crate::models::solution::{Solution, VehicleSession, VehicleState};
use crate::telemetry::{Event, EventSink};
use evcharge_search::prelude::{get_mean_slice, Environment, Float, Timer};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Tunables of a single constructive run.
pub struct SchedulerConfig {
    /// Probability of generating the exploratory candidate per iteration.
    pub exploration_probability: Float,
    /// Preferred vehicle to charger picks, consulted before charger scoring. Used by the
    /// optimizer to rerun the scheduler under recombined parent assignments.
    pub assignment_hints: FxHashMap<VehicleId, ChargerId>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { exploration_probability: DEFAULT_EXPLORATION_PROBABILITY, assignment_hints: FxHashMap::default() }
    }
}

/// A discrete time scheduler which repeatedly generates competing candidate assignments,
/// applies the best scored one under hard feasibility constraints, simulates incremental
/// charging and enforces the transformer limit via preemption.
pub struct ConstructiveScheduler {
    problem: Arc<Problem>,
    environment: Arc<Environment>,
    sink: Arc<dyn EventSink>,
    config: SchedulerConfig,
    prices: PriceBook,
    sessions: Vec<VehicleSession>,
    available: FxHashMap<ChargerId, bool>,
    sim_time: Float,
    heuristic_usage: FxHashMap<&'static str, usize>,
}

impl ConstructiveScheduler {
    /// Creates a new instance of `ConstructiveScheduler` with default configuration.
    pub fn new(problem: Arc<Problem>, environment: Arc<Environment>, sink: Arc<dyn EventSink>) -> Self {
        Self::with_config(problem, environment, sink, SchedulerConfig::default())
    }

    /// Creates a new instance of `ConstructiveScheduler` with the given configuration.
    pub fn with_config(
        problem: Arc<Problem>,
        environment: Arc<Environment>,
        sink: Arc<dyn EventSink>,
        config: SchedulerConfig,
    ) -> Self {
        let prices = problem.price_book();
        let sessions =
            problem.arrivals.iter().map(|arrival| VehicleSession::new(Arc::new(arrival.clone()))).collect();
        let available = problem.station.chargers.iter().map(|charger| (charger.id, true)).collect();

        Self {
            problem,
            environment,
            sink,
            config,
            prices,
            sessions,
            available,
            sim_time: 0.,
            heuristic_usage: Heuristic::deterministic()
                .iter()
                .map(|heuristic| heuristic.name())
                .chain(std::iter::once(Heuristic::Exploration.name()))
                .map(|name| (name, 0))
                .collect(),
        }
    }

    /// Runs the simulation until every vehicle is completed or withdrawn and returns the
    /// aggregate solution.
    pub fn run(mut self) -> Solution {
        let timer = Timer::start();

        while !self.all_processed() {
            let waiting = self.waiting_set();
            let free_chargers = self.free_chargers();

            self.sink.notify(&Event::IterationStarted {
                time: self.sim_time,
                waiting: waiting.len(),
                free_chargers: free_chargers.len(),
            });

            if !waiting.is_empty() && !free_chargers.is_empty() {
                let candidates = self.generate_candidates(&waiting, &free_chargers);

                if let Some(best) = select_best(candidates) {
                    *self.heuristic_usage.entry(best.heuristic.name()).or_insert(0) += 1;

                    self.sink.notify(&Event::CandidateSelected {
                        time: self.sim_time,
                        heuristic: best.heuristic.name(),
                        assigned: best.pairs.len(),
                        score: best.score,
                    });

                    self.apply_assignment(&best);
                }
            }

            self.advance_time();
        }

        self.finalize(timer.elapsed_millis())
    }

    fn all_processed(&self) -> bool {
        self.sessions.iter().all(VehicleSession::is_terminal)
    }

    fn waiting_set(&self) -> Vec<usize> {
        self.sessions
            .iter()
            .enumerate()
            .filter(|(_, session)| {
                session.has_arrived(self.sim_time)
                    && session.state == VehicleState::Waiting
                    && !session.is_due(self.sim_time)
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn free_chargers(&self) -> Vec<ChargerId> {
        self.problem
            .station
            .chargers
            .iter()
            .filter(|charger| self.available.get(&charger.id).copied().unwrap_or(false))
            .map(|charger| charger.id)
            .collect()
    }

    fn ranking_context(&self) -> RankingContext<'_> {
        RankingContext {
            station: &self.problem.station,
            time: self.sim_time,
            current_price: self.prices.price_at(self.sim_time),
            avg_price: self.prices.average(),
        }
    }

    fn generate_candidates(&self, waiting: &[usize], free_chargers: &[ChargerId]) -> Vec<CandidateAssignment> {
        let ctx = self.ranking_context();
        let random = self.environment.random.as_ref();

        let mut candidates: Vec<CandidateAssignment> = Heuristic::deterministic()
            .iter()
            .map(|&heuristic| {
                let ordered = heuristic.rank(&self.sessions, waiting, &ctx, random);
                let mut candidate = build_candidate(
                    heuristic,
                    &self.sessions,
                    &ordered,
                    free_chargers,
                    &ctx,
                    &self.config.assignment_hints,
                );

                if heuristic == Heuristic::LocalSearch {
                    local_search_exchange(&mut candidate, &self.sessions, &ctx);
                }

                candidate
            })
            .collect();

        if random.is_hit(self.config.exploration_probability) {
            let ordered = Heuristic::Exploration.rank(&self.sessions, waiting, &ctx, random);
            candidates.push(build_candidate(
                Heuristic::Exploration,
                &self.sessions,
                &ordered,
                free_chargers,
                &ctx,
                &self.config.assignment_hints,
            ));
        }

        for candidate in candidates.iter_mut() {
            candidate.score =
                evaluate_candidate(&candidate.pairs, &self.sessions, &self.problem.station, ctx.current_price, ctx.time);
        }

        candidates
    }

    fn apply_assignment(&mut self, candidate: &CandidateAssignment) {
        for &(vehicle_id, charger_id) in candidate.pairs.iter() {
            let session_idx = match self.sessions.iter().position(|session| session.spec.id == vehicle_id) {
                Some(idx) => idx,
                None => continue,
            };
            let charger = match self.problem.station.charger(charger_id) {
                Some(charger) => charger.clone(),
                None => continue,
            };

            let current_load = self.charging_load();
            let outcome =
                check_feasibility(&self.sessions[session_idx], &charger, self.sim_time, current_load, &self.problem.station);

            if outcome.is_feasible() {
                self.sessions[session_idx].assign(charger_id, self.sim_time);
                self.available.insert(charger_id, false);

                self.sink.notify(&Event::VehicleAssigned { time: self.sim_time, vehicle_id, charger_id });
            } else {
                self.sink.notify(&Event::AssignmentRejected {
                    time: self.sim_time,
                    vehicle_id,
                    charger_id,
                    reason: outcome.to_string(),
                });
            }
        }
    }

    fn advance_time(&mut self) {
        self.sim_time += self.problem.station.time_resolution;

        self.simulate_charging();
        self.process_departures();
        self.enforce_transformer_limit();
        self.report_grid_constraints();
        self.sample_state();
    }

    fn simulate_charging(&mut self) {
        let price = self.prices.price_at(self.sim_time);
        let time_resolution = self.problem.station.time_resolution;

        for idx in 0..self.sessions.len() {
            if self.sessions[idx].state != VehicleState::Charging {
                continue;
            }

            let charger = match self.sessions[idx].assigned_charger.and_then(|id| self.problem.station.charger(id)) {
                Some(charger) => charger.clone(),
                None => continue,
            };

            let power = charger.effective_power(self.sessions[idx].spec.max_charge_rate);
            let completed = self.sessions[idx].apply_charging(
                power,
                price,
                charger.efficiency,
                time_resolution,
                charger.operation_cost_per_hour,
            );

            if completed {
                let session = &mut self.sessions[idx];
                session.close_usage(self.sim_time);
                session.charge_end = Some(self.sim_time);
                session.assigned_charger = None;
                self.available.insert(charger.id, true);

                self.sink.notify(&Event::ChargingCompleted {
                    time: self.sim_time,
                    vehicle_id: self.sessions[idx].spec.id,
                    energy_delivered: self.sessions[idx].energy_delivered,
                });
            }
        }
    }

    fn process_departures(&mut self) {
        for idx in 0..self.sessions.len() {
            let session = &self.sessions[idx];
            if session.is_terminal() || !session.is_due(self.sim_time) {
                continue;
            }

            let vehicle_id = session.spec.id;
            let completion_pct = session.completion_pct();
            let released_charger = session.assigned_charger;

            let session = &mut self.sessions[idx];
            if let Some(charger_id) = released_charger {
                self.available.insert(charger_id, true);
                session.assigned_charger = None;
            }
            session.close_usage(self.sim_time);
            if session.charge_start.is_some() && session.charge_end.is_none() {
                session.charge_end = Some(self.sim_time);
            }
            session.state = VehicleState::Withdrawn;

            self.sink.notify(&Event::VehicleDeparted { time: self.sim_time, vehicle_id, completion_pct });
        }
    }

    fn enforce_transformer_limit(&mut self) {
        let limit = self.problem.station.transformer_limit;
        let load = self.charging_load();
        let violation = load > limit;

        self.sink.notify(&Event::TransformerCheck { time: self.sim_time, load, limit, violation });

        if !violation {
            return;
        }

        let excess = load - limit;

        // lowest importance surfaces first
        let mut charging: Vec<usize> = (0..self.sessions.len())
            .filter(|&idx| self.sessions[idx].state == VehicleState::Charging)
            .collect();
        charging.sort_by(|&a, &b| self.sessions[b].spec.priority.cmp(&self.sessions[a].spec.priority));

        let mut released = 0.;
        for idx in charging {
            if released >= excess {
                break;
            }
            if self.sessions[idx].spec.priority != 3 {
                continue;
            }

            let charger_id = match self.sessions[idx].assigned_charger {
                Some(id) => id,
                None => continue,
            };
            let power = self
                .problem
                .station
                .charger(charger_id)
                .map_or(0., |charger| charger.effective_power(self.sessions[idx].spec.max_charge_rate));

            self.sessions[idx].record_preemption(self.sim_time);
            self.available.insert(charger_id, true);
            released += power;

            self.sink.notify(&Event::VehiclePreempted {
                time: self.sim_time,
                vehicle_id: self.sessions[idx].spec.id,
                charger_id,
                released_power: power,
            });
        }

        let remaining = self.charging_load() - limit;
        if remaining > 0. {
            self.sink.notify(&Event::TransformerOverload { time: self.sim_time, excess: remaining });
        }
    }

    fn report_grid_constraints(&self) {
        if self.problem.station.grid_constraints.is_none() {
            return;
        }

        let load = self.charging_load();
        // simplified balanced three-phase model
        let per_phase_load = load / 3.;
        let voltage_drop = per_phase_load * 0.001;
        let power_factor = (1. - load * 0.0001).max(0.85);

        self.sink.notify(&Event::GridReport { time: self.sim_time, per_phase_load, voltage_drop, power_factor });
    }

    fn sample_state(&self) {
        let occupied_chargers = self.available.values().filter(|&&free| !free).count();
        let charging = self.sessions.iter().filter(|session| session.state == VehicleState::Charging).count();
        let waiting = self.sessions.iter().filter(|session| session.state == VehicleState::Waiting).count();
        let completed = self.sessions.iter().filter(|session| session.state == VehicleState::Completed).count();
        let energy_delivered: Float = self.sessions.iter().map(|session| session.energy_delivered).sum();

        self.sink.notify(&Event::TimeSample {
            time: self.sim_time,
            load: self.charging_load(),
            occupied_chargers,
            charging,
            waiting,
            completed,
            energy_delivered,
        });
    }

    fn charging_load(&self) -> Float {
        self.sessions
            .iter()
            .filter(|session| session.state == VehicleState::Charging)
            .filter_map(|session| {
                session
                    .assigned_charger
                    .and_then(|id| self.problem.station.charger(id))
                    .map(|charger| charger.effective_power(session.spec.max_charge_rate))
            })
            .sum()
    }

    fn finalize(self, runtime_ms: u128) -> Solution {
        let mut solution = Solution {
            energy_required: self.sessions.iter().map(|session| session.spec.required_energy).sum(),
            heuristic_usage: self.heuristic_usage,
            runtime_ms,
            ..Solution::default()
        };

        let mut priority_bonus = 0.;
        let mut completion_total = 0.;

        for session in self.sessions.iter() {
            if !session.was_served() {
                continue;
            }

            solution.vehicles_served += 1;
            solution.total_cost += session.total_cost();
            solution.energy_cost += session.energy_cost;
            solution.energy_delivered += session.energy_delivered;
            priority_bonus += PRIORITY_BONUS_RATE * session.normalized_priority * session.energy_delivered;
            completion_total += session.completion_pct();

            if session.state == VehicleState::Completed {
                solution.vehicles_completed += 1;
            }

            if let Some(usage) = session.usage.last() {
                solution.assignments.insert(session.spec.id, usage.charger_id);
            }
        }

        solution.delivered_value = solution.energy_delivered + priority_bonus;
        solution.delivered_pct = if solution.energy_required > 0. {
            solution.energy_delivered / solution.energy_required * 100.
        } else {
            0.
        };
        solution.avg_completion_pct =
            if solution.vehicles_served > 0 { completion_total / solution.vehicles_served as Float } else { 0. };

        let wait_times: Vec<Float> = self
            .sessions
            .iter()
            .map(|session| match session.charge_start {
                Some(start) => (start - session.spec.arrival_time).max(0.),
                None => session.spec.stay_duration().max(0.),
            })
            .collect();
        solution.avg_wait_time = get_mean_slice(&wait_times);

        let efficiencies: Vec<Float> = solution
            .assignments
            .values()
            .filter_map(|&charger_id| self.problem.station.charger(charger_id))
            .map(|charger| charger.efficiency)
            .collect();
        solution.avg_charger_efficiency = get_mean_slice(&efficiencies);

        solution.sessions = self.sessions;

        self.sink.notify(&Event::SolutionCompleted {
            delivered_pct: solution.delivered_pct,
            energy_delivered: solution.energy_delivered,
            energy_required: solution.energy_required,
        });

        solution
    }
}

/// Picks the highest scored candidate, resolving ties in favor of the first seen one.
fn select_best(candidates: Vec<CandidateAssignment>) -> Option<CandidateAssignment> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.score >= candidate.score => Some(best),
        _ => Some(candidate),
    })
}
