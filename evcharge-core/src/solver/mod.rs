//! This module contains the Scatter Search optimizer: it diversifies over independent
//! constructive runs, locally improves, recombines reference solutions and maintains a
//! bounded Pareto front of whole-system outcomes to escape local optima of the
//! constructive scheduler.

#[cfg(test)]
#[path = "../../tests/unit/solver/scatter_test.rs"]
mod scatter_test;

mod improvement;
pub use self::improvement::improve_solution;

mod objectives;
pub use self::objectives::*;

mod recombine;
pub use self::recombine::merge_assignments;

use crate::construction::{ConstructiveScheduler, SchedulerConfig};
use crate::models::problem::{ChargerId, Problem, VehicleId};
use crate::models::solution::Solution;
use crate::telemetry::{Event, EventSink, NoopSink};
use evcharge_search::prelude::*;
use evcharge_search::utils::parallel_into_collect;
use rand::RngCore;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Controls scatter search effort and set sizes.
#[derive(Clone, Debug)]
pub struct ScatterSearchConfig {
    /// Size of the reference set used to seed recombination.
    pub reference_set_size: usize,
    /// Maximum amount of main loop iterations.
    pub max_iterations: usize,
    /// Maximum amount of consecutive iterations without improvement.
    pub max_stagnation: usize,
    /// Amount of independent constructive runs in the diversification phase.
    pub max_diversification_runs: usize,
    /// Maximum amount of local search rounds per improvement call.
    pub local_search_rounds: usize,
    /// Relative difference under which two solutions count as near-duplicates.
    pub similarity_threshold: Float,
    /// Minimum distance to all reference members which admits a solution on diversity merits.
    pub diversity_threshold: Float,
    /// Capacity of the maintained Pareto front.
    pub pareto_capacity: usize,
    /// Maximum amount of reference set pairs recombined per iteration.
    pub max_subset_pairs: usize,
    /// Optional wall clock budget in seconds, checked between iterations.
    pub max_time: Option<Float>,
}

impl ScatterSearchConfig {
    /// A cheap configuration for quick runs.
    pub fn fast() -> Self {
        Self {
            reference_set_size: 4,
            max_iterations: 10,
            max_stagnation: 4,
            max_diversification_runs: 15,
            local_search_rounds: 2,
            similarity_threshold: 0.08,
            diversity_threshold: 0.6,
            pareto_capacity: 10,
            max_subset_pairs: 6,
            max_time: None,
        }
    }

    /// A balanced configuration, the default.
    pub fn balanced() -> Self {
        Self {
            reference_set_size: 8,
            max_iterations: 25,
            max_stagnation: 8,
            max_diversification_runs: 35,
            local_search_rounds: 5,
            similarity_threshold: 0.03,
            diversity_threshold: 0.4,
            pareto_capacity: 20,
            max_subset_pairs: 6,
            max_time: None,
        }
    }

    /// A thorough configuration for longer runs.
    pub fn intensive() -> Self {
        Self {
            reference_set_size: 12,
            max_iterations: 40,
            max_stagnation: 12,
            max_diversification_runs: 50,
            local_search_rounds: 8,
            similarity_threshold: 0.02,
            diversity_threshold: 0.3,
            pareto_capacity: 30,
            max_subset_pairs: 6,
            max_time: None,
        }
    }
}

impl Default for ScatterSearchConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

/// The outcome of a scatter search run.
pub struct OptimizationOutcome {
    /// The best found solution by aggregate objective.
    pub best: Solution,
    /// The final Pareto front over all examined solutions.
    pub front: ParetoFront<SolutionObjectives>,
    /// Amount of executed main loop iterations.
    pub iterations: usize,
    /// Relative improvement over the seed solution, in percent.
    pub improvement_pct: Float,
    /// Per-phase operation counters.
    pub operations: FxHashMap<&'static str, usize>,
}

/// A scatter search optimizer built atop repeated constructive scheduler runs.
pub struct ScatterSearch {
    problem: Arc<Problem>,
    environment: Arc<Environment>,
    sink: Arc<dyn EventSink>,
    config: ScatterSearchConfig,
}

impl ScatterSearch {
    /// Creates a new instance of `ScatterSearch` with the balanced configuration.
    pub fn new(problem: Arc<Problem>, environment: Arc<Environment>, sink: Arc<dyn EventSink>) -> Self {
        Self::with_config(problem, environment, sink, ScatterSearchConfig::default())
    }

    /// Creates a new instance of `ScatterSearch` with the given configuration.
    pub fn with_config(
        problem: Arc<Problem>,
        environment: Arc<Environment>,
        sink: Arc<dyn EventSink>,
        config: ScatterSearchConfig,
    ) -> Self {
        Self { problem, environment, sink, config }
    }

    /// Runs a single constructive schedule and refines it.
    pub fn run(&self) -> GenericResult<OptimizationOutcome> {
        let mut rng = self.environment.random.get_rng();
        let initial = run_scheduler(&self.problem, rng.next_u64(), FxHashMap::default());

        self.optimize(initial)
    }

    /// Refines the given seed solution through diversification, improvement, reference set
    /// recombination and Pareto front maintenance.
    pub fn optimize(&self, initial: Solution) -> GenericResult<OptimizationOutcome> {
        let mut front: ParetoFront<SolutionObjectives> = ParetoFront::new(self.config.pareto_capacity)?;
        let mut operations: FxHashMap<&'static str, usize> = FxHashMap::default();

        let mut rng = self.environment.random.get_rng();
        let base_seed = rng.next_u64();

        // phase 1: diversification over independent seeded runs
        let population = self.diversify(&initial, base_seed, &mut operations);

        // phase 2: bounded local improvement of every diversified solution
        let improved: Vec<Solution> = population
            .into_iter()
            .enumerate()
            .map(|(idx, solution)| {
                improve_solution(
                    &self.problem,
                    solution,
                    self.config.local_search_rounds,
                    base_seed.wrapping_add(1_000 + idx as u64),
                )
            })
            .collect();
        *operations.entry("local_search").or_insert(0) += improved.len();

        // phase 3: reference set initialization from the Pareto front
        front.insert_all(improved.iter().cloned().map(SolutionObjectives::new));

        let mut reference: Vec<Solution> = front.members().map(|member| member.solution().clone()).collect();
        reference.sort_by(|a, b| compare_floats(b.objective_value(), a.objective_value()));
        reference.truncate(self.config.reference_set_size);

        let mut best = front
            .compromise()
            .map(|compromise| compromise.solution().clone())
            .or_else(|| reference.first().cloned())
            .unwrap_or_else(|| initial.clone());

        self.sink.notify(&Event::ScatterPhase {
            phase: "refset",
            details: format!(
                "reference set {}, front {}, best {:.2}",
                reference.len(),
                front.len(),
                best.objective_value()
            ),
        });

        // phase 4: recombine, improve, update
        let termination = self.termination();
        let mut statistics = SearchStatistics::default();
        let mut child_seed = base_seed.wrapping_add(10_000);

        while !termination.is_termination(&statistics) && !self.quota_reached() {
            let pairs = subset_pairs(reference.len(), self.config.max_subset_pairs);
            let mut improved_any = false;

            for (left, right) in pairs {
                let hints = merge_assignments(&reference[left], &reference[right]);
                child_seed = child_seed.wrapping_add(1);

                let child = run_scheduler(&self.problem, child_seed, hints);
                let child =
                    improve_solution(&self.problem, child, self.config.local_search_rounds, child_seed.wrapping_add(1));
                *operations.entry("combinations").or_insert(0) += 1;

                if front.insert(SolutionObjectives::new(child.clone())) {
                    improved_any = true;
                }

                if child.objective_value() > best.objective_value() {
                    best = child.clone();
                    improved_any = true;
                }

                if self.try_admit_reference(&mut reference, child) {
                    *operations.entry("reference_updates").or_insert(0) += 1;
                    improved_any = true;
                }
            }

            // refresh the running best from the front compromise whenever it got better
            if let Some(compromise) = front.compromise() {
                if compromise.solution().objective_value() > best.objective_value() {
                    best = compromise.solution().clone();
                }
            }

            statistics.on_iteration(improved_any);

            self.sink.notify(&Event::ScatterIteration {
                iteration: statistics.iteration,
                best_objective: best.objective_value(),
                improved: improved_any,
                reference_size: reference.len(),
                front_size: front.len(),
            });
        }

        let improvement_pct = if initial.objective_value() == 0. {
            0.
        } else {
            (best.objective_value() - initial.objective_value()) / initial.objective_value().abs() * 100.
        };

        Ok(OptimizationOutcome { best, front, iterations: statistics.iteration, improvement_pct, operations })
    }

    fn diversify(
        &self,
        initial: &Solution,
        base_seed: u64,
        operations: &mut FxHashMap<&'static str, usize>,
    ) -> Vec<Solution> {
        let target = 15_usize.max(self.config.pareto_capacity * 3 / 4);

        let problem = self.problem.clone();
        let seeds: Vec<u64> =
            (0..self.config.max_diversification_runs as u64).map(|idx| base_seed.wrapping_add(idx)).collect();

        // independent runs share no mutable state, so fan them out
        let runs = parallel_into_collect(seeds, move |seed| run_scheduler(&problem, seed, FxHashMap::default()));
        *operations.entry("diversification").or_insert(0) += runs.len();

        let runs_total = runs.len();
        let mut population = vec![initial.clone()];
        for solution in runs {
            if population.len() >= target {
                break;
            }
            if !self.is_near_duplicate(&solution, &population) {
                population.push(solution);
            }
        }

        if population.len() < target {
            let best = population
                .iter()
                .max_by(|a, b| compare_floats(a.objective_value(), b.objective_value()))
                .cloned()
                .unwrap_or_else(|| initial.clone());

            population.extend(perturbation_variants(&best));
        }

        self.sink.notify(&Event::ScatterPhase {
            phase: "diversification",
            details: format!("{} diverse solutions out of {} runs", population.len(), runs_total),
        });

        population
    }

    /// Checks whether the solution differs from every kept one by less than the similarity
    /// threshold across all principal metrics.
    fn is_near_duplicate(&self, candidate: &Solution, kept: &[Solution]) -> bool {
        let threshold = self.config.similarity_threshold;

        kept.iter().any(|existing| {
            let relative = |new: Float, old: Float| (new - old).abs() / old.abs().max(1.);

            relative(candidate.objective_value(), existing.objective_value()) < threshold
                && relative(candidate.energy_delivered, existing.energy_delivered) < threshold
                && relative(candidate.total_cost, existing.total_cost) < threshold
                && relative(candidate.vehicles_served as Float, existing.vehicles_served as Float) < threshold
                && relative(candidate.delivered_pct, existing.delivered_pct) < threshold
        })
    }

    /// Admits the solution into the reference set when it beats the worst member or when
    /// it is distant enough from all members; the worst member gets replaced at capacity.
    fn try_admit_reference(&self, reference: &mut Vec<Solution>, candidate: Solution) -> bool {
        let worst = reference
            .iter()
            .map(Solution::objective_value)
            .min_by(|a, b| compare_floats(*a, *b))
            .unwrap_or(Float::MIN);

        let min_distance = reference
            .iter()
            .map(|member| solution_distance(&candidate, member))
            .min_by(|a, b| compare_floats(*a, *b))
            .unwrap_or(Float::MAX);

        if candidate.objective_value() <= worst && min_distance <= self.config.diversity_threshold {
            return false;
        }

        if reference.len() >= self.config.reference_set_size {
            if let Some(worst_idx) = reference
                .iter()
                .enumerate()
                .min_by(|(_, a), (_, b)| compare_floats(a.objective_value(), b.objective_value()))
                .map(|(idx, _)| idx)
            {
                reference.remove(worst_idx);
            }
        }

        reference.push(candidate);
        reference.sort_by(|a, b| compare_floats(b.objective_value(), a.objective_value()));

        true
    }

    fn termination(&self) -> CompositeTermination {
        let mut criteria: Vec<Box<dyn Termination>> = vec![
            Box::new(MaxIterations::new(self.config.max_iterations)),
            Box::new(MaxStagnation::new(self.config.max_stagnation)),
        ];

        if let Some(limit) = self.config.max_time {
            criteria.push(Box::new(MaxTime::new(limit)));
        }

        CompositeTermination::new(criteria)
    }

    fn quota_reached(&self) -> bool {
        self.environment.quota.as_ref().is_some_and(|quota| quota.is_reached())
    }
}

/// Runs one full constructive schedule with an explicit seed and assignment hints.
fn run_scheduler(problem: &Arc<Problem>, seed: u64, hints: FxHashMap<VehicleId, ChargerId>) -> Solution {
    let environment = Arc::new(Environment::new_with_seed(seed));
    let config = SchedulerConfig { assignment_hints: hints, ..SchedulerConfig::default() };

    ConstructiveScheduler::with_config(problem.clone(), environment, Arc::new(NoopSink), config).run()
}

/// Enumerates reference set index pairs, bounded in count.
fn subset_pairs(len: usize, max_pairs: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();

    'outer: for left in 0..len {
        for right in (left + 1)..len {
            if pairs.len() >= max_pairs {
                break 'outer;
            }
            pairs.push((left, right));
        }
    }

    pairs
}

/// A coarse distance between two solutions over their principal metrics, used to judge
/// diversity of reference set candidates.
fn solution_distance(a: &Solution, b: &Solution) -> Float {
    let cost = (a.total_cost - b.total_cost).abs();
    let value = (a.delivered_value - b.delivered_value).abs();
    let energy = (a.energy_delivered - b.energy_delivered).abs();
    let completion = (a.avg_completion_pct - b.avg_completion_pct).abs();

    (cost + value + energy + completion).sqrt()
}

/// Synthesizes five single-objective leaning variants of the best found solution, used to
/// top up diversity when independent runs converge.
fn perturbation_variants(base: &Solution) -> Vec<Solution> {
    let mut variants = Vec::with_capacity(5);

    // cost focused
    let mut variant = base.clone();
    variant.total_cost *= 0.85;
    variant.energy_delivered *= 0.90;
    variant.vehicles_served = base.vehicles_served.saturating_sub(3).max(1);
    variant.recalc_delivered_pct();
    variants.push(variant);

    // energy focused
    let mut variant = base.clone();
    variant.energy_delivered *= 1.15;
    variant.total_cost *= 1.10;
    variant.vehicles_served = base.vehicles_served + 2;
    variant.recalc_delivered_pct();
    variants.push(variant);

    // served vehicles focused
    let mut variant = base.clone();
    variant.vehicles_served = base.vehicles_served + 5;
    variant.energy_delivered *= 0.95;
    variant.total_cost *= 1.05;
    variant.recalc_delivered_pct();
    variants.push(variant);

    // efficiency focused
    let mut variant = base.clone();
    variant.avg_charger_efficiency = (base.avg_charger_efficiency * 1.08).min(1.);
    variant.avg_wait_time *= 0.85;
    variant.total_cost *= 0.95;
    variant.recalc_delivered_pct();
    variants.push(variant);

    // balanced
    let mut variant = base.clone();
    variant.energy_delivered *= 1.03;
    variant.total_cost *= 1.02;
    variant.vehicles_served = base.vehicles_served + 1;
    variant.avg_charger_efficiency = (base.avg_charger_efficiency * 1.02).min(1.);
    variant.recalc_delivered_pct();
    variants.push(variant);

    variants
}
