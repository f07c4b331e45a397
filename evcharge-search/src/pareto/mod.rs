//! This module keeps Pareto dominance logic and a capacity bounded, diversity preserving
//! container for mutually non-dominated solutions.

#[cfg(test)]
#[path = "../../tests/unit/pareto/pareto_test.rs"]
mod pareto_test;

use crate::algorithms::math::euclidean_distance;
use crate::utils::{compare_floats, Float, GenericResult};
use std::cmp::Ordering;

/// A tolerance used to consider two objective values equal.
pub const DOMINANCE_EPSILON: Float = 1e-6;

/// Checks whether objective vector `a` dominates `b`: `a` is at least as good in every
/// objective and strictly better in at least one. All objectives are "larger is better",
/// minimization objectives are expected to be sign-flipped by the caller.
pub fn dominates(a: &[Float], b: &[Float]) -> bool {
    debug_assert!(a.len() == b.len());

    let mut at_least_one_better = false;

    for (&a, &b) in a.iter().zip(b.iter()) {
        if a < b {
            return false;
        }
        if a > b {
            at_least_one_better = true;
        }
    }

    at_least_one_better
}

/// Provides a dominance contract over a fixed size objective vector.
pub trait DominanceOrd {
    /// Returns the objective vector, all entries oriented as "larger is better".
    fn objectives(&self) -> &[Float];

    /// Checks whether this solution dominates the other in the Pareto sense.
    fn dominates(&self, other: &Self) -> bool {
        dominates(self.objectives(), other.objectives())
    }

    /// Checks whether both solutions are equal in all objectives within [`DOMINANCE_EPSILON`].
    fn is_equivalent(&self, other: &Self) -> bool {
        self.objectives().iter().zip(other.objectives().iter()).all(|(a, b)| (a - b).abs() <= DOMINANCE_EPSILON)
    }

    /// Returns euclidean distance to the other solution in objective space.
    fn distance_to(&self, other: &Self) -> Float {
        euclidean_distance(self.objectives(), other.objectives())
    }
}

/// Aggregated quality metrics of a Pareto front.
#[derive(Clone, Debug, Default)]
pub struct FrontStatistics {
    /// Amount of non-dominated solutions kept.
    pub size: usize,
    /// Average pairwise distance between kept solutions.
    pub avg_diversity: Float,
    /// Value spread per objective.
    pub objective_ranges: Vec<Float>,
}

/// A capacity bounded set of mutually non-dominated solutions. When the capacity is
/// exceeded, the per-objective best solutions are always kept and the rest of the budget
/// is spent on the most mutually distant members.
pub struct ParetoFront<S> {
    members: Vec<S>,
    capacity: usize,
}

impl<S: DominanceOrd + Clone> ParetoFront<S> {
    /// Creates a new instance of `ParetoFront` with given non-zero capacity.
    pub fn new(capacity: usize) -> GenericResult<Self> {
        if capacity == 0 {
            return Err("pareto front capacity must be non-zero".into());
        }

        Ok(Self { members: Vec::new(), capacity })
    }

    /// Tries to add a solution to the front. Returns false when the candidate is dominated
    /// by (or equivalent to) an existing member; otherwise evicts newly dominated members,
    /// inserts the candidate and re-applies the capacity bound.
    pub fn insert(&mut self, candidate: S) -> bool {
        if self.members.iter().any(|member| member.dominates(&candidate) || member.is_equivalent(&candidate)) {
            return false;
        }

        self.members.retain(|member| !candidate.dominates(member));
        self.members.push(candidate);

        if self.members.len() > self.capacity {
            self.shrink_to_capacity();
        }

        true
    }

    /// Adds all solutions, returning true when at least one was accepted.
    pub fn insert_all<I: IntoIterator<Item = S>>(&mut self, candidates: I) -> bool {
        candidates.into_iter().fold(false, |acc, candidate| self.insert(candidate) || acc)
    }

    /// Iterates over kept solutions.
    pub fn members(&self) -> impl Iterator<Item = &S> {
        self.members.iter()
    }

    /// Returns the member with the best value in the given objective, first such member on ties.
    pub fn best_by_objective(&self, objective_idx: usize) -> Option<&S> {
        self.members.iter().fold(None, |best: Option<&S>, member| match best {
            Some(best)
                if compare_floats(best.objectives()[objective_idx], member.objectives()[objective_idx])
                    != Ordering::Less =>
            {
                Some(best)
            }
            _ => Some(member),
        })
    }

    /// Returns the ideal point: component-wise maximum over the current front.
    pub fn ideal_point(&self) -> Vec<Float> {
        let dimension = self.members.first().map_or(0, |member| member.objectives().len());

        (0..dimension)
            .map(|idx| {
                self.members
                    .iter()
                    .map(|member| member.objectives()[idx])
                    .max_by(|a, b| compare_floats(*a, *b))
                    .unwrap_or(0.)
            })
            .collect()
    }

    /// Returns the compromise solution: the member closest to the ideal point.
    pub fn compromise(&self) -> Option<&S> {
        let ideal = self.ideal_point();

        self.members.iter().min_by(|a, b| {
            compare_floats(euclidean_distance(a.objectives(), &ideal), euclidean_distance(b.objectives(), &ideal))
        })
    }

    /// Calculates aggregated quality metrics of the front.
    pub fn statistics(&self) -> FrontStatistics {
        let dimension = self.members.first().map_or(0, |member| member.objectives().len());

        let (sum, count) = self
            .members
            .iter()
            .enumerate()
            .flat_map(|(idx, a)| self.members.iter().skip(idx + 1).map(move |b| a.distance_to(b)))
            .fold((0., 0_usize), |(sum, count), distance| (sum + distance, count + 1));

        let objective_ranges = (0..dimension)
            .map(|idx| {
                let values = self.members.iter().map(|member| member.objectives()[idx]);
                let min = values.clone().min_by(|a, b| compare_floats(*a, *b)).unwrap_or(0.);
                let max = values.max_by(|a, b| compare_floats(*a, *b)).unwrap_or(0.);
                max - min
            })
            .collect();

        FrontStatistics {
            size: self.members.len(),
            avg_diversity: if count > 0 { sum / count as Float } else { 0. },
            objective_ranges,
        }
    }

    /// Returns amount of kept solutions.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Checks whether the front is empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Removes all solutions from the front.
    pub fn clear(&mut self) {
        self.members.clear();
    }

    fn shrink_to_capacity(&mut self) {
        let dimension = self.members.first().map_or(0, |member| member.objectives().len());

        // anchor the front on per-objective extremes, in objective order
        let mut kept: Vec<usize> = Vec::with_capacity(self.capacity);
        for objective_idx in 0..dimension {
            if kept.len() == self.capacity {
                break;
            }

            let best = (0..self.members.len()).fold(None, |best: Option<usize>, idx| match best {
                Some(best)
                    if compare_floats(
                        self.members[best].objectives()[objective_idx],
                        self.members[idx].objectives()[objective_idx],
                    ) != Ordering::Less =>
                {
                    Some(best)
                }
                _ => Some(idx),
            });

            if let Some(best) = best {
                if !kept.contains(&best) {
                    kept.push(best);
                }
            }
        }

        // spend the remaining budget on the most mutually distant members
        while kept.len() < self.capacity {
            let next = (0..self.members.len())
                .filter(|idx| !kept.contains(idx))
                .map(|idx| {
                    let min_distance = kept
                        .iter()
                        .map(|&kept_idx| self.members[idx].distance_to(&self.members[kept_idx]))
                        .min_by(|a, b| compare_floats(*a, *b))
                        .unwrap_or(Float::MAX);
                    (idx, min_distance)
                })
                .max_by(|(_, a), (_, b)| compare_floats(*a, *b));

            match next {
                Some((idx, _)) => kept.push(idx),
                None => break,
            }
        }

        kept.sort_unstable();

        let mut idx = 0;
        self.members.retain(|_| {
            let keep = kept.contains(&idx);
            idx += 1;
            keep
        });

        debug_assert!(self.members.len() <= self.capacity);
    }
}
