//! The termination module contains logic which defines termination criteria for metaheuristic,
//! e.g. when to stop searching for an improved solution.

#[cfg(test)]
#[path = "../../tests/unit/termination/termination_test.rs"]
mod termination_test;

use crate::utils::{Float, Timer};

/// Keeps essential information about search progress, checked by termination criteria.
pub struct SearchStatistics {
    /// Search iteration (or generation) number.
    pub iteration: usize,
    /// Amount of iterations since the last improvement.
    pub iterations_since_improvement: usize,
    /// A timer started when the search started.
    pub time: Timer,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self { iteration: 0, iterations_since_improvement: 0, time: Timer::start() }
    }
}

impl SearchStatistics {
    /// Registers a finished iteration and whether it improved the best known solution.
    pub fn on_iteration(&mut self, is_improved: bool) {
        self.iteration += 1;
        self.iterations_since_improvement = if is_improved { 0 } else { self.iterations_since_improvement + 1 };
    }
}

/// A trait which specifies criteria when a metaheuristic should stop searching.
pub trait Termination {
    /// Returns true if the termination condition is met.
    fn is_termination(&self, statistics: &SearchStatistics) -> bool;

    /// Returns a relative estimation till termination. Value is in the `[0, 1]` range.
    fn estimate(&self, statistics: &SearchStatistics) -> Float;
}

/// A termination criteria which is in terminated state when the maximum amount of
/// iterations is reached.
pub struct MaxIterations {
    limit: usize,
}

impl MaxIterations {
    /// Creates a new instance of `MaxIterations`.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Termination for MaxIterations {
    fn is_termination(&self, statistics: &SearchStatistics) -> bool {
        statistics.iteration >= self.limit
    }

    fn estimate(&self, statistics: &SearchStatistics) -> Float {
        (statistics.iteration as Float / self.limit as Float).min(1.)
    }
}

/// A termination criteria which stops the search when no improvement was seen for the
/// configured amount of consecutive iterations.
pub struct MaxStagnation {
    limit: usize,
}

impl MaxStagnation {
    /// Creates a new instance of `MaxStagnation`.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Termination for MaxStagnation {
    fn is_termination(&self, statistics: &SearchStatistics) -> bool {
        statistics.iterations_since_improvement >= self.limit
    }

    fn estimate(&self, statistics: &SearchStatistics) -> Float {
        (statistics.iterations_since_improvement as Float / self.limit as Float).min(1.)
    }
}

/// A termination criteria which is in terminated state when max time elapsed.
pub struct MaxTime {
    limit_in_secs: Float,
}

impl MaxTime {
    /// Creates a new instance of `MaxTime`.
    pub fn new(limit_in_secs: Float) -> Self {
        Self { limit_in_secs }
    }
}

impl Termination for MaxTime {
    fn is_termination(&self, statistics: &SearchStatistics) -> bool {
        statistics.time.elapsed_secs_as_float() > self.limit_in_secs
    }

    fn estimate(&self, statistics: &SearchStatistics) -> Float {
        (statistics.time.elapsed_secs_as_float() / self.limit_in_secs).min(1.)
    }
}

/// A termination criteria which encapsulates multiple termination criteria.
pub struct CompositeTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl CompositeTermination {
    /// Creates a new instance of `CompositeTermination`.
    pub fn new(terminations: Vec<Box<dyn Termination>>) -> Self {
        Self { terminations }
    }
}

impl Termination for CompositeTermination {
    fn is_termination(&self, statistics: &SearchStatistics) -> bool {
        self.terminations.iter().any(|termination| termination.is_termination(statistics))
    }

    fn estimate(&self, statistics: &SearchStatistics) -> Float {
        self.terminations.iter().map(|termination| termination.estimate(statistics)).fold(0., |acc, v| acc.max(v))
    }
}
