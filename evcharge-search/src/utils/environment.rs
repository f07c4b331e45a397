use crate::utils::{DefaultRandom, Float, Random, Timer};
use std::sync::Arc;

/// Specifies a logger type, which can be used to forward human readable progress messages.
pub type InfoLogger = Arc<dyn Fn(&str) + Send + Sync>;

/// Keeps track of some resource usage limitation, checked cooperatively by search loops.
pub trait Quota {
    /// Returns true when the quota is reached and the consumer should stop.
    fn is_reached(&self) -> bool;
}

/// A time based quota implementation.
pub struct TimeQuota {
    timer: Timer,
    limit_in_secs: Float,
}

impl TimeQuota {
    /// Creates a new instance of `TimeQuota` with the given limit in seconds.
    pub fn new(limit_in_secs: Float) -> Self {
        Self { timer: Timer::start(), limit_in_secs }
    }
}

impl Quota for TimeQuota {
    fn is_reached(&self) -> bool {
        self.timer.elapsed_secs_as_float() > self.limit_in_secs
    }
}

/// Keeps track of environment specific information which influences algorithm behavior:
/// source of randomness, an optional execution quota and a logger.
pub struct Environment {
    /// A random generator.
    pub random: Arc<dyn Random>,
    /// An execution quota, if any.
    pub quota: Option<Arc<dyn Quota>>,
    /// A logger.
    pub logger: InfoLogger,
}

impl Environment {
    /// Creates a new instance of `Environment`.
    pub fn new(random: Arc<dyn Random>, quota: Option<Arc<dyn Quota>>, logger: InfoLogger) -> Self {
        Self { random, quota, logger }
    }

    /// Creates an environment with a fixed seed, making results reproducible.
    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            random: Arc::new(DefaultRandom::new_with_seed(seed)),
            quota: None,
            logger: Arc::new(|msg| eprintln!("{msg}")),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            random: Arc::new(DefaultRandom::default()),
            quota: None,
            logger: Arc::new(|msg| eprintln!("{msg}")),
        }
    }
}
