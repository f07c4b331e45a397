//! This module reimports commonly used types.

pub use crate::algorithms::math::{euclidean_distance, get_mean_slice, get_stdev, get_variance, relative_distance};

pub use crate::pareto::DominanceOrd;
pub use crate::pareto::FrontStatistics;
pub use crate::pareto::ParetoFront;

pub use crate::termination::CompositeTermination;
pub use crate::termination::MaxIterations;
pub use crate::termination::MaxStagnation;
pub use crate::termination::MaxTime;
pub use crate::termination::SearchStatistics;
pub use crate::termination::Termination;

pub use crate::utils::compare_floats;
pub use crate::utils::DefaultRandom;
pub use crate::utils::Environment;
pub use crate::utils::Float;
pub use crate::utils::InfoLogger;
pub use crate::utils::Quota;
pub use crate::utils::TimeQuota;
pub use crate::utils::Timer;
pub use crate::utils::{GenericError, GenericResult};
pub use crate::utils::{Random, RandomGen};
