//! This module reimports commonly used types.

pub use crate::models::problem::{
    ChargerId, ChargerKind, ChargerSpec, EnergyPrice, GridConstraints, PriceBook, Problem, StationConfig,
    VehicleArrivalSpec, VehicleId, DEFAULT_ENERGY_PRICE,
};
pub use crate::models::solution::{ChargerUsage, Solution, VehicleSession, VehicleState};

pub use crate::construction::heuristics::{CandidateAssignment, Heuristic, RankingContext};
pub use crate::construction::{ConstructiveScheduler, Feasibility, SchedulerConfig};

pub use crate::solver::{
    OptimizationOutcome, ScatterSearch, ScatterSearchConfig, SolutionObjectives,
};

pub use crate::telemetry::{Event, EventSink, LogSink, NoopSink};

pub use evcharge_search::prelude::{Environment, Float};
