//! Solution models: the mutable per-vehicle simulation state and the aggregate outcome
//! of a full scheduler run.

mod session;
pub use self::session::*;

mod solution;
pub use self::solution::*;
