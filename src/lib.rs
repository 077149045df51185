//! kinodynamic_planning - sampling-based kinodynamic motion planning
//!
//! This crate provides an asymptotically near-optimal tree planner (SST*)
//! and an abstraction-guided directed state sampler that biases a host
//! exploration loop toward the goal using incremental search over
//! sampling effort.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Algorithm modules
pub mod path_planning;
pub mod sampling;

// Re-export common types for convenience
pub use common::{Cost, PlannerStatus, ProblemDefinition, Solution, StatePair};
pub use common::{DirectedStateSampler, PlanningContext, TerminationCondition};
pub use common::{PlanningError, PlanningResult};
pub use config::PlannerConfig;
pub use path_planning::{PathLengthObjective, SstConfig, SstStar};
pub use sampling::{EffortModel, GuidedSampler, GuidedSamplerConfig};
