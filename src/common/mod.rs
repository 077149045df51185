//! Common types, traits, and error definitions for kinodynamic_planning
//!
//! This module provides the collaborator interfaces shared by the tree
//! planner and the guided sampler.

pub mod context;
pub mod error;
pub mod termination;
pub mod traits;
pub mod types;

pub use context::*;
pub use error::*;
pub use termination::*;
pub use traits::*;
pub use types::*;
