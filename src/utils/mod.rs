//! Utility modules for kinodynamic_planning
//!
//! Concrete collaborators: nearest neighbor index, real vector state
//! space, grid abstraction.

pub mod grid_abstraction;
pub mod nearest_neighbors;
pub mod real_vector;

pub use grid_abstraction::GridAbstraction;
pub use nearest_neighbors::LinearNearestNeighbors;
pub use real_vector::{BallGoal, CircleObstacle, RealVectorSpace, StraightLinePropagator};
