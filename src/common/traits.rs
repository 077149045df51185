//! Common traits defining the collaborators of the planners and samplers

use rand::Rng;

use crate::common::error::{PlanningError, PlanningResult};
use crate::common::types::Cost;

/// Continuous state space the planners search
pub trait StateSpace {
    /// Point of the space
    type State: Clone;

    /// Number of dimensions
    fn dimension(&self) -> usize;

    /// Metric between two states (symmetric, non-negative, zero iff equal)
    fn distance(&self, a: &Self::State, b: &Self::State) -> f64;

    /// Whether a state may be used as a start state
    fn is_valid(&self, _state: &Self::State) -> bool {
        true
    }

    /// Draw a state uniformly from the whole space
    fn sample_uniform<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::State;

    /// Draw a state uniformly within `distance` of `near`
    fn sample_uniform_near<R: Rng + ?Sized>(
        &self,
        near: &Self::State,
        distance: f64,
        rng: &mut R,
    ) -> Self::State;
}

/// Result of propagating a control from one state toward another
#[derive(Debug, Clone)]
pub struct Propagation<S, C> {
    /// State actually reached
    pub state: S,
    /// Control that was applied
    pub control: C,
    /// Number of propagation steps the control was applied for
    pub steps: u32,
}

/// Dynamics oracle: chooses and applies controls that drive a state toward a target
pub trait DirectedControlSampler<S> {
    type Control: Clone;

    /// Number of control dimensions
    fn control_dimension(&self) -> usize;

    /// Control assigned to root motions
    fn null_control(&self) -> Self::Control;

    /// Propagations shorter than this many steps are discarded
    fn min_control_duration(&self) -> u32;

    /// Duration of a single propagation step (the per-step cost weight)
    fn step_size(&self) -> f64;

    /// Propagate from `source` toward `target`. `previous` is the control that
    /// reached `source`. A result with `steps == 0` means nothing valid was reached.
    fn sample_to<R: Rng + ?Sized>(
        &self,
        previous: &Self::Control,
        source: &S,
        target: &S,
        rng: &mut R,
    ) -> Propagation<S, Self::Control>;
}

/// Goal region of a planning query
pub trait GoalRegion<S> {
    /// Distance from `state` to the region
    fn distance_to_goal(&self, state: &S) -> f64;

    /// Tolerance under which a state counts as inside the region
    fn threshold(&self) -> f64;

    fn is_satisfied(&self, state: &S) -> bool {
        self.distance_to_goal(state) <= self.threshold()
    }

    fn can_sample(&self) -> bool {
        false
    }

    /// Draw a state from the region, `None` when the region is not sampleable
    fn sample_goal<R: Rng + ?Sized>(&self, _rng: &mut R) -> Option<S> {
        None
    }
}

/// Optimization objective with a monotonically tightening cost threshold
pub trait OptimizationObjective {
    fn identity_cost(&self) -> Cost;

    fn infinite_cost(&self) -> Cost;

    fn combine_costs(&self, a: Cost, b: Cost) -> Cost;

    fn is_cost_better_than(&self, a: Cost, b: Cost) -> bool;

    fn cost_threshold(&self) -> Cost;

    fn set_cost_threshold(&mut self, threshold: Cost);

    /// Whether `cost` beats the current threshold
    fn is_satisfied(&self, cost: Cost) -> bool {
        self.is_cost_better_than(cost, self.cost_threshold())
    }
}

/// Nearest-neighbor index over items identified by a handle.
///
/// The metric is passed to every query so the index never needs to
/// borrow the state space.
pub trait NearestNeighbors<S> {
    fn add(&mut self, id: usize, state: S);

    /// Remove an item, returns false if it was not present
    fn remove(&mut self, id: usize) -> bool;

    fn nearest<D>(&self, query: &S, distance: D) -> Option<usize>
    where
        D: Fn(&S, &S) -> f64;

    /// All items within `radius`, closest first
    fn nearest_r<D>(&self, query: &S, radius: f64, distance: D) -> Vec<usize>
    where
        D: Fn(&S, &S) -> f64;

    /// The `k` closest items, closest first
    fn nearest_k<D>(&self, query: &S, k: usize, distance: D) -> Vec<usize>
    where
        D: Fn(&S, &S) -> f64;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list(&self) -> Vec<usize>;

    fn clear(&mut self);
}

/// Discretization of the state space into cells
pub trait Abstraction<S> {
    /// Number of cells
    fn size(&self) -> usize;

    /// Cell containing `state`
    fn cell_of(&self, state: &S) -> usize;

    /// Cells adjacent to `cell`
    fn neighbors(&self, cell: usize) -> Vec<usize>;

    /// Validity oracle for the transition `from -> to`
    fn is_valid_edge(&self, from: usize, to: usize) -> bool;

    /// A state mapped to the cell, used when direct sampling is unsupported
    fn representative_state(&self, cell: usize) -> S;

    fn supports_sampling(&self) -> bool {
        false
    }

    /// Draw a state inside `cell`
    fn sample_cell_state<R: Rng + ?Sized>(&self, _cell: usize, _rng: &mut R) -> Option<S> {
        None
    }
}

/// Pair of states produced by a directed sampler: propagate from `from` toward `to`
#[derive(Debug, Clone, PartialEq)]
pub struct StatePair<S> {
    pub from: S,
    pub to: S,
}

/// Host-facing sampler that biases a host exploration loop
pub trait DirectedStateSampler<S> {
    /// Produce the next pair of states to connect
    fn sample(&mut self) -> PlanningResult<StatePair<S>>;

    /// Report a state actually reached by the host
    fn reached(&mut self, state: &S);

    fn sample_state(&mut self) -> PlanningResult<S> {
        Err(PlanningError::UnsupportedOperation("sample_state"))
    }

    fn sample_near(&mut self, _near: &S, _distance: f64) -> PlanningResult<S> {
        Err(PlanningError::UnsupportedOperation("sample_near"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct PointGoal;

    impl GoalRegion<f64> for PointGoal {
        fn distance_to_goal(&self, state: &f64) -> f64 {
            (state - 1.0).abs()
        }

        fn threshold(&self) -> f64 {
            0.1
        }
    }

    #[test]
    fn test_goal_region_defaults() {
        let goal = PointGoal;
        assert!(goal.is_satisfied(&0.95));
        assert!(!goal.is_satisfied(&0.5));
        assert!(!goal.can_sample());
        let mut rng = rand::thread_rng();
        assert!(goal.sample_goal(&mut rng).is_none());
    }
}
