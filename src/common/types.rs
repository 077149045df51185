//! Common types used throughout kinodynamic_planning

use std::fmt;
use std::time::Duration;

/// Accumulated cost of a trajectory
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Cost(pub f64);

impl Cost {
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Outcome of a `solve` call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlannerStatus {
    /// A solution (exact or approximate) is available
    pub solved: bool,
    /// The best available solution does not reach the goal
    pub approximate: bool,
}

impl PlannerStatus {
    pub fn new(solved: bool, approximate: bool) -> Self {
        Self { solved, approximate }
    }

    pub fn exact() -> Self {
        Self::new(true, false)
    }

    pub fn approximate() -> Self {
        Self::new(true, true)
    }

    pub fn failed() -> Self {
        Self::new(false, false)
    }

    pub fn is_exact(&self) -> bool {
        self.solved && !self.approximate
    }
}

/// One control applied for a number of propagation steps
#[derive(Debug, Clone, PartialEq)]
pub struct ControlSegment<C> {
    pub control: C,
    pub steps: u32,
}

/// Trajectory from a root of the tree to the reached state.
///
/// `controls[i]` drives `states[i]` to `states[i + 1]`.
#[derive(Debug, Clone)]
pub struct Solution<S, C> {
    pub cost: Cost,
    pub states: Vec<S>,
    pub controls: Vec<ControlSegment<C>>,
    /// Distance from the final state to the goal region (zero for exact solutions)
    pub goal_distance: f64,
}

impl<S, C> Solution<S, C> {
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn last_state(&self) -> Option<&S> {
        self.states.last()
    }

    pub fn total_steps(&self) -> u64 {
        self.controls.iter().map(|c| c.steps as u64).sum()
    }
}

/// Start states and goal region of a single query
#[derive(Debug, Clone)]
pub struct ProblemDefinition<S, G> {
    pub start_states: Vec<S>,
    pub goal: G,
}

impl<S, G> ProblemDefinition<S, G> {
    pub fn new(start: S, goal: G) -> Self {
        Self {
            start_states: vec![start],
            goal,
        }
    }

    pub fn add_start_state(&mut self, state: S) {
        self.start_states.push(state);
    }
}

/// Entry of the solution stream kept by a planning context
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolutionRecord {
    pub cost: Cost,
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_display() {
        assert_eq!(format!("{}", Cost::new(1.234)), "1.23");
        assert!(!Cost::new(f64::INFINITY).is_finite());
    }

    #[test]
    fn test_planner_status() {
        assert!(PlannerStatus::exact().is_exact());
        assert!(!PlannerStatus::approximate().is_exact());
        assert!(!PlannerStatus::failed().solved);
    }

    #[test]
    fn test_solution_total_steps() {
        let solution = Solution {
            cost: Cost::new(0.5),
            states: vec![0.0, 0.2, 0.5],
            controls: vec![
                ControlSegment { control: 1.0, steps: 2 },
                ControlSegment { control: 1.0, steps: 3 },
            ],
            goal_distance: 0.0,
        };
        assert_eq!(solution.total_steps(), 5);
        assert_eq!(solution.last_state(), Some(&0.5));
    }
}
