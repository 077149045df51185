//! Caller-owned planning context: the optimization objective and the
//! stream of solutions found while solving.

use std::time::{Duration, Instant};

use crate::common::traits::OptimizationObjective;
use crate::common::types::{Cost, SolutionRecord};

/// State a planner reads and updates during `solve`, owned by the caller
#[derive(Debug)]
pub struct PlanningContext<O> {
    objective: O,
    solutions: Vec<SolutionRecord>,
    started: Option<Instant>,
}

impl<O: OptimizationObjective> PlanningContext<O> {
    pub fn new(objective: O) -> Self {
        Self {
            objective,
            solutions: Vec::new(),
            started: None,
        }
    }

    pub fn objective(&self) -> &O {
        &self.objective
    }

    pub fn objective_mut(&mut self) -> &mut O {
        &mut self.objective
    }

    /// Restart the clock used to timestamp solutions
    pub fn start_clock(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn elapsed(&self) -> Duration {
        self.started.map(|s| s.elapsed()).unwrap_or_default()
    }

    /// Append a solution to the stream
    pub fn add_solution(&mut self, cost: Cost) {
        let elapsed = self.elapsed();
        self.solutions.push(SolutionRecord { cost, elapsed });
    }

    pub fn solutions(&self) -> &[SolutionRecord] {
        &self.solutions
    }

    pub fn best_cost(&self) -> Option<Cost> {
        self.solutions.last().map(|r| r.cost)
    }

    /// Forget recorded solutions and reset the objective threshold
    pub fn reset(&mut self) {
        self.solutions.clear();
        self.started = None;
        let infinite = self.objective.infinite_cost();
        self.objective.set_cost_threshold(infinite);
    }

    pub fn into_objective(self) -> O {
        self.objective
    }
}
