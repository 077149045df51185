//! Termination conditions polled once per planner iteration

use std::time::{Duration, Instant};

/// Cooperative stop signal, checked at loop granularity
pub trait TerminationCondition {
    fn should_terminate(&mut self) -> bool;
}

impl<F> TerminationCondition for F
where
    F: FnMut() -> bool,
{
    fn should_terminate(&mut self) -> bool {
        self()
    }
}

/// Stops after a fixed number of polls
#[derive(Debug, Clone)]
pub struct IterationTermination {
    remaining: u64,
}

impl IterationTermination {
    pub fn new(iterations: u64) -> Self {
        Self { remaining: iterations }
    }
}

impl TerminationCondition for IterationTermination {
    fn should_terminate(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Stops once a wall-clock deadline has passed
#[derive(Debug, Clone)]
pub struct TimedTermination {
    deadline: Instant,
}

impl TimedTermination {
    pub fn new(budget: Duration) -> Self {
        Self {
            deadline: Instant::now() + budget,
        }
    }

    pub fn from_secs_f64(seconds: f64) -> Self {
        Self::new(Duration::from_secs_f64(seconds.max(0.0)))
    }
}

impl TerminationCondition for TimedTermination {
    fn should_terminate(&mut self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// Stops as soon as either condition fires
pub struct AnyTermination<A, B> {
    first: A,
    second: B,
}

impl<A, B> AnyTermination<A, B>
where
    A: TerminationCondition,
    B: TerminationCondition,
{
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }
}

impl<A, B> TerminationCondition for AnyTermination<A, B>
where
    A: TerminationCondition,
    B: TerminationCondition,
{
    fn should_terminate(&mut self) -> bool {
        // Poll both so iteration budgets keep counting down
        let a = self.first.should_terminate();
        let b = self.second.should_terminate();
        a || b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iteration_termination() {
        let mut ptc = IterationTermination::new(2);
        assert!(!ptc.should_terminate());
        assert!(!ptc.should_terminate());
        assert!(ptc.should_terminate());
        assert!(ptc.should_terminate());
    }

    #[test]
    fn test_timed_termination_zero_budget() {
        let mut ptc = TimedTermination::new(Duration::from_secs(0));
        assert!(ptc.should_terminate());
    }

    #[test]
    fn test_closure_and_any() {
        let mut calls = 0;
        let closure = move || {
            calls += 1;
            calls > 3
        };
        let mut ptc = AnyTermination::new(closure, IterationTermination::new(10));
        assert!(!ptc.should_terminate());
        assert!(!ptc.should_terminate());
        assert!(!ptc.should_terminate());
        assert!(ptc.should_terminate());
    }
}
