//! Path length optimization objective
//!
//! Costs are non-negative durations summed along the trajectory; a cost
//! satisfies the objective when it beats the current threshold.

use crate::common::{Cost, OptimizationObjective};

#[derive(Debug, Clone)]
pub struct PathLengthObjective {
    threshold: Cost,
}

impl PathLengthObjective {
    pub fn new() -> Self {
        Self {
            threshold: Cost::new(f64::INFINITY),
        }
    }

    pub fn with_threshold(threshold: Cost) -> Self {
        Self { threshold }
    }
}

impl Default for PathLengthObjective {
    fn default() -> Self {
        Self::new()
    }
}

impl OptimizationObjective for PathLengthObjective {
    fn identity_cost(&self) -> Cost {
        Cost::new(0.0)
    }

    fn infinite_cost(&self) -> Cost {
        Cost::new(f64::INFINITY)
    }

    fn combine_costs(&self, a: Cost, b: Cost) -> Cost {
        Cost::new(a.value() + b.value())
    }

    fn is_cost_better_than(&self, a: Cost, b: Cost) -> bool {
        a.value() < b.value()
    }

    fn cost_threshold(&self) -> Cost {
        self.threshold
    }

    fn set_cost_threshold(&mut self, threshold: Cost) {
        self.threshold = threshold;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_tightening() {
        let mut obj = PathLengthObjective::new();
        assert!(obj.is_satisfied(Cost::new(100.0)));
        obj.set_cost_threshold(Cost::new(5.0));
        assert!(obj.is_satisfied(Cost::new(4.9)));
        assert!(!obj.is_satisfied(Cost::new(5.0)));
        assert_eq!(obj.combine_costs(Cost::new(1.5), Cost::new(2.0)), Cost::new(3.5));
        assert!(!obj.is_cost_better_than(obj.infinite_cost(), obj.identity_cost()));
    }
}
