//! Sampling effort model of abstraction edges
//!
//! Each edge carries a Beta-style success/failure count. The expected
//! number of concrete samples needed to cross the edge is
//! `(alpha + beta) / alpha`; the collision oracle seeds the counts when an
//! edge is resolved and every propagation outcome adds to them.

use serde::{Deserialize, Serialize};

use crate::common::{PlanningError, PlanningResult};

fn default_prior() -> f64 {
    1.0
}

fn default_valid_alpha_bonus() -> f64 {
    1.0
}

fn default_invalid_beta_penalty() -> f64 {
    1000.0
}

fn default_increment() -> f64 {
    1.0
}

fn default_interior_weight() -> f64 {
    0.5
}

// below any edge effort into the goal cell under the default weights
fn default_goal_edge_effort() -> f64 {
    0.5
}

/// Validity knowledge of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStatus {
    Unknown,
    Valid,
    Invalid,
}

/// Success/failure counts of an edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropagationStats {
    pub alpha: f64,
    pub beta: f64,
}

impl PropagationStats {
    /// Expected concrete samples until a propagation crosses the edge
    pub fn required_samples(&self) -> f64 {
        (self.alpha + self.beta) / self.alpha
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffortModel {
    #[serde(default = "default_prior")]
    pub prior_alpha: f64,
    #[serde(default = "default_prior")]
    pub prior_beta: f64,
    /// Added to alpha when the oracle reports an edge valid
    #[serde(default = "default_valid_alpha_bonus")]
    pub valid_alpha_bonus: f64,
    /// Added to beta when the oracle reports an edge invalid
    #[serde(default = "default_invalid_beta_penalty")]
    pub invalid_beta_penalty: f64,
    #[serde(default = "default_increment")]
    pub success_alpha_increment: f64,
    #[serde(default = "default_increment")]
    pub failure_beta_increment: f64,
    /// Scale of the required samples once an edge is interior, in (0, 1]
    #[serde(default = "default_interior_weight")]
    pub interior_weight: f64,
    /// Effort of the synthetic goal self-edge
    #[serde(default = "default_goal_edge_effort")]
    pub goal_edge_effort: f64,
}

impl Default for EffortModel {
    fn default() -> Self {
        Self {
            prior_alpha: default_prior(),
            prior_beta: default_prior(),
            valid_alpha_bonus: default_valid_alpha_bonus(),
            invalid_beta_penalty: default_invalid_beta_penalty(),
            success_alpha_increment: default_increment(),
            failure_beta_increment: default_increment(),
            interior_weight: default_interior_weight(),
            goal_edge_effort: default_goal_edge_effort(),
        }
    }
}

impl EffortModel {
    pub fn validate(&self) -> PlanningResult<()> {
        if !(self.prior_alpha > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "prior_alpha must be positive, got {}",
                self.prior_alpha
            )));
        }
        let non_negative = [
            ("prior_beta", self.prior_beta),
            ("valid_alpha_bonus", self.valid_alpha_bonus),
            ("invalid_beta_penalty", self.invalid_beta_penalty),
            ("success_alpha_increment", self.success_alpha_increment),
            ("failure_beta_increment", self.failure_beta_increment),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| !(*v >= 0.0)) {
            return Err(PlanningError::InvalidParameter(format!(
                "{} must be non-negative, got {}",
                name, value
            )));
        }
        if !(self.interior_weight > 0.0 && self.interior_weight <= 1.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "interior_weight must be in (0, 1], got {}",
                self.interior_weight
            )));
        }
        if !(self.goal_edge_effort > 0.0) {
            return Err(PlanningError::InvalidParameter(format!(
                "goal_edge_effort must be positive, got {}",
                self.goal_edge_effort
            )));
        }
        Ok(())
    }

    pub fn prior(&self) -> PropagationStats {
        PropagationStats {
            alpha: self.prior_alpha,
            beta: self.prior_beta,
        }
    }

    /// Fold the oracle's verdict into the counts
    pub fn resolve(&self, stats: &mut PropagationStats, status: EdgeStatus) {
        match status {
            EdgeStatus::Valid => stats.alpha += self.valid_alpha_bonus,
            EdgeStatus::Invalid => stats.beta += self.invalid_beta_penalty,
            EdgeStatus::Unknown => {}
        }
    }

    pub fn record_success(&self, stats: &mut PropagationStats) {
        stats.alpha += self.success_alpha_increment;
    }

    pub fn record_failure(&self, stats: &mut PropagationStats) {
        stats.beta += self.failure_beta_increment;
    }

    /// Effort of an edge whose destination has never been entered
    pub fn standard_effort(&self, stats: &PropagationStats, g_end: f64) -> f64 {
        stats.required_samples() + g_end
    }

    /// Effort of an edge whose destination has been entered at least once
    pub fn interior_effort(&self, stats: &PropagationStats, g_end: f64) -> f64 {
        self.interior_weight * stats.required_samples() + g_end
    }
}
