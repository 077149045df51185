//! Error types for kinodynamic_planning

use thiserror::Error;

/// Main error type for the planners and samplers
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanningError {
    /// No valid start state was supplied
    #[error("There are no valid initial states")]
    InvalidStart,
    /// The goal region could not provide a state to anchor the search
    #[error("Goal region cannot be sampled")]
    InvalidGoal,
    /// A sampling variant the sampler does not implement
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(&'static str),
    /// The edge frontier was accessed while empty
    #[error("Edge frontier accessed while empty")]
    EmptyFrontier,
    /// A cell was asked for a registered state but holds none
    #[error("Cell {0} has no registered states")]
    EmptyCell(usize),
    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    /// Internal structural invariant broken
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl From<std::io::Error> for PlanningError {
    fn from(e: std::io::Error) -> Self {
        PlanningError::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for PlanningError {
    fn from(e: serde_yaml::Error) -> Self {
        PlanningError::Config(e.to_string())
    }
}

/// Result type alias for planning operations
pub type PlanningResult<T> = Result<T, PlanningError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanningError::UnsupportedOperation("sample_near");
        assert_eq!(format!("{}", err), "Unsupported operation: sample_near");
        assert_eq!(
            PlanningError::EmptyCell(3).to_string(),
            "Cell 3 has no registered states"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PlanningError = io_err.into();
        assert!(matches!(err, PlanningError::Config(_)));
    }
}
