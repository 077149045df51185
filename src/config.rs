//! Planner configuration loaded from YAML

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::PlanningResult;
use crate::path_planning::SstConfig;
use crate::sampling::GuidedSamplerConfig;

/// Settings of both planning components
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// SST* tree planner settings
    #[serde(default)]
    pub sst: SstConfig,

    /// Guided sampler settings, including the effort model
    #[serde(default)]
    pub guided: GuidedSamplerConfig,
}

impl PlannerConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> PlanningResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(yaml: &str) -> PlanningResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> PlanningResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> PlanningResult<()> {
        self.sst.validate()?;
        self.guided.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PlanningError;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = r#"
sst:
  selection_radius: 0.5
  seed: 3
guided:
  effort:
    interior_weight: 0.25
"#;
        let config = PlannerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.sst.selection_radius, 0.5);
        assert_eq!(config.sst.seed, Some(3));
        assert_eq!(config.sst.goal_bias, 0.05);
        assert_eq!(config.guided.effort.interior_weight, 0.25);
        assert_eq!(config.guided.effort.goal_edge_effort, 0.5);
        assert_eq!(config.guided.effort.invalid_beta_penalty, 1000.0);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = PlannerConfig::from_yaml("{}").unwrap();
        assert_eq!(config.sst.n0, 1000.0);
        assert_eq!(config.guided.state_radius, 0.1);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let result = PlannerConfig::from_yaml("sst:\n  xi: 2.0\n");
        assert!(matches!(result, Err(PlanningError::InvalidParameter(_))));

        let result = PlannerConfig::from_yaml("sst: [1, 2");
        assert!(matches!(result, Err(PlanningError::Config(_))));
    }

    #[test]
    fn test_yaml_round_trip_keeps_values() {
        let mut config = PlannerConfig::default();
        config.sst.xi = 0.25;
        let yaml = config.to_yaml().unwrap();
        assert_eq!(PlannerConfig::from_yaml(&yaml).unwrap().sst.xi, 0.25);
    }

    #[test]
    fn test_missing_file() {
        let result = PlannerConfig::load(Path::new("/nonexistent/planner.yaml"));
        assert!(matches!(result, Err(PlanningError::Config(_))));
    }
}
