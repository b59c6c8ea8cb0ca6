//! Aggregate configuration for the control loop.
//!
//! Every table and key is optional; anything missing takes the component
//! default. Loading never validates. Call [`BreathConfig::validate`] to
//! reject values that only make sense arithmetically.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::drift::DriftConfig;
use crate::error::{ConfigError, Result};
use crate::guardrails::GuardConfig;
use crate::scheduler::SchedulerConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathConfig {
    pub drift: DriftConfig,
    pub guard: GuardConfig,
    pub scheduler: SchedulerConfig,
}

impl BreathConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Reject non-finite weights and thresholds and a negative phase epsilon.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("drift.length_growth_weight", self.drift.length_growth_weight),
            ("drift.repeat_weight", self.drift.repeat_weight),
            ("drift.drift_threshold", self.drift.drift_threshold),
            ("guard.phase_ratio_target", self.guard.phase_ratio_target),
            ("guard.phase_ratio_epsilon", self.guard.phase_ratio_epsilon),
        ];
        for (key, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{key} must be finite, got {value}")));
            }
        }
        if self.guard.phase_ratio_epsilon < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "guard.phase_ratio_epsilon must be >= 0, got {}",
                self.guard.phase_ratio_epsilon
            )));
        }
        Ok(())
    }
}
