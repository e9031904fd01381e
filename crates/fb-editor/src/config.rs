//! Editor configuration.
//!
//! Every field has a default, so a partial JSON document (or `{}`) is a
//! valid configuration:
//!
//! ```json
//! { "dragThreshold": 8, "policy": { "maxRowChildren": 12 } }
//! ```

use crate::zone::{Thresholds, ZoneStrategy};
use fb_core::policy::ContainerPolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pointer travel (pixels, either axis) that turns a press into a drag.
pub const DEFAULT_DRAG_THRESHOLD: f32 = 5.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid editor config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid editor config: {0}")]
    Invalid(String),
}

/// Tunables for zone classification, drag detection, and container rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    pub thresholds: Thresholds,
    pub zone_strategy: ZoneStrategy,
    pub drag_threshold: f32,
    pub policy: ContainerPolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            zone_strategy: ZoneStrategy::default(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
            policy: ContainerPolicy::default(),
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Thresholds {
            horizontal,
            vertical,
        } = self.thresholds;
        for (name, band) in [("horizontal", horizontal), ("vertical", vertical)] {
            if !(0.0..=0.5).contains(&band) {
                return Err(ConfigError::Invalid(format!(
                    "{name} threshold {band} outside 0.0..=0.5"
                )));
            }
        }
        if !(self.drag_threshold >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "drag threshold {} must be non-negative",
                self.drag_threshold
            )));
        }
        if self.policy.max_row_children == 0 {
            return Err(ConfigError::Invalid(
                "maxRowChildren must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
