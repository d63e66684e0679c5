//! Rating update configuration

use crate::rating::recorder::RecorderConfig;
use serde::{Deserialize, Serialize};

/// Step sizes used when recording results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Skill change per recorded match
    pub skill_step: f64,
    /// Interaction change per recorded match, per teammate
    pub interaction_step: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        let recorder = RecorderConfig::default();
        Self {
            skill_step: recorder.skill_step,
            interaction_step: recorder.interaction_step,
        }
    }
}

impl From<&RatingConfig> for RecorderConfig {
    fn from(config: &RatingConfig) -> Self {
        Self {
            skill_step: config.skill_step,
            interaction_step: config.interaction_step,
        }
    }
}
