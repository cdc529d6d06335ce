use serde::{Deserialize, Serialize};

use crate::sensory::{AGENT_ACTIVITY, SYSTEM_VITALS};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensoryConfig {
    /// Channels accepted by the store; recording on any other name is rejected
    #[serde(default = "default_channels")]
    pub channels: Vec<String>,
    /// Ring capacity of each channel (default: 1000)
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Capacity of the cross-channel history ring (default: 10000)
    #[serde(default = "default_total_capacity")]
    pub total_capacity: usize,
    /// Pattern cache size that triggers a bulk trim (default: 1000)
    #[serde(default = "default_cache_soft_ceiling")]
    pub cache_soft_ceiling: usize,
    /// Pattern cache size after a bulk trim (default: 500)
    #[serde(default = "default_cache_trim_target")]
    pub cache_trim_target: usize,
    /// Start with ingestion enabled
    #[serde(default = "default_true")]
    pub awake_on_start: bool,
}

fn default_channels() -> Vec<String> {
    vec![
        AGENT_ACTIVITY.into(),
        SYSTEM_VITALS.into(),
        "USER_INTERACTION".into(),
        "ERROR_STATES".into(),
    ]
}

fn default_channel_capacity() -> usize {
    1000
}

fn default_total_capacity() -> usize {
    10_000
}

fn default_cache_soft_ceiling() -> usize {
    1000
}

fn default_cache_trim_target() -> usize {
    500
}

fn default_true() -> bool {
    true
}

impl Default for SensoryConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            channel_capacity: default_channel_capacity(),
            total_capacity: default_total_capacity(),
            cache_soft_ceiling: default_cache_soft_ceiling(),
            cache_trim_target: default_cache_trim_target(),
            awake_on_start: true,
        }
    }
}
