use super::super::{
    GateConfig, ObservabilityConfig, ScannerConfig, SensoryConfig, StreamConfig, VitalsConfig,
};
use crate::sensory::AGENT_ACTIVITY;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gate: GateConfig,

    #[serde(default)]
    pub sensory: SensoryConfig,

    #[serde(default)]
    pub scanner: ScannerConfig,

    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub vitals: VitalsConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let sensory = &self.sensory;
        if sensory.channel_capacity == 0 {
            bail!("sensory.channel_capacity must be greater than zero");
        }
        if sensory.total_capacity == 0 {
            bail!("sensory.total_capacity must be greater than zero");
        }
        if sensory.cache_trim_target >= sensory.cache_soft_ceiling {
            bail!(
                "sensory.cache_trim_target ({}) must be below cache_soft_ceiling ({})",
                sensory.cache_trim_target,
                sensory.cache_soft_ceiling
            );
        }
        if !sensory.channels.iter().any(|c| c == AGENT_ACTIVITY) {
            bail!("sensory.channels must include {AGENT_ACTIVITY}");
        }

        let scanner = &self.scanner;
        if !(0..=100).contains(&scanner.approval_score) {
            bail!("scanner.approval_score must be within 0..=100");
        }
        if scanner.red_below > scanner.yellow_below {
            bail!("scanner.red_below must not exceed scanner.yellow_below");
        }

        if self.stream.interval_ms == 0 || self.stream.batch_size == 0 {
            bail!("stream.interval_ms and stream.batch_size must be greater than zero");
        }

        let gate = &self.gate;
        if !(0.0..=1.0).contains(&gate.cpu_ceiling) {
            bail!("gate.cpu_ceiling must be a fraction within 0.0..=1.0");
        }
        Ok(())
    }
}
