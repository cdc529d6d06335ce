use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    /// Poll cadence of the activity broadcaster in milliseconds (default: 800)
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Events pulled from the activity channel per tick (default: 5)
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_interval_ms() -> u64 {
    800
}

fn default_batch_size() -> usize {
    5
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            batch_size: default_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VitalsConfig {
    /// CPU sampling window in milliseconds (default: 100)
    #[serde(default = "default_sample_window_ms")]
    pub sample_window_ms: u64,
    /// Period of the background vitals monitor in seconds; 0 disables it
    #[serde(default = "default_monitor_interval_secs")]
    pub monitor_interval_secs: u64,
    /// Thermal zone names probed in order (sysfs `type` file contents)
    #[serde(default = "default_thermal_zones")]
    pub thermal_zones: Vec<String>,
}

fn default_sample_window_ms() -> u64 {
    100
}

fn default_monitor_interval_secs() -> u64 {
    5
}

fn default_thermal_zones() -> Vec<String> {
    vec!["cpu-thermal".into(), "x86_pkg_temp".into(), "coretemp".into()]
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            sample_window_ms: default_sample_window_ms(),
            monitor_interval_secs: default_monitor_interval_secs(),
            thermal_zones: default_thermal_zones(),
        }
    }
}
