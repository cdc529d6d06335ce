use serde::{Deserialize, Serialize};

/// Admission gate thresholds and secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Shared secret every admission request must present. Empty denies all.
    #[serde(default)]
    pub auth_key: String,
    /// Lowercase terms that deny a request outright when present anywhere in it
    #[serde(default = "default_forbidden_intents")]
    pub forbidden_intents: Vec<String>,
    /// CPU load fraction above which requests are deferred (default: 0.90)
    #[serde(default = "default_cpu_ceiling")]
    pub cpu_ceiling: f64,
    /// Temperature in °C above which requests are deferred (default: 47.0)
    #[serde(default = "default_temp_ceiling_c")]
    pub temp_ceiling_c: f64,
    /// Temperature rise in °C above which requests are deferred (default: 9.0)
    #[serde(default = "default_temp_delta_ceiling_c")]
    pub temp_delta_ceiling_c: f64,
    /// Temperature assumed when neither request nor probe supplies one
    #[serde(default = "default_fallback_temp_c")]
    pub fallback_temp_c: f64,
    /// Projected cost units (chars / 4) allowed without explicit confirmation
    #[serde(default = "default_complexity_ceiling")]
    pub complexity_ceiling: usize,
}

fn default_forbidden_intents() -> Vec<String> {
    vec!["bootloader".into(), "unlock_partitions".into()]
}

fn default_cpu_ceiling() -> f64 {
    0.90
}

fn default_temp_ceiling_c() -> f64 {
    47.0
}

fn default_temp_delta_ceiling_c() -> f64 {
    9.0
}

fn default_fallback_temp_c() -> f64 {
    35.0
}

fn default_complexity_ceiling() -> usize {
    2048
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            auth_key: String::new(),
            forbidden_intents: default_forbidden_intents(),
            cpu_ceiling: default_cpu_ceiling(),
            temp_ceiling_c: default_temp_ceiling_c(),
            temp_delta_ceiling_c: default_temp_delta_ceiling_c(),
            fallback_temp_c: default_fallback_temp_c(),
            complexity_ceiling: default_complexity_ceiling(),
        }
    }
}
