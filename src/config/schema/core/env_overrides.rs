use super::Config;

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("WARDLINE_AUTH_KEY")
            && !key.is_empty()
        {
            self.gate.auth_key = key;
        }

        if let Ok(level) = std::env::var("WARDLINE_LOG_LEVEL")
            && !level.is_empty()
        {
            self.observability.log_level = level;
        }

        if let Ok(ceiling_str) = std::env::var("WARDLINE_CPU_CEILING")
            && let Ok(ceiling) = ceiling_str.parse::<f64>()
            && (0.0..=1.0).contains(&ceiling)
        {
            self.gate.cpu_ceiling = ceiling;
        }

        if let Ok(interval_str) = std::env::var("WARDLINE_STREAM_INTERVAL_MS")
            && let Ok(interval) = interval_str.parse::<u64>()
            && interval > 0
        {
            self.stream.interval_ms = interval;
        }
    }
}
