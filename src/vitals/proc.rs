//! Linux vitals probe backed by `/proc` and `/sys/class/thermal`.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::{VitalsProbe, VitalsSnapshot};
use crate::config::VitalsConfig;
use crate::error::ProbeError;

/// Trailing window over which `temp_delta` is measured.
const TEMP_DELTA_WINDOW: Duration = Duration::from_secs(20);

pub struct ProcProbe {
    proc_root: PathBuf,
    thermal_root: PathBuf,
    sample_window: Duration,
    thermal_zones: Vec<String>,
    temp_history: Mutex<VecDeque<(Instant, f64)>>,
}

impl ProcProbe {
    pub fn new(config: &VitalsConfig) -> Self {
        Self::with_roots(config, "/proc", "/sys/class/thermal")
    }

    pub fn with_roots(
        config: &VitalsConfig,
        proc_root: impl Into<PathBuf>,
        thermal_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            proc_root: proc_root.into(),
            thermal_root: thermal_root.into(),
            sample_window: Duration::from_millis(config.sample_window_ms),
            thermal_zones: config.thermal_zones.clone(),
            temp_history: Mutex::new(VecDeque::new()),
        }
    }

    async fn read_cpu_times(&self) -> Result<CpuTimes, ProbeError> {
        let stat = tokio::fs::read_to_string(self.proc_root.join("stat")).await?;
        parse_cpu_times(&stat).ok_or_else(|| ProbeError::Malformed("/proc/stat".into()))
    }

    async fn read_mem_fraction(&self) -> Result<f64, ProbeError> {
        let meminfo = tokio::fs::read_to_string(self.proc_root.join("meminfo")).await?;
        parse_mem_fraction(&meminfo).ok_or_else(|| ProbeError::Malformed("/proc/meminfo".into()))
    }

    /// First configured zone that reports a temperature, in °C.
    async fn read_temp_c(&self) -> Option<f64> {
        let mut entries = tokio::fs::read_dir(&self.thermal_root).await.ok()?;
        let mut zones = Vec::new();
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            let Ok(kind) = tokio::fs::read_to_string(path.join("type")).await else {
                continue;
            };
            zones.push((kind.trim().to_string(), path));
        }

        for wanted in &self.thermal_zones {
            let Some((_, path)) = zones.iter().find(|(kind, _)| kind == wanted) else {
                continue;
            };
            if let Ok(raw) = tokio::fs::read_to_string(path.join("temp")).await
                && let Ok(millis) = raw.trim().parse::<f64>()
            {
                return Some(millis / 1000.0);
            }
        }
        None
    }

    fn observe_temp(&self, temp_c: f64) -> f64 {
        let now = Instant::now();
        let mut history = self
            .temp_history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        while history
            .front()
            .is_some_and(|(at, _)| now.duration_since(*at) > TEMP_DELTA_WINDOW)
        {
            history.pop_front();
        }
        let delta = history.front().map_or(0.0, |(_, oldest)| temp_c - oldest);
        history.push_back((now, temp_c));
        delta
    }
}

impl VitalsProbe for ProcProbe {
    async fn sample(&self) -> Result<VitalsSnapshot, ProbeError> {
        let before = self.read_cpu_times().await?;
        tokio::time::sleep(self.sample_window).await;
        let after = self.read_cpu_times().await?;
        let cpu_load = after.busy_fraction_since(&before);
        let mem_percent = self.read_mem_fraction().await?;

        let mut snapshot = VitalsSnapshot::new(cpu_load, mem_percent, None);
        if let Some(temp_c) = self.read_temp_c().await {
            let delta = self.observe_temp(temp_c);
            snapshot.temp_c = Some(temp_c);
            snapshot.temp_delta = Some(delta);
        }
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "proc"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuTimes {
    idle: u64,
    total: u64,
}

impl CpuTimes {
    #[allow(clippy::cast_precision_loss)]
    fn busy_fraction_since(&self, earlier: &Self) -> f64 {
        let total = self.total.saturating_sub(earlier.total);
        if total == 0 {
            return 0.0;
        }
        let idle = self.idle.saturating_sub(earlier.idle);
        (total.saturating_sub(idle) as f64 / total as f64).clamp(0.0, 1.0)
    }
}

/// Aggregate `cpu` line of `/proc/stat`; idle includes iowait.
fn parse_cpu_times(stat: &str) -> Option<CpuTimes> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    if fields.len() < 4 {
        return None;
    }
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    Some(CpuTimes {
        idle,
        total: fields.iter().sum(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn parse_mem_fraction(meminfo: &str) -> Option<f64> {
    let field = |name: &str| -> Option<u64> {
        meminfo
            .lines()
            .find(|l| l.starts_with(name))?
            .split_whitespace()
            .nth(1)?
            .parse()
            .ok()
    };
    let total = field("MemTotal:")?;
    let available = field("MemAvailable:")?;
    if total == 0 {
        return None;
    }
    Some(total.saturating_sub(available) as f64 / total as f64)
}
