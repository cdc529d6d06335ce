//! System vitals: the health reading consumed by the admission gate.
//!
//! The gate never talks to the OS directly; it pulls a [`VitalsSnapshot`]
//! from a [`VitalsProbe`]. A failing probe is replaced by
//! [`VitalsSnapshot::fallback`] so admission can always proceed.

mod fixed;
mod monitor;
mod proc;

pub use fixed::{FailingProbe, FixedProbe};
pub use monitor::VitalsMonitor;
pub use proc::ProcProbe;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::ProbeError;

/// Fallback CPU load fraction used when the probe fails.
pub const FALLBACK_CPU_LOAD: f64 = 0.5;
/// Fallback memory fraction used when the probe fails.
pub const FALLBACK_MEM_PERCENT: f64 = 0.5;
/// Fallback temperature used when the probe fails.
pub const FALLBACK_TEMP_C: f64 = 35.0;

/// Point-in-time health reading.
///
/// `temp_c` and `temp_delta` are optional because many hosts expose no
/// thermal sensor; the gate resolves missing values against request
/// overrides and its configured fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalsSnapshot {
    /// CPU load as a fraction in `0.0..=1.0`.
    pub cpu_load: f64,
    /// Memory in use as a fraction in `0.0..=1.0`.
    pub mem_percent: f64,
    pub temp_c: Option<f64>,
    /// Temperature rise over the probe's trailing window.
    pub temp_delta: Option<f64>,
    pub timestamp: DateTime<Utc>,
    /// Set when this reading is the fallback rather than a measurement.
    #[serde(default)]
    pub degraded: bool,
}

impl VitalsSnapshot {
    pub fn new(cpu_load: f64, mem_percent: f64, temp_c: Option<f64>) -> Self {
        Self {
            cpu_load: cpu_load.clamp(0.0, 1.0),
            mem_percent: mem_percent.clamp(0.0, 1.0),
            temp_c,
            temp_delta: None,
            timestamp: Utc::now(),
            degraded: false,
        }
    }

    #[must_use]
    pub fn with_temp_delta(mut self, temp_delta: f64) -> Self {
        self.temp_delta = Some(temp_delta);
        self
    }

    /// The documented substitute reading used when the probe fails.
    pub fn fallback() -> Self {
        Self {
            cpu_load: FALLBACK_CPU_LOAD,
            mem_percent: FALLBACK_MEM_PERCENT,
            temp_c: Some(FALLBACK_TEMP_C),
            temp_delta: Some(0.0),
            timestamp: Utc::now(),
            degraded: true,
        }
    }
}

/// Source of health readings.
pub trait VitalsProbe: Send + Sync {
    /// Take one reading. May block for the probe's bounded sampling window.
    fn sample(&self) -> impl Future<Output = Result<VitalsSnapshot, ProbeError>> + Send;

    fn name(&self) -> &str;
}

/// Sample `probe`, substituting [`VitalsSnapshot::fallback`] on failure.
pub async fn sample_or_fallback<P: VitalsProbe>(probe: &P) -> VitalsSnapshot {
    match probe.sample().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(probe = probe.name(), error = %e, "vitals.fallback");
            VitalsSnapshot::fallback()
        }
    }
}
