use chrono::Utc;

use super::{VitalsProbe, VitalsSnapshot};
use crate::error::ProbeError;

/// Probe that always reports the same reading, re-stamped per sample.
#[derive(Debug, Clone)]
pub struct FixedProbe {
    snapshot: VitalsSnapshot,
}

impl FixedProbe {
    pub fn new(snapshot: VitalsSnapshot) -> Self {
        Self { snapshot }
    }

    /// A calm host: low load, cool, no thermal drift.
    pub fn nominal() -> Self {
        Self::new(VitalsSnapshot::new(0.2, 0.3, Some(36.0)).with_temp_delta(0.0))
    }
}

impl VitalsProbe for FixedProbe {
    async fn sample(&self) -> Result<VitalsSnapshot, ProbeError> {
        let mut snapshot = self.snapshot.clone();
        snapshot.timestamp = Utc::now();
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Probe that always fails; exercises the degraded admission path.
#[derive(Debug, Clone)]
pub struct FailingProbe {
    reason: String,
}

impl FailingProbe {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl VitalsProbe for FailingProbe {
    async fn sample(&self) -> Result<VitalsSnapshot, ProbeError> {
        Err(ProbeError::Unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
