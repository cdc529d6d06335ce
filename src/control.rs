//! Process-wide control plane.
//!
//! Holds the toggles flipped by operators and read by every request handler.
//! Reads and writes are relaxed: a handler may observe a toggle a moment
//! late, which is acceptable for these flags.

use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct ControlPlane {
    veto_enabled: AtomicBool,
    ingestion_enabled: AtomicBool,
}

/// Point-in-time copy of the control flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControlSnapshot {
    pub veto_enabled: bool,
    pub ingestion_enabled: bool,
}

impl ControlPlane {
    pub fn new(veto_enabled: bool, ingestion_enabled: bool) -> Self {
        Self {
            veto_enabled: AtomicBool::new(veto_enabled),
            ingestion_enabled: AtomicBool::new(ingestion_enabled),
        }
    }

    pub fn veto_enabled(&self) -> bool {
        self.veto_enabled.load(Ordering::Relaxed)
    }

    pub fn set_veto_enabled(&self, enabled: bool) {
        let previous = self.veto_enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            tracing::info!(enabled, "control.veto_toggled");
        }
    }

    pub fn ingestion_enabled(&self) -> bool {
        self.ingestion_enabled.load(Ordering::Relaxed)
    }

    pub fn set_ingestion_enabled(&self, enabled: bool) {
        let previous = self.ingestion_enabled.swap(enabled, Ordering::Relaxed);
        if previous != enabled {
            tracing::info!(enabled, "control.ingestion_toggled");
        }
    }

    pub fn snapshot(&self) -> ControlSnapshot {
        ControlSnapshot {
            veto_enabled: self.veto_enabled(),
            ingestion_enabled: self.ingestion_enabled(),
        }
    }
}

impl Default for ControlPlane {
    fn default() -> Self {
        Self::new(true, true)
    }
}
