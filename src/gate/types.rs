use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::vitals::VitalsSnapshot;

// ── Request ──────────────────────────────────────────────────────────────────

/// Device-reported thermal readings that override the probe's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_c: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_delta_last_20s: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdmissionRequest {
    #[serde(default)]
    pub auth_key: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_metrics: Option<DeviceMetrics>,
    /// Caller explicitly accepts a long, expensive request.
    #[serde(default)]
    pub user_confirmed_long: bool,
    /// Any other request fields, kept verbatim.
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl AdmissionRequest {
    pub fn new(auth_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            auth_key: auth_key.into(),
            message: message.into(),
            ..Self::default()
        }
    }
}

// ── Decision ─────────────────────────────────────────────────────────────────

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    #[default]
    None,
    Medium,
    High,
    Critical,
}

/// Which rule of the chain denied the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DenialKind {
    AuthenticationFailure,
    ForbiddenIntent,
    ResourceExhaustion,
    ThermalEmergency,
    ComplexityOverrun,
}

impl DenialKind {
    pub fn severity(self) -> Severity {
        match self {
            Self::AuthenticationFailure | Self::ForbiddenIntent | Self::ThermalEmergency => {
                Severity::Critical
            }
            Self::ResourceExhaustion => Severity::High,
            Self::ComplexityOverrun => Severity::Medium,
        }
    }

    pub fn cooldown_seconds(self) -> u64 {
        match self {
            Self::AuthenticationFailure => 3600,
            Self::ForbiddenIntent => 300,
            Self::ResourceExhaustion => 15,
            Self::ThermalEmergency => 60,
            Self::ComplexityOverrun => 0,
        }
    }
}

/// Outcome of one admission check. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    pub approved: bool,
    pub reason: String,
    pub severity: Severity,
    pub cooldown_seconds: u64,
    pub vitals: VitalsSnapshot,
    /// Which rule denied the request. Absent on approvals, so approved
    /// decisions carry only the base fields plus `degraded`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denial: Option<DenialKind>,
    /// Set when the vitals behind this decision were the fallback reading.
    #[serde(default)]
    pub degraded: bool,
}

impl AdmissionDecision {
    pub(super) fn approve(reason: impl Into<String>, vitals: VitalsSnapshot) -> Self {
        let degraded = vitals.degraded;
        Self {
            approved: true,
            reason: reason.into(),
            severity: Severity::None,
            cooldown_seconds: 0,
            vitals,
            denial: None,
            degraded,
        }
    }

    pub(super) fn deny(
        kind: DenialKind,
        reason: impl Into<String>,
        vitals: VitalsSnapshot,
    ) -> Self {
        let degraded = vitals.degraded;
        Self {
            approved: false,
            reason: reason.into(),
            severity: kind.severity(),
            cooldown_seconds: kind.cooldown_seconds(),
            vitals,
            denial: Some(kind),
            degraded,
        }
    }
}
