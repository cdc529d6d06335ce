use std::sync::Arc;

use super::types::{AdmissionDecision, AdmissionRequest, DenialKind};
use crate::config::GateConfig;
use crate::control::ControlPlane;
use crate::vitals::{VitalsProbe, VitalsSnapshot, sample_or_fallback};

/// Stateless admission gate. Every check reads the configured thresholds
/// and the control plane; nothing is mutated.
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    config: GateConfig,
    control: Arc<ControlPlane>,
}

type Veto = (DenialKind, String);

impl AdmissionGate {
    pub fn new(config: GateConfig, control: Arc<ControlPlane>) -> Self {
        Self { config, control }
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Sample `probe` (falling back on failure) and run [`Self::check`].
    pub async fn evaluate<P: VitalsProbe>(
        &self,
        request: &AdmissionRequest,
        probe: &P,
    ) -> AdmissionDecision {
        let vitals = sample_or_fallback(probe).await;
        self.check(request, vitals)
    }

    /// Run the rule chain against one request. The first failing rule
    /// decides.
    pub fn check(&self, request: &AdmissionRequest, vitals: VitalsSnapshot) -> AdmissionDecision {
        if let Some((kind, reason)) = self.check_identity(request) {
            tracing::warn!(denial = %kind, "gate.denied");
            return AdmissionDecision::deny(kind, reason, vitals);
        }

        let veto = self
            .check_intent(request)
            .or_else(|| self.check_resources(&vitals))
            .or_else(|| self.check_thermal(request, &vitals))
            .or_else(|| self.check_complexity(request));

        match veto {
            None => {
                tracing::debug!(degraded = vitals.degraded, "gate.approved");
                AdmissionDecision::approve("stable", vitals)
            }
            Some((kind, reason)) if !self.control.veto_enabled() => {
                tracing::warn!(denial = %kind, "gate.veto_suppressed");
                let reason = format!("veto disabled; suppressed: {reason}");
                AdmissionDecision::approve(reason, vitals)
            }
            Some((kind, reason)) => {
                tracing::warn!(denial = %kind, reason = %reason, "gate.denied");
                AdmissionDecision::deny(kind, reason, vitals)
            }
        }
    }

    fn check_identity(&self, request: &AdmissionRequest) -> Option<Veto> {
        if constant_time_eq(&request.auth_key, &self.config.auth_key)
            && !self.config.auth_key.is_empty()
        {
            return None;
        }
        Some((
            DenialKind::AuthenticationFailure,
            "authentication failed: invalid auth key".to_string(),
        ))
    }

    fn check_intent(&self, request: &AdmissionRequest) -> Option<Veto> {
        let haystack = serde_json::to_string(request)
            .unwrap_or_else(|_| request.message.clone())
            .to_lowercase();
        let term = self
            .config
            .forbidden_intents
            .iter()
            .find(|term| !term.is_empty() && haystack.contains(&term.to_lowercase()))?;
        Some((
            DenialKind::ForbiddenIntent,
            format!("forbidden intent: request mentions '{term}'"),
        ))
    }

    fn check_resources(&self, vitals: &VitalsSnapshot) -> Option<Veto> {
        (vitals.cpu_load > self.config.cpu_ceiling).then(|| {
            (
                DenialKind::ResourceExhaustion,
                format!(
                    "resource pressure: cpu load {:.0}% exceeds {:.0}%",
                    vitals.cpu_load * 100.0,
                    self.config.cpu_ceiling * 100.0
                ),
            )
        })
    }

    fn check_thermal(&self, request: &AdmissionRequest, vitals: &VitalsSnapshot) -> Option<Veto> {
        let metrics = request.device_metrics.as_ref();
        let temp = metrics
            .and_then(|m| m.temperature_c)
            .or(vitals.temp_c)
            .unwrap_or(self.config.fallback_temp_c);
        let delta = metrics
            .and_then(|m| m.temp_delta_last_20s)
            .or(vitals.temp_delta)
            .unwrap_or(0.0);

        if temp > self.config.temp_ceiling_c || delta > self.config.temp_delta_ceiling_c {
            return Some((
                DenialKind::ThermalEmergency,
                format!("thermal emergency: {temp:.1}°C, rising {delta:.1}°C"),
            ));
        }
        None
    }

    fn check_complexity(&self, request: &AdmissionRequest) -> Option<Veto> {
        let projected = request.message.chars().count() / 4;
        if projected > self.config.complexity_ceiling && !request.user_confirmed_long {
            return Some((
                DenialKind::ComplexityOverrun,
                format!(
                    "complexity: projected {projected} units exceeds {}; confirmation required",
                    self.config.complexity_ceiling
                ),
            ));
        }
        None
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    use subtle::ConstantTimeEq;
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
