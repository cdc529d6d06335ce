//! Admission gate. Decides whether an agent action may run at all.
//!
//! Pipeline: Identity → Forbidden intent → Resource pressure → Thermal →
//! Complexity. The first failing rule decides; later rules are skipped.

mod engine;
mod types;

pub use engine::AdmissionGate;
pub use types::{AdmissionDecision, AdmissionRequest, DenialKind, DeviceMetrics, Severity};
