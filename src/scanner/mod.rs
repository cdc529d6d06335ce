//! Artifact scanner: static risk scoring for generated code.
//!
//! A scan matches the code against a fixed set of risk patterns, penalizes
//! size, and settles the artifact as passed or vetoed. Every completed scan
//! is recorded on the agent-activity channel.

mod patterns;
mod report;

pub use patterns::{RiskPattern, detect};
pub use report::{SecurityClass, SecurityReport, Violation};

use serde_json::json;
use std::sync::Arc;

use crate::artifact::Artifact;
use crate::config::ScannerConfig;
use crate::error::ScanError;
use crate::sensory::SensoryStore;

/// Score lost per violation of either kind.
const VIOLATION_PENALTY: i64 = 20;
/// Lines per point of graduated size penalty.
const LINES_PER_PENALTY_POINT: usize = 10;

pub struct ArtifactScanner {
    config: ScannerConfig,
    store: Arc<SensoryStore>,
}

impl ArtifactScanner {
    pub fn new(config: ScannerConfig, store: Arc<SensoryStore>) -> Self {
        Self { config, store }
    }

    /// Score `code` without touching any artifact or the event log.
    pub fn evaluate(&self, code: &str) -> SecurityReport {
        let mut violations: Vec<Violation> =
            detect(code).into_iter().map(Violation::Security).collect();

        let line_count = code.lines().count();
        if line_count > self.config.stability_line_limit {
            violations.push(Violation::Stability { line_count });
        }

        let violation_penalty = i64::try_from(violations.len())
            .unwrap_or(i64::MAX)
            .saturating_mul(VIOLATION_PENALTY);
        let size_penalty = i64::try_from(
            line_count.saturating_sub(self.config.size_penalty_baseline) / LINES_PER_PENALTY_POINT,
        )
        .unwrap_or(i64::MAX);
        let score = 100_i64
            .saturating_sub(violation_penalty)
            .saturating_sub(size_penalty)
            .clamp(0, 100);

        let approved =
            score >= self.config.approval_score && !violations.iter().any(Violation::is_security);

        SecurityReport {
            score,
            approved,
            violations,
            line_count,
            security_class: self.classify(score),
        }
    }

    fn classify(&self, score: i64) -> SecurityClass {
        if score < self.config.red_below {
            SecurityClass::Red
        } else if score < self.config.yellow_below {
            SecurityClass::Yellow
        } else {
            SecurityClass::Green
        }
    }

    /// Scan a pending artifact, settle its status, and record the outcome.
    pub fn scan(&self, artifact: &mut Artifact) -> Result<SecurityReport, ScanError> {
        let report = self.evaluate(&artifact.code);
        let status = artifact.settle(report.clone())?;

        let details = format!(
            "Scan for '{}': Result={status} (Score: {})",
            artifact.name, report.score
        );
        if let Err(e) = self.store.record_agent_activity(
            &self.config.agent_name,
            "ChaosScan",
            json!({
                "details": details,
                "artifact": artifact.name,
                "score": report.score,
                "approved": report.approved,
            }),
        ) {
            tracing::warn!(error = %e, "scanner.record_failed");
        }

        if report.approved {
            tracing::info!(artifact = %artifact.name, score = report.score, "scanner.passed");
        } else {
            tracing::warn!(
                artifact = %artifact.name,
                score = report.score,
                violations = report.violations.len(),
                "scanner.vetoed"
            );
        }
        Ok(report)
    }
}
