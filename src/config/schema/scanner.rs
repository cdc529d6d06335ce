use serde::{Deserialize, Serialize};

/// Artifact scoring thresholds. Approval and classification bands are
/// configured independently and are allowed to disagree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Minimum score for approval (default: 70)
    #[serde(default = "default_approval_score")]
    pub approval_score: i64,
    /// Scores below this are classed Red (default: 40)
    #[serde(default = "default_red_below")]
    pub red_below: i64,
    /// Scores below this (and not Red) are classed Yellow (default: 80)
    #[serde(default = "default_yellow_below")]
    pub yellow_below: i64,
    /// Line count above which a stability warning is raised (default: 150)
    #[serde(default = "default_stability_line_limit")]
    pub stability_line_limit: usize,
    /// Lines allowed before the graduated size penalty starts (default: 50)
    #[serde(default = "default_size_penalty_baseline")]
    pub size_penalty_baseline: usize,
    /// Agent name recorded on scan outcome events
    #[serde(default = "default_agent_name")]
    pub agent_name: String,
}

fn default_approval_score() -> i64 {
    70
}

fn default_red_below() -> i64 {
    40
}

fn default_yellow_below() -> i64 {
    80
}

fn default_stability_line_limit() -> usize {
    150
}

fn default_size_penalty_baseline() -> usize {
    50
}

fn default_agent_name() -> String {
    "KAI".into()
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            approval_score: default_approval_score(),
            red_below: default_red_below(),
            yellow_below: default_yellow_below(),
            stability_line_limit: default_stability_line_limit(),
            size_penalty_baseline: default_size_penalty_baseline(),
            agent_name: default_agent_name(),
        }
    }
}
