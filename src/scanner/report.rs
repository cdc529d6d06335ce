use serde::{Deserialize, Serialize};

use super::patterns::RiskPattern;

/// One finding. Serialized as the human-readable message consumers display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Violation {
    Security(RiskPattern),
    Stability { line_count: usize },
}

const SECURITY_PREFIX: &str = "Security Violation: Dangerous pattern detected '";
const STABILITY_PREFIX: &str = "Stability Warning: Artifact size (";
const STABILITY_SUFFIX: &str = " lines) exceeds stability limit.";

impl Violation {
    pub fn is_security(&self) -> bool {
        matches!(self, Self::Security(_))
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Security(pattern) => write!(f, "{SECURITY_PREFIX}{}'", pattern.source()),
            Self::Stability { line_count } => {
                write!(f, "{STABILITY_PREFIX}{line_count}{STABILITY_SUFFIX}")
            }
        }
    }
}

impl From<Violation> for String {
    fn from(violation: Violation) -> Self {
        violation.to_string()
    }
}

impl TryFrom<String> for Violation {
    type Error = String;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        if let Some(source) = text
            .strip_prefix(SECURITY_PREFIX)
            .and_then(|rest| rest.strip_suffix('\''))
            && let Some(pattern) = RiskPattern::from_source(source)
        {
            return Ok(Self::Security(pattern));
        }
        if let Some(count) = text
            .strip_prefix(STABILITY_PREFIX)
            .and_then(|rest| rest.strip_suffix(STABILITY_SUFFIX))
            && let Ok(line_count) = count.parse()
        {
            return Ok(Self::Stability { line_count });
        }
        Err(format!("unrecognized violation: {text}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum SecurityClass {
    Red,
    Yellow,
    Green,
}

/// Result of one artifact scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityReport {
    /// 0..=100, higher is safer.
    pub score: i64,
    pub approved: bool,
    pub violations: Vec<Violation>,
    pub line_count: usize,
    pub security_class: SecurityClass,
}

impl SecurityReport {
    pub fn security_violations(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_security())
    }
}
