use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Source patterns an artifact must not contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RiskPattern {
    /// Forced recursive delete.
    RecursiveDelete,
    /// Root elevation through `su -c`.
    RootElevation,
    /// World-writable permissions.
    WorldWritable,
    /// Raw shell execution through the Java runtime.
    RuntimeExec,
    /// Native library loading.
    NativeLoad,
    /// Content provider deletion.
    ContentDelete,
    /// Violent thread termination.
    ThreadStop,
    /// Shell command construction.
    ProcessBuilder,
}

impl RiskPattern {
    /// Scan order; reports list violations in this order.
    pub const ALL: [Self; 8] = [
        Self::RecursiveDelete,
        Self::RootElevation,
        Self::WorldWritable,
        Self::RuntimeExec,
        Self::NativeLoad,
        Self::ContentDelete,
        Self::ThreadStop,
        Self::ProcessBuilder,
    ];

    /// The regex source, matched case-insensitively.
    pub fn source(self) -> &'static str {
        match self {
            Self::RecursiveDelete => r"rm\s+-rf",
            Self::RootElevation => r"su\s+-c",
            Self::WorldWritable => r"chmod\s+777",
            Self::RuntimeExec => r"getRuntime\(\)\.exec",
            Self::NativeLoad => r"System\.loadLibrary",
            Self::ContentDelete => r"ContentResolver\.delete",
            Self::ThreadStop => r"Thread\.stop",
            Self::ProcessBuilder => r"ProcessBuilder",
        }
    }

    pub fn from_source(source: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.source() == source)
    }
}

static MATCHERS: LazyLock<Vec<(RiskPattern, Regex)>> = LazyLock::new(|| {
    RiskPattern::ALL
        .into_iter()
        .map(|pattern| {
            let regex = RegexBuilder::new(pattern.source())
                .case_insensitive(true)
                .build()
                .expect("invalid risk pattern");
            (pattern, regex)
        })
        .collect()
});

/// Every pattern that occurs in `code`, in scan order, each at most once.
pub fn detect(code: &str) -> Vec<RiskPattern> {
    MATCHERS
        .iter()
        .filter(|(_, regex)| regex.is_match(code))
        .map(|(pattern, _)| *pattern)
        .collect()
}
