use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `Wardline`.
///
/// Admission denials are never errors: they come back as
/// [`AdmissionDecision`](crate::gate::AdmissionDecision) values. The variants
/// here cover the remaining typed failures a caller may want to match on.
#[derive(Debug, Error)]
pub enum WardlineError {
    // ── Sensory store ───────────────────────────────────────────────────
    #[error("sensory: {0}")]
    Sensory(#[from] SensoryError),

    // ── Vitals probe ────────────────────────────────────────────────────
    #[error("probe: {0}")]
    Probe(#[from] ProbeError),

    // ── Artifact scanner ────────────────────────────────────────────────
    #[error("scan: {0}")]
    Scan(#[from] ScanError),

    // ── Stream broadcaster ──────────────────────────────────────────────
    #[error("stream: {0}")]
    Stream(#[from] StreamError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Sensory store errors ───────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SensoryError {
    #[error("channel {0} is not registered")]
    UnregisteredChannel(String),
}

// ─── Vitals probe errors ────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("vitals source unavailable: {0}")]
    Unavailable(String),

    #[error("malformed vitals reading: {0}")]
    Malformed(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Scanner errors ─────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    #[error("artifact {name} already scanned (status: {status})")]
    AlreadyScanned { name: String, status: String },
}

// ─── Stream errors ──────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("sink closed")]
    SinkClosed,

    #[error("frame encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, WardlineError>;
