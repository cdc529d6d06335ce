pub mod schema;

pub use schema::{
    Config, GateConfig, ObservabilityConfig, ScannerConfig, SensoryConfig, StreamConfig,
    VitalsConfig,
};
