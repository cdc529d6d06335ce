mod core;
mod gate;
mod observability;
mod scanner;
mod sensory;
mod stream;

pub use core::Config;
pub use gate::GateConfig;
pub use observability::ObservabilityConfig;
pub use scanner::ScannerConfig;
pub use sensory::SensoryConfig;
pub use stream::{StreamConfig, VitalsConfig};
