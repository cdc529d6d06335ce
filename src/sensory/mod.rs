//! Sensory store: the channeled, bounded event log every agent action and
//! system measurement is recorded into, plus the co-resident pattern cache.

mod cache;
mod event;
mod ring;
mod store;

pub use cache::{PatternCache, PatternCacheEntry};
pub use event::SensoryEvent;
pub use ring::Ring;
pub use store::{Ingest, SensoryStore};

/// Channel carrying agent actions; read by queries and the broadcaster.
pub const AGENT_ACTIVITY: &str = "AGENT_ACTIVITY";
/// Channel carrying periodic vitals readings.
pub const SYSTEM_VITALS: &str = "SYSTEM_VITALS";
