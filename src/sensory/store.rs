use chrono::{TimeDelta, Utc};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};
use uuid::Uuid;

use super::cache::PatternCache;
use super::event::SensoryEvent;
use super::ring::Ring;
use super::{AGENT_ACTIVITY, SYSTEM_VITALS};
use crate::config::SensoryConfig;
use crate::control::ControlPlane;
use crate::error::SensoryError;

/// Result of a [`SensoryStore::record`] call on a registered channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Recorded,
    /// Ingestion is suspended; the event was dropped.
    Suspended,
}

type ChannelLog = Arc<Mutex<Ring<SensoryEvent>>>;

/// Process-wide, multi-channel, capacity-bounded event log.
///
/// Each channel is its own ring behind its own mutex, so an append and the
/// eviction it causes are atomic with respect to every reader of that
/// channel. Channels are created on first record of a registered name.
pub struct SensoryStore {
    control: Arc<ControlPlane>,
    registered: HashSet<String>,
    channel_capacity: usize,
    channels: RwLock<HashMap<String, ChannelLog>>,
    history: Mutex<Ring<SensoryEvent>>,
    cache: PatternCache,
}

impl SensoryStore {
    pub fn new(config: &SensoryConfig, control: Arc<ControlPlane>) -> Self {
        Self {
            control,
            registered: config.channels.iter().cloned().collect(),
            channel_capacity: config.channel_capacity,
            channels: RwLock::new(HashMap::new()),
            history: Mutex::new(Ring::new(config.total_capacity)),
            cache: PatternCache::new(config.cache_soft_ceiling, config.cache_trim_target),
        }
    }

    pub fn is_registered(&self, channel: &str) -> bool {
        self.registered.contains(channel)
    }

    /// Append an event to `channel`.
    ///
    /// `data` objects are stored as-is; `null` becomes an empty map and any
    /// other value is stored under `"value"`.
    pub fn record(
        &self,
        channel: &str,
        source: &str,
        event_type: &str,
        data: Value,
    ) -> Result<Ingest, SensoryError> {
        if !self.is_registered(channel) {
            tracing::warn!(channel, source, event_type, "sensory.unregistered_channel");
            return Err(SensoryError::UnregisteredChannel(channel.to_string()));
        }
        if !self.control.ingestion_enabled() {
            tracing::trace!(channel, event_type, "sensory.suspended_drop");
            return Ok(Ingest::Suspended);
        }

        let log = self.channel_log(channel);
        let event = {
            let mut ring = lock(&log);
            let now = Utc::now();
            let timestamp = match ring.back() {
                Some(last) if now <= last.timestamp => last.timestamp + TimeDelta::nanoseconds(1),
                _ => now,
            };
            let event = SensoryEvent {
                id: Uuid::new_v4(),
                channel: channel.to_string(),
                source: source.to_string(),
                event_type: event_type.to_string(),
                data: into_map(data),
                timestamp,
            };
            ring.push(event.clone());
            event
        };

        tracing::debug!(channel, source, event_type, "sensory.record");
        lock(&self.history).push(event);
        Ok(Ingest::Recorded)
    }

    /// Record on [`AGENT_ACTIVITY`] with `data.agent_name` set.
    pub fn record_agent_activity(
        &self,
        agent_name: &str,
        activity_type: &str,
        data: Value,
    ) -> Result<Ingest, SensoryError> {
        let mut map = into_map(data);
        map.insert("agent_name".into(), Value::String(agent_name.to_string()));
        self.record(AGENT_ACTIVITY, agent_name, activity_type, Value::Object(map))
    }

    /// The `n` most recent events of `channel`, oldest first. Unknown or
    /// never-used channels read as empty.
    pub fn recent(&self, channel: &str, n: usize) -> Vec<SensoryEvent> {
        self.with_channel(channel, |ring| ring.tail(n).cloned().collect())
            .unwrap_or_default()
    }

    /// Run `f` against a consistent view of `channel`'s buffer.
    pub fn with_channel<R>(
        &self,
        channel: &str,
        f: impl FnOnce(&Ring<SensoryEvent>) -> R,
    ) -> Option<R> {
        let log = self
            .channels
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(channel)
            .cloned()?;
        let ring = lock(&log);
        Some(f(&ring))
    }

    /// Most recent events across all channels, oldest first.
    pub fn history(&self, n: usize) -> Vec<SensoryEvent> {
        lock(&self.history).tail(n).cloned().collect()
    }

    pub fn awaken(&self) {
        self.control.set_ingestion_enabled(true);
    }

    pub fn suspend(&self) {
        self.control.set_ingestion_enabled(false);
    }

    pub fn is_awake(&self) -> bool {
        self.control.ingestion_enabled()
    }

    pub fn pattern_cache(&self) -> &PatternCache {
        &self.cache
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Channels that hold at least one event, sorted.
    pub fn active_channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    /// Free-form snapshot handed to generation steps as context.
    pub fn awareness(&self) -> Value {
        let mut channels = BTreeMap::new();
        for name in self.active_channels() {
            if let Some(size) = self.with_channel(&name, Ring::len) {
                channels.insert(name, size);
            }
        }

        let latest_vitals = self
            .recent(SYSTEM_VITALS, 1)
            .pop()
            .map(|event| Value::Object(event.data));
        let recent_activity: Vec<Value> = self
            .recent(AGENT_ACTIVITY, 5)
            .into_iter()
            .map(|event| {
                json!({
                    "agent": event.agent_name().unwrap_or(&event.source),
                    "type": event.event_type,
                    "timestamp": event.timestamp,
                })
            })
            .collect();

        json!({
            "awake": self.is_awake(),
            "channels": channels,
            "memory_size": lock(&self.history).len(),
            "latest_vitals": latest_vitals,
            "recent_activity": recent_activity,
            "synthesis_cache_size": self.cache.len(),
            "timestamp": Utc::now(),
        })
    }

    fn channel_log(&self, channel: &str) -> ChannelLog {
        if let Some(log) = self
            .channels
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(channel)
        {
            return Arc::clone(log);
        }

        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Arc::clone(
            channels
                .entry(channel.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(Ring::new(self.channel_capacity)))),
        )
    }
}

impl std::fmt::Debug for SensoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensoryStore")
            .field("registered", &self.registered)
            .field("channel_capacity", &self.channel_capacity)
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn into_map(data: Value) -> Map<String, Value> {
    match data {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("value".into(), other);
            map
        }
    }
}
