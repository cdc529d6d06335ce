//! Read-only aggregation over sensory channels.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::sensory::{AGENT_ACTIVITY, SensoryEvent, SensoryStore};

/// Raw buffer entries considered by `recent_activities`.
pub const RECENT_ACTIVITY_WINDOW: usize = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AgentPerformance {
    pub total_activities: usize,
    pub activity_breakdown: BTreeMap<String, usize>,
    pub recent_activities: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub total_events: usize,
    pub event_breakdown: BTreeMap<String, usize>,
    pub latest: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<SensoryStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<SensoryStore>) -> Self {
        Self { store }
    }

    /// Activity counts over the agent channel's current buffer, optionally
    /// restricted to events whose `data.agent_name` equals `agent_name`.
    ///
    /// `recent_activities` takes the last [`RECENT_ACTIVITY_WINDOW`] raw
    /// buffer entries first and applies the agent filter to that window
    /// second, so it counts the agent's share of the latest raw traffic.
    pub fn aggregate_agent_performance(&self, agent_name: Option<&str>) -> AgentPerformance {
        let matches = |event: &SensoryEvent| {
            agent_name.is_none_or(|name| event.agent_name() == Some(name))
        };

        self.store
            .with_channel(AGENT_ACTIVITY, |ring| {
                let mut performance = AgentPerformance::default();
                for event in ring.iter().filter(|e| matches(e)) {
                    performance.total_activities += 1;
                    *performance
                        .activity_breakdown
                        .entry(event.event_type.clone())
                        .or_default() += 1;
                }
                performance.recent_activities = ring
                    .tail(RECENT_ACTIVITY_WINDOW)
                    .filter(|e| matches(e))
                    .count();
                performance
            })
            .unwrap_or_default()
    }

    pub fn channel_summary(&self, channel: &str) -> ChannelSummary {
        self.store
            .with_channel(channel, |ring| {
                let mut event_breakdown = BTreeMap::new();
                for event in ring.iter() {
                    *event_breakdown.entry(event.event_type.clone()).or_default() += 1;
                }
                ChannelSummary {
                    channel: channel.to_string(),
                    total_events: ring.len(),
                    event_breakdown,
                    latest: ring.back().map(|e| e.timestamp),
                }
            })
            .unwrap_or_else(|| ChannelSummary {
                channel: channel.to_string(),
                total_events: 0,
                event_breakdown: BTreeMap::new(),
                latest: None,
            })
    }
}
