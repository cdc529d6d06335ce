//! Process-level wiring of the probe, gate, store, scanner and queries.

use serde_json::{Map, Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::artifact::Artifact;
use crate::config::Config;
use crate::control::ControlPlane;
use crate::error::Result;
use crate::gate::{AdmissionDecision, AdmissionGate, AdmissionRequest};
use crate::query::QueryEngine;
use crate::scanner::{ArtifactScanner, SecurityReport};
use crate::sensory::{Ingest, SensoryStore};
use crate::stream::StreamBroadcaster;
use crate::vitals::{VitalsMonitor, VitalsProbe};

pub struct Warden<P> {
    config: Config,
    control: Arc<ControlPlane>,
    store: Arc<SensoryStore>,
    gate: AdmissionGate,
    scanner: ArtifactScanner,
    query: QueryEngine,
    probe: Arc<P>,
}

impl<P: VitalsProbe + 'static> Warden<P> {
    pub fn new(config: Config, probe: P) -> Self {
        let control = Arc::new(ControlPlane::new(true, config.sensory.awake_on_start));
        let store = Arc::new(SensoryStore::new(&config.sensory, Arc::clone(&control)));
        let gate = AdmissionGate::new(config.gate.clone(), Arc::clone(&control));
        let scanner = ArtifactScanner::new(config.scanner.clone(), Arc::clone(&store));
        let query = QueryEngine::new(Arc::clone(&store));

        Self {
            config,
            control,
            store,
            gate,
            scanner,
            query,
            probe: Arc::new(probe),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn control(&self) -> &Arc<ControlPlane> {
        &self.control
    }

    pub fn store(&self) -> &Arc<SensoryStore> {
        &self.store
    }

    pub fn query(&self) -> &QueryEngine {
        &self.query
    }

    /// Check `request` against a fresh probe reading.
    pub async fn admit(&self, request: &AdmissionRequest) -> AdmissionDecision {
        self.gate.evaluate(request, self.probe.as_ref()).await
    }

    pub fn record_agent_activity(
        &self,
        agent_name: &str,
        activity_type: &str,
        data: Value,
    ) -> Result<Ingest> {
        Ok(self
            .store
            .record_agent_activity(agent_name, activity_type, data)?)
    }

    pub fn scan(&self, artifact: &mut Artifact) -> Result<SecurityReport> {
        Ok(self.scanner.scan(artifact)?)
    }

    /// Store snapshot plus a per-type breakdown of every active channel.
    pub fn awareness(&self) -> Value {
        let mut awareness = self.store.awareness();
        let summaries: Map<String, Value> = self
            .store
            .active_channels()
            .into_iter()
            .map(|channel| {
                let summary = self.query.channel_summary(&channel);
                (channel, json!(summary))
            })
            .collect();
        if let Some(object) = awareness.as_object_mut() {
            object.insert("channel_summaries".into(), Value::Object(summaries));
        }
        awareness
    }

    /// A fresh broadcaster; each subscriber gets its own watermark.
    pub fn broadcaster(&self) -> StreamBroadcaster {
        StreamBroadcaster::new(Arc::clone(&self.store), &self.config.stream)
    }

    /// Start the background vitals monitor on the current runtime.
    pub fn spawn_monitor(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let monitor = VitalsMonitor::new(
            Arc::clone(&self.probe),
            Arc::clone(&self.store),
            Duration::from_secs(self.config.vitals.monitor_interval_secs),
        );
        tokio::spawn(monitor.run(cancel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensory::{AGENT_ACTIVITY, SYSTEM_VITALS};
    use crate::error::{ScanError, WardlineError};
    use crate::vitals::FixedProbe;

    fn warden() -> Warden<FixedProbe> {
        let mut config = Config::default();
        config.gate.auth_key = "k".into();
        Warden::new(config, FixedProbe::nominal())
    }

    #[tokio::test]
    async fn admit_does_not_touch_the_store() {
        let warden = warden();
        let decision = warden.admit(&AdmissionRequest::new("k", "hello")).await;

        assert!(decision.approved);
        assert!(warden.store().history(10).is_empty());
    }

    #[tokio::test]
    async fn admit_honours_veto_toggle() {
        let warden = warden();
        let request = AdmissionRequest::new("k", "reflash bootloader");
        assert!(!warden.admit(&request).await.approved);

        warden.control().set_veto_enabled(false);
        assert!(warden.admit(&request).await.approved);
    }

    #[test]
    fn activity_and_scan_feed_queries() {
        let warden = warden();
        warden
            .record_agent_activity("AURA", "forge", json!({ "prompt": "glow" }))
            .unwrap();
        let mut artifact = Artifact::new("glow", "", "kotlin", "val glow = true");
        warden.scan(&mut artifact).unwrap();

        let perf = warden.query().aggregate_agent_performance(None);
        assert_eq!(perf.total_activities, 2);
        assert_eq!(warden.query().aggregate_agent_performance(Some("KAI")).total_activities, 1);
        assert_eq!(warden.awareness()["channels"][AGENT_ACTIVITY], 2);
    }

    #[test]
    fn awareness_breaks_channels_down_by_type() {
        let warden = warden();
        warden.record_agent_activity("AURA", "forge", Value::Null).unwrap();
        warden.record_agent_activity("AURA", "forge", Value::Null).unwrap();
        warden.record_agent_activity("KAI", "ChaosScan", Value::Null).unwrap();

        let awareness = warden.awareness();
        let summary = &awareness["channel_summaries"][AGENT_ACTIVITY];
        assert_eq!(summary["total_events"], 3);
        assert_eq!(summary["event_breakdown"]["forge"], 2);
        assert_eq!(summary["event_breakdown"]["ChaosScan"], 1);
        assert!(summary["latest"].is_string());
        assert!(awareness["channel_summaries"].get(SYSTEM_VITALS).is_none());
    }

    #[test]
    fn rescan_surfaces_as_scan_error() {
        let warden = warden();
        let mut artifact = Artifact::new("once", "", "kotlin", "val once = 1");
        warden.scan(&mut artifact).unwrap();

        let err = warden.scan(&mut artifact).unwrap_err();
        assert!(matches!(
            err,
            WardlineError::Scan(ScanError::AlreadyScanned { .. })
        ));
    }

    #[test]
    fn awake_on_start_is_honoured() {
        let mut config = Config::default();
        config.sensory.awake_on_start = false;
        let warden = Warden::new(config, FixedProbe::nominal());

        let ingest = warden.record_agent_activity("AURA", "forge", Value::Null).unwrap();
        assert_eq!(ingest, Ingest::Suspended);
    }

    #[tokio::test]
    async fn monitor_records_vitals() {
        let mut config = Config::default();
        config.vitals.monitor_interval_secs = 1;
        let warden = Warden::new(config, FixedProbe::nominal());
        let cancel = CancellationToken::new();
        let handle = warden.spawn_monitor(cancel.clone());

        // The first interval tick fires immediately.
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(warden.store().recent(SYSTEM_VITALS, 10).len(), 1);
    }
}
