use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use super::{VitalsProbe, sample_or_fallback};
use crate::sensory::{Ingest, SYSTEM_VITALS, SensoryStore};

/// Periodically records probe readings on the vitals channel so that
/// `awareness()` always carries a recent health reading.
pub struct VitalsMonitor<P> {
    probe: Arc<P>,
    store: Arc<SensoryStore>,
    interval: Duration,
}

impl<P: VitalsProbe> VitalsMonitor<P> {
    pub fn new(probe: Arc<P>, store: Arc<SensoryStore>, interval: Duration) -> Self {
        Self {
            probe,
            store,
            interval,
        }
    }

    /// Take one reading and record it. Returns whether it was stored.
    pub async fn tick(&self) -> bool {
        let snapshot = sample_or_fallback(self.probe.as_ref()).await;
        let data = match serde_json::to_value(&snapshot) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = %e, "vitals.encode_failed");
                return false;
            }
        };
        match self
            .store
            .record(SYSTEM_VITALS, self.probe.name(), "vitals", data)
        {
            Ok(Ingest::Recorded) => true,
            Ok(Ingest::Suspended) => false,
            Err(e) => {
                tracing::warn!(error = %e, "vitals.record_failed");
                false
            }
        }
    }

    /// Sample every interval until cancelled. A zero interval disables the
    /// monitor.
    pub async fn run(self, cancel: CancellationToken) {
        if self.interval.is_zero() {
            tracing::debug!("vitals.monitor_disabled");
            return;
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(probe = self.probe.name(), "vitals.monitor_start");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    tracing::info!("vitals.monitor_stop");
                    return;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SensoryConfig;
    use crate::control::ControlPlane;
    use crate::vitals::{FailingProbe, FixedProbe};

    fn store() -> Arc<SensoryStore> {
        Arc::new(SensoryStore::new(
            &SensoryConfig::default(),
            Arc::new(ControlPlane::default()),
        ))
    }

    #[tokio::test]
    async fn tick_records_reading() {
        let store = store();
        let monitor = VitalsMonitor::new(
            Arc::new(FixedProbe::nominal()),
            Arc::clone(&store),
            Duration::from_secs(5),
        );

        assert!(monitor.tick().await);
        let events = store.recent(SYSTEM_VITALS, 10);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].source, "fixed");
        assert_eq!(events[0].data["cpu_load"], 0.2);
    }

    #[tokio::test]
    async fn failing_probe_records_degraded_reading() {
        let store = store();
        let monitor = VitalsMonitor::new(
            Arc::new(FailingProbe::new("offline")),
            Arc::clone(&store),
            Duration::from_secs(5),
        );

        assert!(monitor.tick().await);
        assert_eq!(store.recent(SYSTEM_VITALS, 1)[0].data["degraded"], true);
    }

    #[tokio::test]
    async fn suspended_store_skips_reading() {
        let store = store();
        store.suspend();
        let monitor = VitalsMonitor::new(
            Arc::new(FixedProbe::nominal()),
            Arc::clone(&store),
            Duration::from_secs(5),
        );

        assert!(!monitor.tick().await);
        assert!(store.recent(SYSTEM_VITALS, 1).is_empty());
    }

    #[tokio::test]
    async fn run_stops_on_cancel() {
        let store = store();
        let cancel = CancellationToken::new();
        let monitor = VitalsMonitor::new(
            Arc::new(FixedProbe::nominal()),
            Arc::clone(&store),
            Duration::from_millis(10),
        );
        let handle = tokio::spawn(monitor.run(cancel.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(!store.recent(SYSTEM_VITALS, 10).is_empty());
    }

    #[tokio::test]
    async fn zero_interval_returns_immediately() {
        let monitor = VitalsMonitor::new(
            Arc::new(FixedProbe::nominal()),
            store(),
            Duration::ZERO,
        );
        monitor.run(CancellationToken::new()).await;
    }
}
