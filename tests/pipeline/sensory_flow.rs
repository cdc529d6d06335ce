use serde_json::json;
use std::sync::Arc;
use std::thread;
use wardline::config::SensoryConfig;
use wardline::control::ControlPlane;
use wardline::error::SensoryError;
use wardline::query::QueryEngine;
use wardline::sensory::{AGENT_ACTIVITY, Ingest, SYSTEM_VITALS, SensoryStore};

fn store(channel_capacity: usize) -> Arc<SensoryStore> {
    let config = SensoryConfig {
        channel_capacity,
        ..SensoryConfig::default()
    };
    Arc::new(SensoryStore::new(&config, Arc::new(ControlPlane::default())))
}

#[test]
fn concurrent_producers_respect_capacity_and_order() {
    let store = store(1000);
    let producers: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..250 {
                    store
                        .record_agent_activity(
                            &format!("agent_{worker}"),
                            "tick",
                            json!({ "i": i }),
                        )
                        .expect("agent channel is registered");
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().expect("producer thread");
    }

    let events = store.recent(AGENT_ACTIVITY, 5000);
    assert_eq!(events.len(), 1000);
    assert!(events.windows(2).all(|w| w[0].timestamp < w[1].timestamp));

    let perf = QueryEngine::new(Arc::clone(&store)).aggregate_agent_performance(None);
    assert_eq!(perf.total_activities, 1000);
    assert_eq!(perf.recent_activities, 50);
}

#[test]
fn suspend_drops_but_keeps_history() {
    let store = store(10);
    store
        .record(SYSTEM_VITALS, "probe", "vitals", json!({ "cpu_load": 0.1 }))
        .expect("registered");

    store.suspend();
    let ingest = store
        .record(SYSTEM_VITALS, "probe", "vitals", json!({ "cpu_load": 0.2 }))
        .expect("registered");
    assert_eq!(ingest, Ingest::Suspended);
    assert_eq!(store.recent(SYSTEM_VITALS, 10).len(), 1);

    store.awaken();
    store
        .record(SYSTEM_VITALS, "probe", "vitals", json!({ "cpu_load": 0.3 }))
        .expect("registered");
    let loads: Vec<f64> = store
        .recent(SYSTEM_VITALS, 10)
        .iter()
        .filter_map(|e| e.data["cpu_load"].as_f64())
        .collect();
    assert_eq!(loads, [0.1, 0.3]);
}

#[test]
fn unregistered_channel_is_rejected() {
    let store = store(10);
    let err = store
        .record("NOT_A_CHANNEL", "x", "y", json!({}))
        .expect_err("unknown channel");
    assert_eq!(err, SensoryError::UnregisteredChannel("NOT_A_CHANNEL".into()));
    assert!(store.recent("NOT_A_CHANNEL", 10).is_empty());
}

#[test]
fn awareness_reflects_store_state() {
    let store = store(100);
    store
        .record(SYSTEM_VITALS, "probe", "vitals", json!({ "cpu_load": 0.4 }))
        .expect("registered");
    store
        .record_agent_activity("AURA", "forge", json!({ "prompt": "glow" }))
        .expect("registered");
    store
        .pattern_cache()
        .put("p1", "micro", json!({ "pattern": "morning" }));

    let awareness = store.awareness();
    assert_eq!(awareness["awake"], true);
    assert_eq!(awareness["memory_size"], 2);
    assert_eq!(awareness["latest_vitals"]["cpu_load"], 0.4);
    assert_eq!(awareness["recent_activity"][0]["agent"], "AURA");
    assert_eq!(awareness["synthesis_cache_size"], 1);
}

#[test]
fn pattern_cache_hysteresis_through_store() {
    let store = store(10);
    let cache = store.pattern_cache();
    for i in 0..1001 {
        cache.put(format!("test_{i}"), "micro", json!({ "data": i }));
    }

    assert_eq!(cache.len(), 500);
    assert_eq!(
        cache.get_recent(Some("micro"), 2),
        [json!({ "data": 1000 }), json!({ "data": 999 })]
    );
}
