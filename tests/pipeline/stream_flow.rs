use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use wardline::Config;
use wardline::stream::StreamExit;
use wardline::vitals::FixedProbe;
use wardline::warden::Warden;

fn frame_body(frame: &str) -> Vec<Value> {
    let json = frame
        .strip_prefix("data: ")
        .and_then(|rest| rest.strip_suffix("\n\n"))
        .expect("SSE data frame");
    serde_json::from_str(json).expect("frame carries a JSON array")
}

#[tokio::test]
async fn subscriber_sees_each_event_once_in_order() {
    let mut config = Config::default();
    config.stream.interval_ms = 20;
    let warden = Warden::new(config, FixedProbe::nominal());
    let (tx, mut rx) = mpsc::channel(16);
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(warden.broadcaster().run(tx, cancel.clone()));

    let mut seen = Vec::new();
    for n in 0..12 {
        warden
            .record_agent_activity("AURA", "step", json!({ "n": n }))
            .expect("registered");
        if n % 3 == 2 {
            while let Ok(Some(frame)) =
                tokio::time::timeout(Duration::from_millis(200), rx.recv()).await
            {
                for event in frame_body(&frame) {
                    seen.push(event["data"]["n"].as_i64().expect("n"));
                }
                if seen.last() == Some(&n) {
                    break;
                }
            }
        }
    }

    cancel.cancel();
    let exit = handle.await.expect("join").expect("clean exit");
    assert_eq!(exit, StreamExit::Cancelled);
    assert_eq!(seen, (0..12).collect::<Vec<_>>());
}

#[tokio::test]
async fn independent_subscribers_have_independent_watermarks() {
    let warden = Warden::new(Config::default(), FixedProbe::nominal());
    warden
        .record_agent_activity("KAI", "ChaosScan", json!({ "score": 90 }))
        .expect("registered");

    let mut first = warden.broadcaster();
    let mut second = warden.broadcaster();
    assert_eq!(first.poll().expect("one event").len(), 1);
    assert!(first.poll().is_none());
    assert_eq!(second.poll().expect("still unseen").len(), 1);
}
