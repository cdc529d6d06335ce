use serde_json::json;
use wardline::Config;
use wardline::gate::{AdmissionDecision, AdmissionRequest, DenialKind, Severity};
use wardline::vitals::{FailingProbe, FixedProbe, VitalsSnapshot};
use wardline::warden::Warden;

const KEY: &str = "pairing-secret";

fn config() -> Config {
    let mut config = Config::default();
    config.gate.auth_key = KEY.into();
    config
}

fn request(value: serde_json::Value) -> AdmissionRequest {
    serde_json::from_value(value).expect("request should deserialize")
}

#[tokio::test]
async fn wire_request_round_trip_through_gate() {
    let warden = Warden::new(config(), FixedProbe::nominal());
    let req = request(json!({
        "auth_key": KEY,
        "message": "draw a glowing button",
        "agent": "AURA",
        "device_metrics": { "temperature_c": 39.0, "temp_delta_last_20s": 1.5 }
    }));

    let decision = warden.admit(&req).await;
    let wire = serde_json::to_value(&decision).expect("decision should serialize");

    assert_eq!(wire["approved"], true);
    assert_eq!(wire["reason"], "stable");
    assert_eq!(wire["severity"], "none");
    assert_eq!(wire["cooldown_seconds"], 0);
    assert!(wire.get("denial").is_none());

    let back: AdmissionDecision = serde_json::from_value(wire).expect("decision should parse");
    assert_eq!(back, decision);
}

#[tokio::test]
async fn chain_order_is_identity_intent_resource_thermal_complexity() {
    let hot_busy = VitalsSnapshot::new(0.97, 0.5, Some(55.0)).with_temp_delta(12.0);
    let warden = Warden::new(config(), FixedProbe::new(hot_busy));
    let long = "x".repeat(10_000);

    let cases = [
        (
            json!({ "auth_key": "nope", "message": "bootloader" }),
            DenialKind::AuthenticationFailure,
        ),
        (
            json!({ "auth_key": KEY, "message": long.clone() + " bootloader" }),
            DenialKind::ForbiddenIntent,
        ),
        (
            json!({ "auth_key": KEY, "message": long }),
            DenialKind::ResourceExhaustion,
        ),
    ];
    for (value, expected) in cases {
        let decision = warden.admit(&request(value)).await;
        assert_eq!(decision.denial, Some(expected));
        assert!(!decision.approved);
    }

    let cool_but_rising = VitalsSnapshot::new(0.1, 0.5, Some(40.0)).with_temp_delta(10.0);
    let warden = Warden::new(config(), FixedProbe::new(cool_but_rising));
    let decision = warden
        .admit(&request(json!({ "auth_key": KEY, "message": "x".repeat(10_000) })))
        .await;
    assert_eq!(decision.denial, Some(DenialKind::ThermalEmergency));
    assert_eq!(decision.severity, Severity::Critical);
}

#[tokio::test]
async fn degraded_probe_still_decides() {
    let warden = Warden::new(config(), FailingProbe::new("no sensors"));

    let ok = warden.admit(&AdmissionRequest::new(KEY, "hello")).await;
    assert!(ok.approved);
    assert!(ok.degraded);

    let denied = warden.admit(&AdmissionRequest::new("bad", "hello")).await;
    assert!(!denied.approved);
    assert!(denied.degraded);
    assert_eq!(denied.cooldown_seconds, 3600);
}

#[tokio::test]
async fn confirmed_long_request_is_admitted() {
    let warden = Warden::new(config(), FixedProbe::nominal());
    let req = request(json!({
        "auth_key": KEY,
        "message": "y".repeat(9_000),
        "user_confirmed_long": true
    }));

    assert!(warden.admit(&req).await.approved);
}
