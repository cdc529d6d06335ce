use std::fmt::Write as _;
use wardline::Config;
use wardline::artifact::{Artifact, ArtifactStatus};
use wardline::WardlineError;
use wardline::error::ScanError;
use wardline::scanner::{RiskPattern, SecurityClass, Violation};
use wardline::sensory::AGENT_ACTIVITY;
use wardline::vitals::FixedProbe;
use wardline::warden::Warden;

fn warden() -> Warden<FixedProbe> {
    Warden::new(Config::default(), FixedProbe::nominal())
}

fn kotlin_lines(n: usize) -> String {
    let mut code = String::new();
    for i in 0..n {
        let _ = writeln!(code, "val v{i} = {i}");
    }
    code
}

#[test]
fn forged_artifact_is_vetted_and_logged() {
    let warden = warden();
    let mut artifact = Artifact::new(
        "root_helper",
        "runs maintenance",
        "kotlin",
        "val p = ProcessBuilder(\"su -c reboot\")",
    );

    let report = warden.scan(&mut artifact).expect("first scan succeeds");

    assert_eq!(
        report.violations,
        [
            Violation::Security(RiskPattern::RootElevation),
            Violation::Security(RiskPattern::ProcessBuilder),
        ]
    );
    assert_eq!(report.score, 60);
    assert_eq!(report.security_class, SecurityClass::Yellow);
    assert!(!report.approved);
    assert_eq!(artifact.status(), ArtifactStatus::Vetoed);

    let perf = warden.query().aggregate_agent_performance(Some("KAI"));
    assert_eq!(perf.total_activities, 1);
    assert_eq!(perf.activity_breakdown["ChaosScan"], 1);

    let event = warden.store().recent(AGENT_ACTIVITY, 1).remove(0);
    assert!(
        event.data["details"]
            .as_str()
            .expect("details is text")
            .contains("Result=vetoed (Score: 60)")
    );
}

#[test]
fn large_clean_artifact_loses_points_but_passes() {
    let warden = warden();
    let mut artifact = Artifact::new("big", "", "kotlin", kotlin_lines(140));

    let report = warden.scan(&mut artifact).expect("scan succeeds");

    assert_eq!(report.line_count, 140);
    assert_eq!(report.score, 91);
    assert!(report.approved);
    assert_eq!(artifact.status(), ArtifactStatus::Passed);
}

#[test]
fn oversized_artifact_drops_below_approval() {
    let warden = warden();
    let mut artifact = Artifact::new("huge", "", "kotlin", kotlin_lines(400));

    let report = warden.scan(&mut artifact).expect("scan succeeds");

    // 100 - 20 - 35
    assert_eq!(report.score, 45);
    assert!(!report.approved);
    assert_eq!(report.security_class, SecurityClass::Yellow);
    assert_eq!(report.violations, [Violation::Stability { line_count: 400 }]);
}

#[test]
fn settled_artifact_cannot_be_rescanned() {
    let warden = warden();
    let mut artifact = Artifact::new("once", "", "kotlin", "val once = 1");
    warden.scan(&mut artifact).expect("first scan succeeds");

    let err = warden.scan(&mut artifact).expect_err("second scan is rejected");
    let WardlineError::Scan(err) = err else {
        panic!("expected a scan error, got {err}");
    };
    assert_eq!(
        err,
        ScanError::AlreadyScanned {
            name: "once".into(),
            status: "passed".into(),
        }
    );
}
