use chrono::{TimeZone, Utc};
use release_readiness::readiness::domain::{
    ScenarioResult, SnapshotComponent, SnapshotManifest, SnapshotReadiness, TestSummary, Trigger,
};

/// A manifest with two components and one `e2e` scenario
pub fn manifest(application: &str, name: &str, day: u32) -> SnapshotManifest {
    SnapshotManifest {
        application: application.to_string(),
        snapshot: name.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
        trigger: Trigger {
            component: "quay".to_string(),
            git_sha: "0123abcd".to_string(),
            pipeline_run: "quay-on-push-abcde".to_string(),
        },
        components: vec![
            component("quay", "quay.io/quay/quay@sha256:aaa"),
            component("clair", "quay.io/quay/clair@sha256:bbb"),
        ],
        test_results: vec![ScenarioResult {
            scenario: "e2e".to_string(),
            status: "passed".to_string(),
            pipeline_run: "e2e-run-1".to_string(),
            summary: Some(summary(4, 4, 0, 0)),
        }],
        readiness: SnapshotReadiness {
            tests_passed: true,
            released: false,
            release_blocked_reason: String::new(),
        },
    }
}

pub fn component(name: &str, image: &str) -> SnapshotComponent {
    SnapshotComponent {
        name: name.to_string(),
        container_image: image.to_string(),
        git_revision: "0123abcd".to_string(),
        git_url: format!("https://github.com/quay/{}", name),
    }
}

pub fn summary(total: u32, passed: u32, failed: u32, skipped: u32) -> TestSummary {
    TestSummary {
        total,
        passed,
        failed,
        skipped,
        duration_sec: 12.5,
        cases: vec![],
    }
}
