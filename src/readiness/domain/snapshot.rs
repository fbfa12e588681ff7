use super::test_summary::TestSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalised snapshot document as published to the artifact store
///
/// One manifest describes one immutable build event of an application:
/// the component images it captured, the integration scenarios that ran
/// against it and the release readiness at the time it was written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    pub application: String,
    pub snapshot: String,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub components: Vec<SnapshotComponent>,
    #[serde(default)]
    pub test_results: Vec<ScenarioResult>,
    #[serde(default)]
    pub readiness: SnapshotReadiness,
}

/// The component build that produced a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(default)]
    pub component: String,
    #[serde(default)]
    pub git_sha: String,
    #[serde(default)]
    pub pipeline_run: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotComponent {
    pub name: String,
    #[serde(default)]
    pub container_image: String,
    #[serde(default)]
    pub git_revision: String,
    #[serde(default)]
    pub git_url: String,
}

/// Outcome of one integration test scenario run against a snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario: String,
    /// passed, failed, pending or the raw upstream value
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub pipeline_run: String,
    #[serde(default)]
    pub summary: Option<TestSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotReadiness {
    #[serde(default)]
    pub tests_passed: bool,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub release_blocked_reason: String,
}

/// Fields needed to create a snapshot row
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    pub application: String,
    pub name: String,
    pub trigger_component: String,
    pub trigger_git_sha: String,
    pub trigger_pipeline_run: String,
    pub tests_passed: bool,
    pub released: bool,
    pub release_blocked_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&SnapshotManifest> for NewSnapshot {
    fn from(manifest: &SnapshotManifest) -> Self {
        let reason = manifest.readiness.release_blocked_reason.trim();
        Self {
            application: manifest.application.clone(),
            name: manifest.snapshot.clone(),
            trigger_component: manifest.trigger.component.clone(),
            trigger_git_sha: manifest.trigger.git_sha.clone(),
            trigger_pipeline_run: manifest.trigger.pipeline_run.clone(),
            tests_passed: manifest.readiness.tests_passed,
            released: manifest.readiness.released,
            release_blocked_reason: (!reason.is_empty()).then(|| reason.to_string()),
            created_at: manifest.created_at,
        }
    }
}

/// A persisted snapshot, optionally hydrated with its components and results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub id: i64,
    pub application: String,
    pub name: String,
    pub trigger_component: String,
    pub trigger_git_sha: String,
    pub trigger_pipeline_run: String,
    pub tests_passed: bool,
    pub released: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_blocked_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_results: Vec<TestResultRecord>,
}

impl SnapshotRecord {
    pub fn from_new(id: i64, snapshot: NewSnapshot) -> Self {
        Self {
            id,
            application: snapshot.application,
            name: snapshot.name,
            trigger_component: snapshot.trigger_component,
            trigger_git_sha: snapshot.trigger_git_sha,
            trigger_pipeline_run: snapshot.trigger_pipeline_run,
            tests_passed: snapshot.tests_passed,
            released: snapshot.released,
            release_blocked_reason: snapshot.release_blocked_reason,
            created_at: snapshot.created_at,
            components: Vec::new(),
            test_results: Vec::new(),
        }
    }

    /// Returns a copy without the owned component and result rows
    pub fn header(&self) -> Self {
        Self {
            components: Vec::new(),
            test_results: Vec::new(),
            ..self.clone()
        }
    }
}

/// Per-component image and commit captured in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub snapshot_id: i64,
    pub component: String,
    pub git_sha: String,
    pub image_url: String,
    pub git_url: String,
}

impl ComponentRecord {
    pub fn new(snapshot_id: i64, component: &SnapshotComponent) -> Self {
        Self {
            snapshot_id,
            component: component.name.clone(),
            git_sha: component.git_revision.clone(),
            image_url: component.container_image.clone(),
            git_url: component.git_url.clone(),
        }
    }
}

/// Per-scenario counts stored for a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResultRecord {
    pub snapshot_id: i64,
    pub scenario: String,
    pub status: String,
    pub pipeline_run: String,
    pub total: u32,
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub duration_sec: f64,
}

impl TestResultRecord {
    /// Builds the stored row for a scenario; a missing summary keeps zero counts
    pub fn new(snapshot_id: i64, result: &ScenarioResult) -> Self {
        let summary = result.summary.clone().unwrap_or_default();
        Self {
            snapshot_id,
            scenario: result.scenario.clone(),
            status: result.status.clone(),
            pipeline_run: result.pipeline_run.clone(),
            total: summary.total,
            passed: summary.passed,
            failed: summary.failed,
            skipped: summary.skipped,
            duration_sec: summary.duration_sec,
        }
    }
}

/// Latest snapshot of one application together with its snapshot count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationSummary {
    pub application: String,
    pub latest_snapshot: SnapshotRecord,
    pub snapshot_count: usize,
}
