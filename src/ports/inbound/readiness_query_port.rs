use crate::readiness::domain::{IssueSummary, ReadinessSignal, ReleaseVersion, SnapshotRecord};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Readiness of one release, together with the inputs it was derived from
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseReadiness {
    pub release: ReleaseVersion,
    pub issues: IssueSummary,
    /// Latest snapshot of the release's application, if any was ingested
    pub latest_snapshot: Option<SnapshotRecord>,
    pub readiness: ReadinessSignal,
}

impl ReleaseReadiness {
    /// Tests-passed flag fed to the evaluator; false without a snapshot
    pub fn tests_passed(&self) -> bool {
        self.latest_snapshot
            .as_ref()
            .is_some_and(|snapshot| snapshot.tests_passed)
    }
}

/// ReadinessQueryPort - Inbound port for on-demand readiness evaluation
///
/// The verdict is computed from whatever the syncers most recently
/// persisted; nothing here triggers a sync.
#[async_trait]
pub trait ReadinessQueryPort: Send + Sync {
    /// Evaluates a single release
    ///
    /// # Arguments
    /// * `name` - Fix-version name of the release
    ///
    /// # Returns
    /// `None` if no such release is stored
    async fn release_readiness(&self, name: &str) -> Result<Option<ReleaseReadiness>>;

    /// Evaluates every stored release, ordered by name
    async fn all_release_readiness(&self) -> Result<Vec<ReleaseReadiness>>;
}
