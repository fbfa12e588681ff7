use crate::application::dto::SnapshotSyncReport;
use crate::ports::outbound::{ArtifactStore, SnapshotRepository};
use crate::readiness::domain::{ComponentRecord, NewSnapshot, SnapshotManifest, TestResultRecord};
use crate::shared::Result;
use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "release_readiness::snapshot_sync";

/// SnapshotSyncer - Ingests new snapshots from the artifact store
///
/// Every pass walks all applications and their snapshot keys. Snapshots
/// already stored (by name) are skipped, so re-running a pass with no new
/// upstream objects leaves the store untouched. Failures are isolated to
/// the application, snapshot or result file they occur in.
///
/// # Type Parameters
/// * `A` - ArtifactStore implementation
/// * `S` - SnapshotRepository implementation
pub struct SnapshotSyncer<A, S> {
    artifacts: Arc<A>,
    snapshots: Arc<S>,
}

impl<A, S> SnapshotSyncer<A, S>
where
    A: ArtifactStore,
    S: SnapshotRepository,
{
    pub fn new(artifacts: Arc<A>, snapshots: Arc<S>) -> Self {
        Self {
            artifacts,
            snapshots,
        }
    }

    /// Runs one full ingestion pass
    ///
    /// # Arguments
    /// * `cancel` - Checked between snapshots; a cancelled pass stops before
    ///   starting the next snapshot and reports `cancelled`
    pub async fn sync_once(&self, cancel: &CancellationToken) -> SnapshotSyncReport {
        let mut report = SnapshotSyncReport::default();

        let applications = match self.artifacts.list_applications().await {
            Ok(applications) => applications,
            Err(e) => {
                tracing::error!(target: TRACING_TARGET, error = %e, "Failed to list applications");
                report.failed += 1;
                return report;
            }
        };
        report.applications = applications.len();

        for application in &applications {
            let keys = match self.artifacts.list_snapshots(application).await {
                Ok(keys) => keys,
                Err(e) => {
                    tracing::error!(
                        target: TRACING_TARGET,
                        application = %application,
                        error = %e,
                        "Failed to list snapshots"
                    );
                    report.failed += 1;
                    continue;
                }
            };

            for key in &keys {
                if cancel.is_cancelled() {
                    tracing::info!(target: TRACING_TARGET, "Snapshot sync cancelled");
                    report.cancelled = true;
                    return report;
                }
                report.snapshots_seen += 1;

                match self.sync_key(application, key).await {
                    Ok(true) => report.ingested += 1,
                    Ok(false) => report.skipped_existing += 1,
                    Err(e) => {
                        tracing::error!(
                            target: TRACING_TARGET,
                            application = %application,
                            key = %key,
                            error = format!("{:#}", e),
                            "Failed to sync snapshot"
                        );
                        report.failed += 1;
                    }
                }
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            applications = report.applications,
            seen = report.snapshots_seen,
            ingested = report.ingested,
            failed = report.failed,
            "Snapshot sync finished"
        );
        report
    }

    /// Syncs one manifest key
    ///
    /// # Returns
    /// `true` if the snapshot was ingested, `false` if it already existed
    async fn sync_key(&self, application: &str, key: &str) -> Result<bool> {
        let mut manifest = self.artifacts.get_snapshot(key).await?;

        if self
            .snapshots
            .snapshot_exists_by_name(&manifest.snapshot)
            .await?
        {
            return Ok(false);
        }

        tracing::info!(
            target: TRACING_TARGET,
            application = %application,
            snapshot = %manifest.snapshot,
            "New snapshot"
        );

        self.attach_test_results(key, &mut manifest).await;
        self.ingest(&manifest).await?;
        Ok(true)
    }

    /// Replaces scenario summaries with merged result-file data when present
    ///
    /// Scenarios without result files keep whatever the manifest carried.
    async fn attach_test_results(&self, key: &str, manifest: &mut SnapshotManifest) {
        let snapshot_dir = snapshot_dir(key);

        for scenario in manifest.test_results.iter_mut() {
            let prefix = format!("{}junit/{}/", snapshot_dir, scenario.scenario);
            match self.artifacts.get_test_results(&prefix).await {
                Ok(summary) => scenario.summary = Some(summary),
                Err(e) => tracing::debug!(
                    target: TRACING_TARGET,
                    scenario = %scenario.scenario,
                    prefix = %prefix,
                    error = %e,
                    "No result files for scenario"
                ),
            }
        }
    }

    /// Persists the snapshot row, then its components and test results,
    /// and flushes the store once for the whole snapshot
    async fn ingest(&self, manifest: &SnapshotManifest) -> Result<()> {
        let record = self
            .snapshots
            .create_snapshot(NewSnapshot::from(manifest))
            .await
            .context("Failed to create snapshot")?;

        for component in &manifest.components {
            self.snapshots
                .ensure_component(&component.name)
                .await
                .with_context(|| format!("Failed to register component {}", component.name))?;
            self.snapshots
                .create_snapshot_component(ComponentRecord::new(record.id, component))
                .await
                .with_context(|| format!("Failed to store component {}", component.name))?;
        }

        for scenario in &manifest.test_results {
            self.snapshots
                .create_snapshot_test_result(TestResultRecord::new(record.id, scenario))
                .await
                .with_context(|| format!("Failed to store test result {}", scenario.scenario))?;
        }

        self.snapshots
            .flush()
            .await
            .with_context(|| format!("Failed to flush snapshot {}", manifest.snapshot))
    }
}

/// Directory of a manifest key, with a trailing slash
///
/// `quay-v3-17/snapshots/s1/snapshot.json` becomes `quay-v3-17/snapshots/s1/`.
fn snapshot_dir(key: &str) -> String {
    match key.rfind('/') {
        Some(idx) => key[..=idx].to_string(),
        None => String::new(),
    }
}
