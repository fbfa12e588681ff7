use crate::readiness::domain::{
    ApplicationSummary, ComponentRecord, IssueFilter, IssueRecord, IssueSummary, NewSnapshot,
    ReleaseVersion, SnapshotRecord, TestResultRecord,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// StorageFlush port for stores that buffer their writes
///
/// Repository mutations may stay in memory until `flush` is called. Callers
/// flush once per unit of work: one ingested snapshot, or one synced release.
#[async_trait]
pub trait StorageFlush: Send + Sync {
    /// Makes every buffered write durable; a no-op when nothing changed
    async fn flush(&self) -> Result<()>;
}

/// SnapshotRepository port for the append-only snapshot tables
///
/// Snapshot names are globally unique and write-once.
#[async_trait]
pub trait SnapshotRepository: StorageFlush {
    async fn snapshot_exists_by_name(&self, name: &str) -> Result<bool>;

    /// Creates a snapshot row and assigns its id
    ///
    /// # Errors
    /// Returns an error if a snapshot with the same name already exists
    async fn create_snapshot(&self, snapshot: NewSnapshot) -> Result<SnapshotRecord>;

    /// Records a component name in the component registry (idempotent)
    async fn ensure_component(&self, name: &str) -> Result<()>;

    async fn create_snapshot_component(&self, component: ComponentRecord) -> Result<()>;

    async fn create_snapshot_test_result(&self, result: TestResultRecord) -> Result<()>;

    /// Every component name seen so far, sorted
    async fn list_components(&self) -> Result<Vec<String>>;

    /// Returns a snapshot with its components and test results
    async fn get_snapshot_by_name(&self, name: &str) -> Result<Option<SnapshotRecord>>;

    /// Lists snapshot headers newest first
    ///
    /// # Arguments
    /// * `application` - Restrict to one application when set
    /// * `limit` - Maximum number of rows
    /// * `offset` - Number of rows to skip
    async fn list_snapshots(
        &self,
        application: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SnapshotRecord>>;

    /// Newest snapshot header of one application
    async fn latest_snapshot_for_application(
        &self,
        application: &str,
    ) -> Result<Option<SnapshotRecord>>;

    /// Newest snapshot and snapshot count per application, ordered by application
    async fn latest_snapshot_per_application(&self) -> Result<Vec<ApplicationSummary>>;
}

/// ReleaseRepository port for release-version records
#[async_trait]
pub trait ReleaseRepository: StorageFlush {
    /// Inserts or fully replaces the record with the same name
    async fn upsert_release_version(&self, release: ReleaseVersion) -> Result<()>;

    async fn get_release_version(&self, name: &str) -> Result<Option<ReleaseVersion>>;

    /// Releases that are neither released nor archived, ordered by name
    async fn list_active_release_versions(&self) -> Result<Vec<ReleaseVersion>>;

    async fn list_all_release_versions(&self) -> Result<Vec<ReleaseVersion>>;
}

/// IssueRepository port for release-scoped issue records
///
/// Records are keyed by (issue key, fix version).
#[async_trait]
pub trait IssueRepository: StorageFlush {
    async fn upsert_issue(&self, issue: IssueRecord) -> Result<()>;

    /// Deletes every issue of `fix_version` whose key is not in `keys`
    ///
    /// An empty `keys` slice deletes all issues of the release.
    ///
    /// # Returns
    /// Number of deleted records
    async fn delete_issues_not_in(&self, fix_version: &str, keys: &[String]) -> Result<usize>;

    /// Lists issues of a release matching `filter`, ordered by key
    async fn list_issues(&self, fix_version: &str, filter: &IssueFilter)
        -> Result<Vec<IssueRecord>>;

    async fn get_issue_summary(&self, fix_version: &str) -> Result<IssueSummary>;

    /// Summaries for several releases; releases without issues are absent
    async fn get_issue_summaries_batch(
        &self,
        fix_versions: &[String],
    ) -> Result<HashMap<String, IssueSummary>>;
}
