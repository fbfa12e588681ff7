use crate::readiness::domain::{SnapshotManifest, TestSummary};
use crate::shared::Result;
use async_trait::async_trait;

/// ArtifactStore port for reading snapshot manifests and result files
///
/// The store is laid out as `{application}/snapshots/{snapshot}/...`:
/// top-level prefixes are applications, manifests are `.json` objects below
/// `snapshots/`, and result files live below `junit/{scenario}/` next to
/// each manifest.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Lists the top-level application prefixes (without trailing slash)
    async fn list_applications(&self) -> Result<Vec<String>>;

    /// Lists the manifest keys of one application
    ///
    /// # Arguments
    /// * `application` - Application prefix, e.g. `quay-v3-17`
    async fn list_snapshots(&self, application: &str) -> Result<Vec<String>>;

    /// Fetches and decodes one manifest by its full key
    ///
    /// # Errors
    /// Returns an error if the object cannot be read or decoded
    async fn get_snapshot(&self, key: &str) -> Result<SnapshotManifest>;

    /// Fetches, parses and merges every result file under a prefix
    ///
    /// Unparseable files are skipped.
    ///
    /// # Errors
    /// Returns an error if listing fails or no file could be parsed
    async fn get_test_results(&self, prefix: &str) -> Result<TestSummary>;
}
