use async_trait::async_trait;
use release_readiness::prelude::*;
use release_readiness::shared::error::ReadinessError;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

/// Mock ArtifactStore for testing
///
/// Applications are listed sorted; keys in insertion order per application.
#[derive(Default)]
pub struct MockArtifactStore {
    snapshots: Mutex<BTreeMap<String, Vec<(String, SnapshotManifest)>>>,
    results: HashMap<String, TestSummary>,
    failing_keys: HashSet<String>,
    failing_applications: HashSet<String>,
    fail_listing: bool,
    pub result_requests: Mutex<Vec<String>>,
}

impl MockArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(self, key: &str, manifest: SnapshotManifest) -> Self {
        self.add_snapshot(key, manifest);
        self
    }

    /// Adds a snapshot after construction, e.g. between two sync passes
    pub fn add_snapshot(&self, key: &str, manifest: SnapshotManifest) {
        let application = key.split('/').next().unwrap_or_default().to_string();
        self.snapshots
            .lock()
            .unwrap()
            .entry(application)
            .or_default()
            .push((key.to_string(), manifest));
    }

    pub fn with_results(mut self, prefix: &str, summary: TestSummary) -> Self {
        self.results.insert(prefix.to_string(), summary);
        self
    }

    /// Listed normally, but fetching the manifest fails
    pub fn with_broken_key(mut self, key: &str) -> Self {
        self.add_snapshot(key, SnapshotManifest::default());
        self.failing_keys.insert(key.to_string());
        self
    }

    /// Listed as an application, but listing its snapshots fails
    pub fn with_broken_application(mut self, application: &str) -> Self {
        self.snapshots
            .lock()
            .unwrap()
            .entry(application.to_string())
            .or_default();
        self.failing_applications.insert(application.to_string());
        self
    }

    pub fn with_listing_failure(mut self) -> Self {
        self.fail_listing = true;
        self
    }
}

#[async_trait]
impl ArtifactStore for MockArtifactStore {
    async fn list_applications(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            anyhow::bail!("Mock artifact store listing failure");
        }
        Ok(self.snapshots.lock().unwrap().keys().cloned().collect())
    }

    async fn list_snapshots(&self, application: &str) -> Result<Vec<String>> {
        if self.failing_applications.contains(application) {
            anyhow::bail!("Mock failure listing {}", application);
        }
        Ok(self
            .snapshots
            .lock()
            .unwrap()
            .get(application)
            .map(|entries| entries.iter().map(|(key, _)| key.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_snapshot(&self, key: &str) -> Result<SnapshotManifest> {
        if self.failing_keys.contains(key) {
            return Err(ReadinessError::ManifestDecode {
                key: key.to_string(),
                details: "mock decode failure".to_string(),
            }
            .into());
        }
        self.snapshots
            .lock()
            .unwrap()
            .values()
            .flatten()
            .find(|(k, _)| k == key)
            .map(|(_, manifest)| manifest.clone())
            .ok_or_else(|| anyhow::anyhow!("No such key: {}", key))
    }

    async fn get_test_results(&self, prefix: &str) -> Result<TestSummary> {
        self.result_requests.lock().unwrap().push(prefix.to_string());
        match self.results.get(prefix) {
            Some(summary) => Ok(summary.clone()),
            None => Err(ReadinessError::NoResultFiles {
                prefix: prefix.to_string(),
            }
            .into()),
        }
    }
}
