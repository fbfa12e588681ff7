use super::manifest_decoder::ManifestDecoder;
use crate::adapters::outbound::parsers::JunitParser;
use crate::ports::outbound::ArtifactStore;
use crate::readiness::domain::{SnapshotManifest, TestSummary};
use crate::shared::error::ReadinessError;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use futures::TryStreamExt;
use opendal::{services, Operator};

const TRACING_TARGET: &str = "release_readiness::s3";

/// Connection settings for an S3-compatible bucket
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectStoreConfig {
    /// Custom endpoint for S3-compatible stores (GarageFS, MinIO)
    pub endpoint: Option<String>,
    pub region: String,
    pub bucket: String,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

/// S3ArtifactStore adapter reading snapshots through an OpenDAL operator
///
/// Implements the ArtifactStore port. Any OpenDAL backend works; production
/// uses S3 while tests use a local directory.
#[derive(Clone)]
pub struct S3ArtifactStore {
    operator: Operator,
}

impl S3ArtifactStore {
    /// Creates a store for the configured bucket
    ///
    /// # Errors
    /// Returns an error if the S3 operator cannot be built
    pub fn new(config: &ObjectStoreConfig) -> Result<Self> {
        let mut builder = services::S3::default()
            .bucket(&config.bucket)
            .region(&config.region);

        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint(endpoint);
        }
        if let Some(ref access_key) = config.access_key {
            builder = builder.access_key_id(access_key);
        }
        if let Some(ref secret_key) = config.secret_key {
            builder = builder.secret_access_key(secret_key);
        }

        let operator = Operator::new(builder)
            .map(|op| op.finish())
            .with_context(|| format!("Failed to initialise S3 client for bucket {}", config.bucket))?;

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("default"),
            "Artifact store initialized"
        );

        Ok(Self { operator })
    }

    /// Creates a store over a local directory laid out like the bucket
    pub fn from_directory(root: &str) -> Result<Self> {
        let builder = services::Fs::default().root(root);
        let operator = Operator::new(builder)
            .map(|op| op.finish())
            .with_context(|| format!("Failed to open artifact directory {}", root))?;
        Ok(Self::from_operator(operator))
    }

    pub fn from_operator(operator: Operator) -> Self {
        Self { operator }
    }

    /// Lists every file below `prefix` whose key ends with `suffix`, sorted
    async fn list_files(&self, prefix: &str, suffix: &str) -> Result<Vec<String>> {
        let entries: Vec<_> = self
            .operator
            .lister_with(prefix)
            .recursive(true)
            .await
            .with_context(|| format!("Failed to list {}", prefix))?
            .try_collect()
            .await
            .with_context(|| format!("Failed to list {}", prefix))?;

        let mut keys: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.metadata().is_file() && entry.path().ends_with(suffix))
            .map(|entry| entry.path().to_string())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn read(&self, key: &str) -> Result<Vec<u8>> {
        tracing::debug!(target: TRACING_TARGET, key = %key, "Reading object");
        let data = self
            .operator
            .read(key)
            .await
            .with_context(|| format!("Failed to read {}", key))?
            .to_vec();
        Ok(data)
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn list_applications(&self) -> Result<Vec<String>> {
        let entries: Vec<_> = self
            .operator
            .lister("/")
            .await
            .context("Failed to list applications")?
            .try_collect()
            .await
            .context("Failed to list applications")?;

        let mut applications: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.metadata().is_dir())
            .map(|entry| entry.path().trim_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        applications.sort();
        applications.dedup();
        Ok(applications)
    }

    async fn list_snapshots(&self, application: &str) -> Result<Vec<String>> {
        self.list_files(&format!("{}/snapshots/", application), ".json")
            .await
    }

    async fn get_snapshot(&self, key: &str) -> Result<SnapshotManifest> {
        let data = self.read(key).await?;
        Ok(ManifestDecoder::decode(key, &data)?)
    }

    async fn get_test_results(&self, prefix: &str) -> Result<TestSummary> {
        let prefix = if prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{}/", prefix)
        };

        let mut summaries = Vec::new();
        for key in self.list_files(&prefix, ".xml").await? {
            let parsed = match self.read(&key).await {
                Ok(data) => JunitParser::parse(&data),
                Err(e) => Err(e),
            };
            match parsed {
                Ok(summary) => summaries.push(summary),
                Err(e) => tracing::warn!(
                    target: TRACING_TARGET,
                    key = %key,
                    error = %e,
                    "Skipping result file"
                ),
            }
        }

        if summaries.is_empty() {
            return Err(ReadinessError::NoResultFiles { prefix }.into());
        }
        Ok(TestSummary::merge_all(summaries))
    }
}
