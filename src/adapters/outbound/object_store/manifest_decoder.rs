use crate::readiness::domain::{
    ScenarioResult, SnapshotComponent, SnapshotManifest, SnapshotReadiness, Trigger,
};
use crate::shared::error::ReadinessError;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

const TRACING_TARGET: &str = "release_readiness::s3";

const COMPONENT_ANNOTATION: &str = "build.appstudio.openshift.io/component";
const LOG_URL_ANNOTATION: &str = "pac.test.appstudio.openshift.io/log-url";
const TEST_STATUS_ANNOTATION: &str = "test.appstudio.openshift.io/status";

/// Raw Konflux `Snapshot` custom resource
#[derive(Debug, Default, Deserialize)]
struct SnapshotResource {
    #[serde(default)]
    metadata: ResourceMetadata,
    #[serde(default)]
    spec: ResourceSpec,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    creation_timestamp: DateTime<Utc>,
    #[serde(default)]
    annotations: HashMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResourceSpec {
    #[serde(default)]
    application: String,
    #[serde(default)]
    components: Vec<ResourceComponent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceComponent {
    #[serde(default)]
    name: String,
    #[serde(default)]
    container_image: String,
    #[serde(default)]
    source: ComponentSource,
}

#[derive(Debug, Default, Deserialize)]
struct ComponentSource {
    #[serde(default)]
    git: GitSource,
}

#[derive(Debug, Default, Deserialize)]
struct GitSource {
    #[serde(default)]
    url: String,
    #[serde(default)]
    revision: String,
}

#[derive(Debug, Deserialize)]
struct ScenarioStatus {
    scenario: String,
    #[serde(default)]
    status: String,
}

/// Maps Konflux scenario status strings to passed/failed/pending
///
/// Unknown values are kept as they are.
pub fn normalize_status(status: &str) -> String {
    let lower = status.to_lowercase();
    if lower.contains("succeeded") || lower.contains("passed") {
        "passed".to_string()
    } else if lower.contains("fail") || lower.contains("error") {
        "failed".to_string()
    } else if lower.contains("inprogress") || lower.contains("pending") {
        "pending".to_string()
    } else {
        status.to_string()
    }
}

impl SnapshotResource {
    fn trigger(&self) -> Trigger {
        let annotations = &self.metadata.annotations;
        let named = annotations
            .get(COMPONENT_ANNOTATION)
            .filter(|name| !name.is_empty());
        let pipeline_run = annotations
            .get(LOG_URL_ANNOTATION)
            .cloned()
            .unwrap_or_default();

        match named {
            Some(name) => Trigger {
                component: name.clone(),
                git_sha: self
                    .spec
                    .components
                    .iter()
                    .find(|c| &c.name == name)
                    .map(|c| c.source.git.revision.clone())
                    .unwrap_or_default(),
                pipeline_run,
            },
            None => {
                let first = self.spec.components.first();
                Trigger {
                    component: first.map(|c| c.name.clone()).unwrap_or_default(),
                    git_sha: first
                        .map(|c| c.source.git.revision.clone())
                        .unwrap_or_default(),
                    pipeline_run,
                }
            }
        }
    }

    fn test_results(&self) -> Vec<ScenarioResult> {
        let Some(raw) = self
            .metadata
            .annotations
            .get(TEST_STATUS_ANNOTATION)
            .filter(|raw| !raw.is_empty())
        else {
            return Vec::new();
        };

        match serde_json::from_str::<Vec<ScenarioStatus>>(raw) {
            Ok(statuses) => statuses
                .into_iter()
                .map(|s| ScenarioResult {
                    scenario: s.scenario,
                    status: normalize_status(&s.status),
                    ..ScenarioResult::default()
                })
                .collect(),
            Err(e) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    snapshot = %self.metadata.name,
                    error = %e,
                    "unparseable test status annotation"
                );
                Vec::new()
            }
        }
    }

    fn into_manifest(self) -> SnapshotManifest {
        let trigger = self.trigger();
        let test_results = self.test_results();
        let tests_passed =
            !test_results.is_empty() && test_results.iter().all(|r| r.status == "passed");

        SnapshotManifest {
            application: self.spec.application,
            snapshot: self.metadata.name,
            created_at: self.metadata.creation_timestamp,
            trigger,
            components: self
                .spec
                .components
                .into_iter()
                .map(|c| SnapshotComponent {
                    name: c.name,
                    container_image: c.container_image,
                    git_revision: c.source.git.revision,
                    git_url: c.source.git.url,
                })
                .collect(),
            test_results,
            readiness: SnapshotReadiness {
                tests_passed,
                ..SnapshotReadiness::default()
            },
        }
    }
}

/// ManifestDecoder accepts both manifest shapes found in the artifact store:
/// the normalised snapshot document and a raw Konflux Snapshot resource
/// (recognised by its `metadata` and `spec` objects).
pub struct ManifestDecoder;

impl ManifestDecoder {
    /// Decodes a manifest object
    ///
    /// # Errors
    /// Returns `ReadinessError::ManifestDecode` if the bytes are not a JSON
    /// object of either shape or the snapshot name is missing
    pub fn decode(key: &str, data: &[u8]) -> Result<SnapshotManifest, ReadinessError> {
        let decode_error = |details: String| ReadinessError::ManifestDecode {
            key: key.to_string(),
            details,
        };

        let value: serde_json::Value =
            serde_json::from_slice(data).map_err(|e| decode_error(e.to_string()))?;

        let is_resource = value.get("metadata").is_some_and(|v| v.is_object())
            && value.get("spec").is_some_and(|v| v.is_object());

        let manifest = if is_resource {
            serde_json::from_value::<SnapshotResource>(value)
                .map(SnapshotResource::into_manifest)
        } else {
            serde_json::from_value::<SnapshotManifest>(value)
        }
        .map_err(|e| decode_error(e.to_string()))?;

        if manifest.snapshot.trim().is_empty() {
            return Err(decode_error("snapshot name is empty".to_string()));
        }
        Ok(manifest)
    }
}
