/// Object-store adapters for snapshot manifests and result files
mod manifest_decoder;
mod s3_artifact_store;

pub use manifest_decoder::{normalize_status, ManifestDecoder};
pub use s3_artifact_store::{ObjectStoreConfig, S3ArtifactStore};
