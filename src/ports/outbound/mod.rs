/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (object store, issue tracker, store).
pub mod artifact_store;
pub mod issue_tracker;
pub mod repositories;

pub use artifact_store::ArtifactStore;
pub use issue_tracker::IssueTracker;
pub use repositories::{IssueRepository, ReleaseRepository, SnapshotRepository, StorageFlush};
