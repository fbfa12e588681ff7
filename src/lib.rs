//! release-readiness - release readiness synchroniser
//!
//! Ingests Konflux snapshots (with their integration-test results) from an
//! S3 bucket and release issues from JIRA into a local store, then derives a
//! green/yellow/red readiness signal per release. Organized following
//! hexagonal architecture.
//!
//! # Architecture
//!
//! - **Domain Layer** (`readiness`): value objects, the readiness evaluator,
//!   version derivation and issue classification
//! - **Application Layer** (`application`): sync use cases, the readiness
//!   query and the periodic scheduler
//! - **Ports** (`ports`): interface definitions for infrastructure
//! - **Adapters** (`adapters`): S3, JIRA, JUnit parsing, the store, console output
//! - **Shared** (`shared`): error types and the `Result` alias
//!
//! # Example
//!
//! ```no_run
//! use release_readiness::prelude::*;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let tracker = Arc::new(JiraClient::new(JiraConfig::new(
//!     "https://issues.redhat.com",
//!     "token",
//!     "PROJQUAY",
//! ))?);
//!
//! let syncer = IssueSyncer::new(tracker, Arc::clone(&store));
//! let report = syncer.sync_once(&CancellationToken::new()).await;
//! println!("synced {} issues", report.issues_synced);
//!
//! let query = ReadinessQuery::new(store);
//! for entry in query.all_release_readiness().await? {
//!     println!("{}: {}", entry.release.name, entry.readiness.signal);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod ports;
pub mod readiness;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::ReadinessPrinter;
    pub use crate::adapters::outbound::network::{JiraClient, JiraConfig, RetryPolicy};
    pub use crate::adapters::outbound::object_store::{ObjectStoreConfig, S3ArtifactStore};
    pub use crate::adapters::outbound::parsers::JunitParser;
    pub use crate::adapters::outbound::persistence::MemoryStore;
    pub use crate::application::dto::{IssueSyncReport, OutputFormat, SnapshotSyncReport};
    pub use crate::application::scheduler::{run_periodic, SyncJob};
    pub use crate::application::use_cases::{IssueSyncer, ReadinessQuery, SnapshotSyncer};
    pub use crate::ports::inbound::{ReadinessQueryPort, ReleaseReadiness};
    pub use crate::ports::outbound::{
        ArtifactStore, IssueRepository, IssueTracker, ReleaseRepository, SnapshotRepository,
        StorageFlush,
    };
    pub use crate::readiness::domain::{
        IssueFilter, IssueRecord, IssueSummary, ReadinessSignal, ReleaseVersion, Signal,
        SnapshotManifest, SnapshotRecord, TestSummary,
    };
    pub use crate::readiness::services::{ReadinessEvaluator, VersionParser};
    pub use crate::shared::Result;
}
