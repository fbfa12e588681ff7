/// Use cases module containing the sync pipelines and readiness query
mod query_readiness;
mod sync_issues;
mod sync_snapshots;

pub use query_readiness::ReadinessQuery;
pub use sync_issues::IssueSyncer;
pub use sync_snapshots::SnapshotSyncer;
