pub mod issue;
pub mod release;
pub mod signal;
pub mod snapshot;
pub mod test_summary;

pub use issue::{IssueFilter, IssuePredicate, IssueRecord, IssueSummary, TrackerIssue};
pub use release::{ActiveRelease, ReleaseVersion, VersionInfo};
pub use signal::{ReadinessSignal, Signal};
pub use snapshot::{
    ApplicationSummary, ComponentRecord, NewSnapshot, ScenarioResult, SnapshotComponent,
    SnapshotManifest, SnapshotReadiness, SnapshotRecord, TestResultRecord, Trigger,
};
pub use test_summary::{TestCaseOutcome, TestCaseStatus, TestSummary};
