/// Mock implementations for testing
mod mock_artifact_store;
mod mock_issue_tracker;

pub use mock_artifact_store::MockArtifactStore;
pub use mock_issue_tracker::{
    active_release, tracker_issue, version_info, MockIssueTracker, MOCK_BASE_URL,
};
