use crate::readiness::domain::{ActiveRelease, TrackerIssue, VersionInfo};
use crate::shared::Result;
use async_trait::async_trait;

/// IssueTracker port for querying release tickets, issues and versions
///
/// Implementations handle pagination and rate limiting internally; callers
/// always receive complete result sets.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Discovers releases from open release-tracking tickets
    ///
    /// Tickets whose summary carries no parsable version are dropped.
    async fn discover_active_releases(&self) -> Result<Vec<ActiveRelease>>;

    /// Fetches every issue scoped to a fix version
    async fn search_issues(&self, fix_version: &str) -> Result<Vec<TrackerIssue>>;

    /// Looks up version metadata by name
    ///
    /// # Returns
    /// `None` when the project has no version with that name
    async fn get_version(&self, name: &str) -> Result<Option<VersionInfo>>;

    /// Base URL used to build issue links
    fn base_url(&self) -> &str;
}
