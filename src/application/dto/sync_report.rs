use serde::Serialize;

/// Outcome of one snapshot sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotSyncReport {
    pub applications: usize,
    pub snapshots_seen: usize,
    pub ingested: usize,
    pub skipped_existing: usize,
    pub failed: usize,
    /// Set when the pass stopped early because of cancellation
    pub cancelled: bool,
}

/// Outcome of one issue sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueSyncReport {
    /// Releases found open in the tracker's release-ticket query
    pub discovered: usize,
    /// Stored active releases found closed and marked accordingly
    pub reconciled: usize,
    pub releases_synced: usize,
    pub issues_synced: usize,
    pub failed_releases: Vec<String>,
    /// Set when discovery failed and the pass stopped before syncing issues
    pub aborted: bool,
}

impl IssueSyncReport {
    pub fn is_clean(&self) -> bool {
        !self.aborted && self.failed_releases.is_empty()
    }
}

impl SnapshotSyncReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}
