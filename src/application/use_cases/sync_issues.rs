use crate::application::dto::IssueSyncReport;
use crate::ports::outbound::{IssueRepository, IssueTracker, ReleaseRepository};
use crate::readiness::domain::{ActiveRelease, ReleaseVersion};
use crate::shared::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "release_readiness::issue_sync";

/// IssueSyncer - Mirrors release versions and their issues from the tracker
///
/// A pass has two phases. Discovery finds releases from open release
/// tickets and upserts them with best-effort version metadata. Then every
/// discovered release, plus any stored active release that dropped out of
/// discovery but is now closed upstream, has its issue set replaced by the
/// tracker's current one.
///
/// # Type Parameters
/// * `T` - IssueTracker implementation
/// * `R` - Store implementing both release and issue repositories
pub struct IssueSyncer<T, R> {
    tracker: Arc<T>,
    store: Arc<R>,
}

impl<T, R> IssueSyncer<T, R>
where
    T: IssueTracker,
    R: ReleaseRepository + IssueRepository,
{
    pub fn new(tracker: Arc<T>, store: Arc<R>) -> Self {
        Self { tracker, store }
    }

    /// Runs one discovery and issue sync pass
    ///
    /// A discovery failure aborts the pass. A failure syncing one release
    /// is recorded in the report and the remaining releases continue.
    pub async fn sync_once(&self, cancel: &CancellationToken) -> IssueSyncReport {
        let mut report = IssueSyncReport::default();

        let releases = match self.tracker.discover_active_releases().await {
            Ok(releases) => releases,
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = format!("{:#}", e),
                    "Failed to discover releases"
                );
                report.aborted = true;
                return report;
            }
        };
        report.discovered = releases.len();
        tracing::info!(target: TRACING_TARGET, count = releases.len(), "Discovered active releases");

        let mut discovered = HashSet::new();
        for release in &releases {
            if cancel.is_cancelled() {
                return self.cancelled(report);
            }
            discovered.insert(release.fix_version.clone());

            if let Err(e) = self.upsert_discovered(release).await {
                tracing::error!(
                    target: TRACING_TARGET,
                    version = %release.fix_version,
                    error = format!("{:#}", e),
                    "Failed to store release"
                );
            }
            self.sync_and_record(&release.fix_version, &mut report).await;
        }

        let stored = match self.store.list_active_release_versions().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = format!("{:#}", e),
                    "Failed to list stored active releases"
                );
                return report;
            }
        };

        for release in stored {
            if discovered.contains(&release.name) {
                continue;
            }
            if cancel.is_cancelled() {
                return self.cancelled(report);
            }

            match self.reconcile(release).await {
                Ok(Some(name)) => {
                    report.reconciled += 1;
                    self.sync_and_record(&name, &mut report).await;
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(
                    target: TRACING_TARGET,
                    error = format!("{:#}", e),
                    "Failed to reconcile release"
                ),
            }
        }

        tracing::info!(
            target: TRACING_TARGET,
            releases = report.releases_synced,
            issues = report.issues_synced,
            reconciled = report.reconciled,
            failed = report.failed_releases.len(),
            "Issue sync finished"
        );
        report
    }

    fn cancelled(&self, mut report: IssueSyncReport) -> IssueSyncReport {
        tracing::info!(target: TRACING_TARGET, "Issue sync cancelled");
        report.aborted = true;
        report
    }

    /// Upserts a discovered release, overlaying version metadata if available
    ///
    /// Fields not carried by discovery (description, release date) survive
    /// from the stored record when the metadata lookup fails.
    async fn upsert_discovered(&self, release: &ActiveRelease) -> Result<()> {
        let mut record = match self.store.get_release_version(&release.fix_version).await? {
            Some(mut existing) => {
                existing.release_ticket_key = release.ticket_key.clone();
                existing.release_ticket_assignee = release.assignee.clone();
                existing.s3_application = release.s3_application.clone();
                existing.due_date = release.due_date;
                existing
            }
            None => release.to_release_version(),
        };

        match self.tracker.get_version(&release.fix_version).await {
            Ok(Some(info)) => record.apply_version_info(&info),
            Ok(None) => tracing::warn!(
                target: TRACING_TARGET,
                version = %release.fix_version,
                "Version not found in tracker"
            ),
            Err(e) => tracing::warn!(
                target: TRACING_TARGET,
                version = %release.fix_version,
                error = format!("{:#}", e),
                "Failed to fetch version metadata"
            ),
        }

        self.store.upsert_release_version(record).await
    }

    /// Re-checks a stored active release that was not rediscovered
    ///
    /// # Returns
    /// The release name if it is now released or archived upstream and was
    /// updated, `None` if it is still open or unknown to the tracker
    async fn reconcile(&self, mut release: ReleaseVersion) -> Result<Option<String>> {
        let Some(info) = self.tracker.get_version(&release.name).await? else {
            return Ok(None);
        };
        if !info.is_closed() {
            return Ok(None);
        }

        release.apply_version_info(&info);
        let name = release.name.clone();
        self.store.upsert_release_version(release).await?;

        tracing::info!(
            target: TRACING_TARGET,
            version = %name,
            released = info.released,
            archived = info.archived,
            "Reconciled release"
        );
        Ok(Some(name))
    }

    async fn sync_and_record(&self, fix_version: &str, report: &mut IssueSyncReport) {
        match self.sync_version(fix_version).await {
            Ok(count) => {
                report.releases_synced += 1;
                report.issues_synced += count;
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    version = %fix_version,
                    error = format!("{:#}", e),
                    "Failed to sync issues"
                );
                report.failed_releases.push(fix_version.to_string());
                if let Err(e) = self.store.flush().await {
                    tracing::error!(
                        target: TRACING_TARGET,
                        version = %fix_version,
                        error = format!("{:#}", e),
                        "Failed to flush store"
                    );
                }
            }
        }
    }

    /// Replaces the stored issue set of one release with the tracker's
    ///
    /// Every returned issue is upserted, then stored issues whose keys were
    /// not returned are deleted. A failed upsert is logged and does not stop
    /// the others. The store is flushed once at the end, which also persists
    /// the release record written before the call.
    ///
    /// # Returns
    /// Number of issues returned by the tracker
    pub async fn sync_version(&self, fix_version: &str) -> Result<usize> {
        let issues = self.tracker.search_issues(fix_version).await?;
        let base_url = self.tracker.base_url().to_string();

        let mut keys = Vec::with_capacity(issues.len());
        for issue in issues {
            let key = issue.key.clone();
            let record = issue.into_record(fix_version, &base_url);
            if let Err(e) = self.store.upsert_issue(record).await {
                tracing::error!(
                    target: TRACING_TARGET,
                    version = %fix_version,
                    key = %key,
                    error = format!("{:#}", e),
                    "Failed to store issue"
                );
            }
            keys.push(key);
        }

        let removed = self.store.delete_issues_not_in(fix_version, &keys).await?;
        self.store.flush().await?;
        tracing::info!(
            target: TRACING_TARGET,
            version = %fix_version,
            count = keys.len(),
            removed,
            "Synced issues"
        );
        Ok(keys.len())
    }
}
