use crate::ports::inbound::{ReadinessQueryPort, ReleaseReadiness};
use crate::ports::outbound::{IssueRepository, ReleaseRepository, SnapshotRepository};
use crate::readiness::domain::{IssueSummary, ReleaseVersion};
use crate::readiness::services::{ReadinessEvaluator, VersionParser};
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// ReadinessQuery - Evaluates releases from the persisted sync state
///
/// The latest snapshot of a release is found through its stored artifact
/// application. Releases stored without one fall back to the application
/// derived from the release name.
pub struct ReadinessQuery<R> {
    store: Arc<R>,
}

impl<R> ReadinessQuery<R>
where
    R: ReleaseRepository + IssueRepository + SnapshotRepository,
{
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    async fn assemble(
        &self,
        release: ReleaseVersion,
        issues: IssueSummary,
    ) -> Result<ReleaseReadiness> {
        let application = if release.s3_application.is_empty() {
            VersionParser::application_for(&release.name).unwrap_or_default()
        } else {
            release.s3_application.clone()
        };

        let latest_snapshot = if application.is_empty() {
            None
        } else {
            self.store
                .latest_snapshot_for_application(&application)
                .await?
        };

        let tests_passed = latest_snapshot.as_ref().is_some_and(|s| s.tests_passed);
        let readiness = ReadinessEvaluator::evaluate(&release, &issues, tests_passed);

        Ok(ReleaseReadiness {
            release,
            issues,
            latest_snapshot,
            readiness,
        })
    }
}

#[async_trait]
impl<R> ReadinessQueryPort for ReadinessQuery<R>
where
    R: ReleaseRepository + IssueRepository + SnapshotRepository,
{
    async fn release_readiness(&self, name: &str) -> Result<Option<ReleaseReadiness>> {
        let Some(release) = self.store.get_release_version(name).await? else {
            return Ok(None);
        };
        let issues = self.store.get_issue_summary(name).await?;
        Ok(Some(self.assemble(release, issues).await?))
    }

    async fn all_release_readiness(&self) -> Result<Vec<ReleaseReadiness>> {
        let releases = self.store.list_all_release_versions().await?;
        let names: Vec<String> = releases.iter().map(|r| r.name.clone()).collect();
        let mut summaries = self.store.get_issue_summaries_batch(&names).await?;

        let mut readiness = Vec::with_capacity(releases.len());
        for release in releases {
            let issues = summaries.remove(&release.name).unwrap_or_default();
            readiness.push(self.assemble(release, issues).await?);
        }
        Ok(readiness)
    }
}
