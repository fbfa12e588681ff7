use crate::application::use_cases::{IssueSyncer, SnapshotSyncer};
use crate::ports::outbound::{
    ArtifactStore, IssueRepository, IssueTracker, ReleaseRepository, SnapshotRepository,
};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "release_readiness::scheduler";

/// One reconciliation pass that can be run on a timer
#[async_trait]
pub trait SyncJob: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Runs one pass to completion, observing `cancel` between items
    async fn run_once(&self, cancel: &CancellationToken);
}

#[async_trait]
impl<A, S> SyncJob for SnapshotSyncer<A, S>
where
    A: ArtifactStore,
    S: SnapshotRepository,
{
    fn name(&self) -> &'static str {
        "snapshots"
    }

    async fn run_once(&self, cancel: &CancellationToken) {
        self.sync_once(cancel).await;
    }
}

#[async_trait]
impl<T, R> SyncJob for IssueSyncer<T, R>
where
    T: IssueTracker,
    R: ReleaseRepository + IssueRepository,
{
    fn name(&self) -> &'static str {
        "issues"
    }

    async fn run_once(&self, cancel: &CancellationToken) {
        self.sync_once(cancel).await;
    }
}

/// Runs a job immediately and then once per interval until cancelled
///
/// A pass always finishes before the next tick is awaited, so a job never
/// overlaps with itself. Ticks missed during a slow pass are not replayed.
/// Cancellation is checked between passes; the job itself checks it between
/// items.
pub async fn run_periodic<J>(job: &J, interval: Duration, cancel: CancellationToken)
where
    J: SyncJob + ?Sized,
{
    tracing::info!(
        target: TRACING_TARGET,
        job = job.name(),
        interval_secs = interval.as_secs(),
        "Starting sync loop"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                tracing::debug!(target: TRACING_TARGET, job = job.name(), "Sync tick");
                job.run_once(&cancel).await;
            }
        }
    }

    tracing::info!(target: TRACING_TARGET, job = job.name(), "Sync loop stopped");
}
