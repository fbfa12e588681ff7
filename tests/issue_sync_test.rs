/// Integration tests for the issue sync pipeline
mod test_utilities;

use release_readiness::prelude::*;
use std::sync::Arc;
use test_utilities::mocks::{
    active_release, tracker_issue, version_info, MockIssueTracker, MOCK_BASE_URL,
};
use tokio_util::sync::CancellationToken;

const V16: &str = "quay-v3.16.2";
const V17: &str = "quay-v3.17.0";

fn setup() -> (
    IssueSyncer<MockIssueTracker, MemoryStore>,
    Arc<MockIssueTracker>,
    Arc<MemoryStore>,
) {
    let tracker = Arc::new(MockIssueTracker::new());
    let store = Arc::new(MemoryStore::new());
    (
        IssueSyncer::new(Arc::clone(&tracker), Arc::clone(&store)),
        tracker,
        store,
    )
}

async fn stored_keys(store: &MemoryStore, fix_version: &str) -> Vec<String> {
    store
        .list_issues(fix_version, &IssueFilter::new())
        .await
        .unwrap()
        .into_iter()
        .map(|issue| issue.key)
        .collect()
}

#[tokio::test]
async fn test_discovery_upserts_releases_and_issues() {
    let (syncer, tracker, store) = setup();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.set_version(version_info(V17, false));
    tracker.set_issues(
        V17,
        vec![
            tracker_issue("PROJQUAY-2", "New", "Bug"),
            tracker_issue("PROJQUAY-1", "Verified", "Story"),
        ],
    );

    let report = syncer.sync_once(&CancellationToken::new()).await;

    assert_eq!(report.discovered, 1);
    assert_eq!(report.releases_synced, 1);
    assert_eq!(report.issues_synced, 2);
    assert!(report.is_clean());

    let release = store.get_release_version(V17).await.unwrap().unwrap();
    assert_eq!(release.s3_application, "quay-v3-17");
    assert_eq!(release.release_ticket_key, "PROJQUAY-100");
    assert_eq!(release.description, "quay-v3.17.0 release");

    let issues = store.list_issues(V17, &IssueFilter::new()).await.unwrap();
    assert_eq!(issues[0].key, "PROJQUAY-1");
    assert_eq!(issues[0].link, format!("{}/browse/PROJQUAY-1", MOCK_BASE_URL));

    let summary = store.get_issue_summary(V17).await.unwrap();
    assert_eq!((summary.total, summary.verified, summary.open), (2, 1, 1));
}

#[tokio::test]
async fn test_stored_issues_match_upstream_after_each_pass() {
    let (syncer, tracker, store) = setup();
    let cancel = CancellationToken::new();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.set_issues(
        V17,
        vec![
            tracker_issue("PROJQUAY-1", "New", "Bug"),
            tracker_issue("PROJQUAY-2", "New", "Bug"),
            tracker_issue("PROJQUAY-3", "New", "Bug"),
        ],
    );
    syncer.sync_once(&cancel).await;

    tracker.set_issues(
        V17,
        vec![
            tracker_issue("PROJQUAY-2", "Closed", "Bug"),
            tracker_issue("PROJQUAY-4", "New", "Bug"),
        ],
    );
    syncer.sync_once(&cancel).await;

    assert_eq!(stored_keys(&store, V17).await, vec!["PROJQUAY-2", "PROJQUAY-4"]);
    let summary = store.get_issue_summary(V17).await.unwrap();
    assert_eq!(summary.verified, 1);
}

#[tokio::test]
async fn test_issue_moved_between_releases() {
    let (syncer, tracker, store) = setup();
    let cancel = CancellationToken::new();
    tracker.set_releases(vec![
        active_release(V16, "quay-v3-16"),
        active_release(V17, "quay-v3-17"),
    ]);
    tracker.set_issues(V16, vec![tracker_issue("PROJQUAY-9", "New", "Bug")]);
    syncer.sync_once(&cancel).await;
    assert_eq!(stored_keys(&store, V16).await, vec!["PROJQUAY-9"]);

    tracker.set_issues(V16, vec![]);
    tracker.set_issues(V17, vec![tracker_issue("PROJQUAY-9", "New", "Bug")]);
    syncer.sync_once(&cancel).await;

    assert!(stored_keys(&store, V16).await.is_empty());
    assert_eq!(stored_keys(&store, V17).await, vec!["PROJQUAY-9"]);
}

#[tokio::test]
async fn test_metadata_failure_does_not_block_release() {
    let (syncer, tracker, store) = setup();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.fail_version_lookup(V17);
    tracker.set_issues(V17, vec![tracker_issue("PROJQUAY-1", "New", "Bug")]);

    let report = syncer.sync_once(&CancellationToken::new()).await;

    assert!(report.is_clean());
    let release = store.get_release_version(V17).await.unwrap().unwrap();
    assert!(!release.released);
    assert_eq!(stored_keys(&store, V17).await, vec!["PROJQUAY-1"]);
}

#[tokio::test]
async fn test_metadata_failure_keeps_previous_description() {
    let (syncer, tracker, store) = setup();
    let cancel = CancellationToken::new();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.set_version(version_info(V17, false));
    syncer.sync_once(&cancel).await;

    tracker.fail_version_lookup(V17);
    syncer.sync_once(&cancel).await;

    let release = store.get_release_version(V17).await.unwrap().unwrap();
    assert_eq!(release.description, "quay-v3.17.0 release");
}

#[tokio::test]
async fn test_discovery_failure_aborts_pass() {
    let (syncer, tracker, store) = setup();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.fail_discovery(true);

    let report = syncer.sync_once(&CancellationToken::new()).await;

    assert!(report.aborted);
    assert!(!report.is_clean());
    assert!(store.list_all_release_versions().await.unwrap().is_empty());
    assert_eq!(tracker.search_count(V17), 0);
}

#[tokio::test]
async fn test_failing_release_does_not_block_others() {
    let (syncer, tracker, store) = setup();
    tracker.set_releases(vec![
        active_release(V16, "quay-v3-16"),
        active_release(V17, "quay-v3-17"),
    ]);
    tracker.fail_search(V16);
    tracker.set_issues(V17, vec![tracker_issue("PROJQUAY-1", "New", "Bug")]);

    let report = syncer.sync_once(&CancellationToken::new()).await;

    assert_eq!(report.failed_releases, vec![V16.to_string()]);
    assert_eq!(report.releases_synced, 1);
    assert_eq!(stored_keys(&store, V17).await, vec!["PROJQUAY-1"]);
}

#[tokio::test]
async fn test_failed_search_keeps_previous_issues() {
    let (syncer, tracker, store) = setup();
    let cancel = CancellationToken::new();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.set_issues(V17, vec![tracker_issue("PROJQUAY-1", "New", "Bug")]);
    syncer.sync_once(&cancel).await;

    tracker.fail_search(V17);
    syncer.sync_once(&cancel).await;

    assert_eq!(stored_keys(&store, V17).await, vec!["PROJQUAY-1"]);
}

#[tokio::test]
async fn test_released_upstream_is_reconciled_and_resynced() {
    let (syncer, tracker, store) = setup();
    let cancel = CancellationToken::new();
    tracker.set_releases(vec![active_release(V16, "quay-v3-16")]);
    tracker.set_version(version_info(V16, false));
    tracker.set_issues(V16, vec![tracker_issue("PROJQUAY-1", "New", "Bug")]);
    syncer.sync_once(&cancel).await;

    // Ticket closed, version released, last issue verified
    tracker.set_releases(vec![]);
    tracker.set_version(version_info(V16, true));
    tracker.set_issues(V16, vec![tracker_issue("PROJQUAY-1", "Verified", "Bug")]);
    let report = syncer.sync_once(&cancel).await;

    assert_eq!(report.discovered, 0);
    assert_eq!(report.reconciled, 1);
    assert_eq!(report.releases_synced, 1);

    let release = store.get_release_version(V16).await.unwrap().unwrap();
    assert!(release.released);
    assert_eq!(release.s3_application, "quay-v3-16");
    assert_eq!(store.get_issue_summary(V16).await.unwrap().verified, 1);
    assert!(store.list_active_release_versions().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_still_open_undiscovered_release_is_left_alone() {
    let (syncer, tracker, store) = setup();
    let cancel = CancellationToken::new();
    tracker.set_releases(vec![active_release(V16, "quay-v3-16")]);
    tracker.set_version(version_info(V16, false));
    tracker.set_issues(V16, vec![tracker_issue("PROJQUAY-1", "New", "Bug")]);
    syncer.sync_once(&cancel).await;

    tracker.set_releases(vec![]);
    tracker.set_issues(V16, vec![]);
    let report = syncer.sync_once(&cancel).await;

    assert_eq!(report.reconciled, 0);
    assert_eq!(tracker.search_count(V16), 1);
    assert_eq!(stored_keys(&store, V16).await, vec!["PROJQUAY-1"]);
    assert!(
        !store
            .get_release_version(V16)
            .await
            .unwrap()
            .unwrap()
            .released
    );
}

#[tokio::test]
async fn test_sync_feeds_readiness_query() {
    let (syncer, tracker, store) = setup();
    tracker.set_releases(vec![active_release(V17, "quay-v3-17")]);
    tracker.set_issues(V17, vec![tracker_issue("PROJQUAY-1", "New", "Bug")]);
    syncer.sync_once(&CancellationToken::new()).await;

    let query = ReadinessQuery::new(store);
    let readiness = query.release_readiness(V17).await.unwrap().unwrap();

    assert_eq!(readiness.issues.open, 1);
    assert!(readiness.latest_snapshot.is_none());
    assert_eq!(readiness.readiness.signal, Signal::Red);
}

#[tokio::test]
async fn test_file_backed_pass_writes_once_per_release() {
    let dir = tempfile::TempDir::new().unwrap();
    let tracker = Arc::new(MockIssueTracker::new());
    let store = Arc::new(MemoryStore::open(dir.path().join("state.json")).unwrap());
    let syncer = IssueSyncer::new(Arc::clone(&tracker), Arc::clone(&store));
    let cancel = CancellationToken::new();

    tracker.set_releases(vec![
        active_release(V16, "quay-v3-16"),
        active_release(V17, "quay-v3-17"),
    ]);
    for version in [V16, V17] {
        let issues = (0..200)
            .map(|n| tracker_issue(&format!("{}-{}", version, n), "New", "Bug"))
            .collect();
        tracker.set_issues(version, issues);
    }

    let report = syncer.sync_once(&cancel).await;
    assert_eq!(report.issues_synced, 400);
    assert_eq!(store.file_writes(), 2);

    let report = syncer.sync_once(&cancel).await;
    assert_eq!(report.issues_synced, 400);
    assert_eq!(store.file_writes(), 2);

    let reopened = MemoryStore::open(dir.path().join("state.json")).unwrap();
    assert_eq!(reopened.get_issue_summary(V17).await.unwrap().total, 200);
}
