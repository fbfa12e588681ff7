use async_trait::async_trait;
use release_readiness::prelude::*;
use release_readiness::readiness::domain::{ActiveRelease, TrackerIssue, VersionInfo};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const MOCK_BASE_URL: &str = "https://issues.example.com";

/// Mock IssueTracker for testing
///
/// State can be changed between sync passes to simulate upstream changes.
#[derive(Default)]
pub struct MockIssueTracker {
    releases: Mutex<Vec<ActiveRelease>>,
    issues: Mutex<HashMap<String, Vec<TrackerIssue>>>,
    versions: Mutex<HashMap<String, VersionInfo>>,
    failing_searches: Mutex<HashSet<String>>,
    failing_versions: Mutex<HashSet<String>>,
    fail_discovery: Mutex<bool>,
    pub version_lookups: Mutex<Vec<String>>,
    pub searches: Mutex<Vec<String>>,
}

impl MockIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_releases(&self, releases: Vec<ActiveRelease>) {
        *self.releases.lock().unwrap() = releases;
    }

    pub fn set_issues(&self, fix_version: &str, issues: Vec<TrackerIssue>) {
        self.issues
            .lock()
            .unwrap()
            .insert(fix_version.to_string(), issues);
    }

    pub fn set_version(&self, info: VersionInfo) {
        self.versions
            .lock()
            .unwrap()
            .insert(info.name.clone(), info);
    }

    pub fn fail_search(&self, fix_version: &str) {
        self.failing_searches
            .lock()
            .unwrap()
            .insert(fix_version.to_string());
    }

    pub fn fail_version_lookup(&self, name: &str) {
        self.failing_versions
            .lock()
            .unwrap()
            .insert(name.to_string());
    }

    pub fn fail_discovery(&self, fail: bool) {
        *self.fail_discovery.lock().unwrap() = fail;
    }

    pub fn search_count(&self, fix_version: &str) -> usize {
        self.searches
            .lock()
            .unwrap()
            .iter()
            .filter(|v| v.as_str() == fix_version)
            .count()
    }
}

/// Builds a discovered release
pub fn active_release(fix_version: &str, application: &str) -> ActiveRelease {
    ActiveRelease {
        fix_version: fix_version.to_string(),
        ticket_key: "PROJQUAY-100".to_string(),
        assignee: "Release Captain".to_string(),
        due_date: None,
        s3_application: application.to_string(),
    }
}

pub fn tracker_issue(key: &str, status: &str, issue_type: &str) -> TrackerIssue {
    TrackerIssue {
        key: key.to_string(),
        summary: format!("{} summary", key),
        status: status.to_string(),
        priority: "Major".to_string(),
        labels: vec![],
        assignee: None,
        issue_type: issue_type.to_string(),
        resolution: None,
        updated: Some("2026-03-01T10:00:00.000+0000".to_string()),
    }
}

pub fn version_info(name: &str, released: bool) -> VersionInfo {
    VersionInfo {
        name: name.to_string(),
        description: format!("{} release", name),
        release_date: None,
        released,
        archived: false,
    }
}

#[async_trait]
impl IssueTracker for MockIssueTracker {
    async fn discover_active_releases(&self) -> Result<Vec<ActiveRelease>> {
        if *self.fail_discovery.lock().unwrap() {
            anyhow::bail!("Mock discovery failure");
        }
        Ok(self.releases.lock().unwrap().clone())
    }

    async fn search_issues(&self, fix_version: &str) -> Result<Vec<TrackerIssue>> {
        self.searches.lock().unwrap().push(fix_version.to_string());
        if self.failing_searches.lock().unwrap().contains(fix_version) {
            anyhow::bail!("Mock search failure for {}", fix_version);
        }
        Ok(self
            .issues
            .lock()
            .unwrap()
            .get(fix_version)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_version(&self, name: &str) -> Result<Option<VersionInfo>> {
        self.version_lookups.lock().unwrap().push(name.to_string());
        if self.failing_versions.lock().unwrap().contains(name) {
            anyhow::bail!("Mock version lookup failure for {}", name);
        }
        Ok(self.versions.lock().unwrap().get(name).cloned())
    }

    fn base_url(&self) -> &str {
        MOCK_BASE_URL
    }
}
