use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp layout of the tracker's `updated` field, e.g. `2026-02-03T04:05:06.000+0000`
const TRACKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

/// An issue as returned by the tracker search, before it is pinned to a release
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerIssue {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    pub labels: Vec<String>,
    pub assignee: Option<String>,
    pub issue_type: String,
    pub resolution: Option<String>,
    pub updated: Option<String>,
}

impl TrackerIssue {
    /// Pins this issue to a release, producing the stored record
    ///
    /// # Arguments
    /// * `fix_version` - Release the issue was found under
    /// * `base_url` - Tracker base URL used to build the browse link
    pub fn into_record(self, fix_version: &str, base_url: &str) -> IssueRecord {
        let updated_at = self
            .updated
            .as_deref()
            .and_then(|raw| DateTime::parse_from_str(raw, TRACKER_TIMESTAMP_FORMAT).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        IssueRecord {
            link: format!("{}/browse/{}", base_url.trim_end_matches('/'), self.key),
            key: self.key,
            summary: self.summary,
            status: self.status,
            priority: self.priority,
            labels: self.labels.join(","),
            fix_version: fix_version.to_string(),
            assignee: self.assignee.unwrap_or_default(),
            issue_type: self.issue_type,
            resolution: self.resolution.unwrap_or_default(),
            updated_at,
        }
    }
}

/// One tracker issue pinned to one release; keyed by (key, fix_version)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: String,
    /// Comma-joined label list
    pub labels: String,
    pub fix_version: String,
    pub assignee: String,
    pub issue_type: String,
    pub resolution: String,
    pub link: String,
    pub updated_at: DateTime<Utc>,
}

/// Issue counts for one release
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub total: usize,
    pub verified: usize,
    pub open: usize,
    pub cves: usize,
    pub bugs: usize,
}

/// A single issue-listing predicate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssuePredicate {
    TypeEquals(String),
    StatusEquals(String),
    /// Case-insensitive substring of the comma-joined labels
    LabelContains(String),
}

impl IssuePredicate {
    pub fn matches(&self, issue: &IssueRecord) -> bool {
        match self {
            IssuePredicate::TypeEquals(value) => issue.issue_type == *value,
            IssuePredicate::StatusEquals(value) => issue.status == *value,
            IssuePredicate::LabelContains(value) => issue
                .labels
                .to_lowercase()
                .contains(&value.to_lowercase()),
        }
    }
}

/// AND-combined list of predicates; an empty filter matches every issue
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    predicates: Vec<IssuePredicate>,
}

impl IssueFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a predicate; blank values are ignored
    pub fn with(mut self, predicate: IssuePredicate) -> Self {
        let value = match &predicate {
            IssuePredicate::TypeEquals(v)
            | IssuePredicate::StatusEquals(v)
            | IssuePredicate::LabelContains(v) => v,
        };
        if !value.is_empty() {
            self.predicates.push(predicate);
        }
        self
    }

    pub fn with_type(self, issue_type: impl Into<String>) -> Self {
        self.with(IssuePredicate::TypeEquals(issue_type.into()))
    }

    pub fn with_status(self, status: impl Into<String>) -> Self {
        self.with(IssuePredicate::StatusEquals(status.into()))
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.with(IssuePredicate::LabelContains(label.into()))
    }

    pub fn predicates(&self) -> &[IssuePredicate] {
        &self.predicates
    }

    pub fn matches(&self, issue: &IssueRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(issue))
    }
}
