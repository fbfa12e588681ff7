use crate::readiness::domain::{IssueRecord, IssueSummary};

/// Statuses that count an issue as verified (compared case-insensitively)
const VERIFIED_STATUSES: [&str; 3] = ["closed", "verified", "done"];

/// IssueClassification policy for bucketing release issues
///
/// Rules:
/// - verified: status is closed, verified or done; every other status is open
/// - CVE: issue type is `cve` or any label contains `cve`
/// - bug: issue type is `bug`
///
/// The CVE and bug buckets overlap with verified/open.
pub struct IssueClassification;

impl IssueClassification {
    pub fn is_verified(status: &str) -> bool {
        let status = status.to_lowercase();
        VERIFIED_STATUSES.contains(&status.as_str())
    }

    pub fn is_cve(issue_type: &str, labels: &str) -> bool {
        issue_type.eq_ignore_ascii_case("cve") || labels.to_lowercase().contains("cve")
    }

    pub fn is_bug(issue_type: &str) -> bool {
        issue_type.eq_ignore_ascii_case("bug")
    }

    /// Computes the summary counts for a set of issues
    ///
    /// # Arguments
    /// * `issues` - Issues of a single release
    ///
    /// # Returns
    /// Counts of total, verified, open, CVE and bug issues
    pub fn summarize<'a, I>(issues: I) -> IssueSummary
    where
        I: IntoIterator<Item = &'a IssueRecord>,
    {
        let mut summary = IssueSummary::default();
        for issue in issues {
            summary.total += 1;
            if Self::is_verified(&issue.status) {
                summary.verified += 1;
            } else {
                summary.open += 1;
            }
            if Self::is_cve(&issue.issue_type, &issue.labels) {
                summary.cves += 1;
            }
            if Self::is_bug(&issue.issue_type) {
                summary.bugs += 1;
            }
        }
        summary
    }
}
