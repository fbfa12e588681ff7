use crate::readiness::domain::{IssueSummary, ReadinessSignal, ReleaseVersion, Signal};
use chrono::{NaiveDate, Utc};

/// Days before the due date at which a release turns yellow
const DUE_SOON_DAYS: i64 = 3;

/// ReadinessEvaluator derives the green/yellow/red verdict for a release
///
/// Rules, first match wins:
/// 1. released → green "Released"
/// 2. due date passed → red "Past due date"
/// 3. tests failing and open issues → red
/// 4. tests failing → yellow
/// 5. open issues → yellow
/// 6. due within 3 days → yellow "Due date in N days"
/// 7. otherwise green "All checks passing"
pub struct ReadinessEvaluator;

impl ReadinessEvaluator {
    /// Evaluates a release against today's UTC date
    ///
    /// # Arguments
    /// * `release` - The release record
    /// * `issues` - Issue counts for the release
    /// * `tests_passed` - Tests-passed flag of the release's latest snapshot
    pub fn evaluate(
        release: &ReleaseVersion,
        issues: &IssueSummary,
        tests_passed: bool,
    ) -> ReadinessSignal {
        Self::evaluate_on(release, issues, tests_passed, Utc::now().date_naive())
    }

    /// Evaluates a release as of the given date
    pub fn evaluate_on(
        release: &ReleaseVersion,
        issues: &IssueSummary,
        tests_passed: bool,
        today: NaiveDate,
    ) -> ReadinessSignal {
        if release.released {
            return ReadinessSignal::new(Signal::Green, "Released");
        }

        let days_until_due = release
            .due_date
            .map(|due| due.signed_duration_since(today).num_days());

        if matches!(days_until_due, Some(days) if days < 0) {
            return ReadinessSignal::new(Signal::Red, "Past due date");
        }

        let has_open_issues = issues.open > 0;
        match (tests_passed, has_open_issues) {
            (false, true) => {
                return ReadinessSignal::new(Signal::Red, "Tests failing and open issues remain")
            }
            (false, false) => {
                return ReadinessSignal::new(Signal::Yellow, "Integration tests failing")
            }
            (true, true) => return ReadinessSignal::new(Signal::Yellow, "Open issues remain"),
            (true, false) => {}
        }

        if let Some(days) = days_until_due.filter(|days| *days <= DUE_SOON_DAYS) {
            return ReadinessSignal::new(Signal::Yellow, format!("Due date in {} days", days));
        }

        ReadinessSignal::new(Signal::Green, "All checks passing")
    }
}
