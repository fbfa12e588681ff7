use serde::{Deserialize, Serialize};

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestCaseStatus {
    Passed,
    Failed,
    /// Counted as failed in the summary counts
    Error,
    Skipped,
}

impl TestCaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestCaseStatus::Passed => "passed",
            TestCaseStatus::Failed => "failed",
            TestCaseStatus::Error => "error",
            TestCaseStatus::Skipped => "skipped",
        }
    }
}

/// One test case as reported by a result file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCaseOutcome {
    pub name: String,
    pub classname: String,
    pub duration_sec: f64,
    pub status: TestCaseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_text: Option<String>,
}

/// Aggregated pass/fail/skip counts for one or more result files
///
/// Also used for the pre-computed `summary` object of a scenario inside a
/// snapshot manifest, which carries counts but no per-case detail.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestSummary {
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub passed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub duration_sec: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cases: Vec<TestCaseOutcome>,
}

impl TestSummary {
    /// Records one test case, updating the counts
    pub fn record(&mut self, case: TestCaseOutcome) {
        match case.status {
            TestCaseStatus::Passed => self.passed += 1,
            TestCaseStatus::Failed | TestCaseStatus::Error => self.failed += 1,
            TestCaseStatus::Skipped => self.skipped += 1,
        }
        self.total += 1;
        self.cases.push(case);
    }

    /// Folds another summary into this one: counts and durations are summed,
    /// per-case details are concatenated in order.
    pub fn merge(&mut self, other: TestSummary) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.duration_sec += other.duration_sec;
        self.cases.extend(other.cases);
    }

    /// Merges any number of summaries into a fresh one
    pub fn merge_all<I>(summaries: I) -> TestSummary
    where
        I: IntoIterator<Item = TestSummary>,
    {
        summaries
            .into_iter()
            .fold(TestSummary::default(), |mut acc, summary| {
                acc.merge(summary);
                acc
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(name: &str, status: TestCaseStatus) -> TestCaseOutcome {
        TestCaseOutcome {
            name: name.to_string(),
            classname: "suite".to_string(),
            duration_sec: 0.5,
            status,
            failure_message: None,
            failure_text: None,
        }
    }

    #[test]
    fn test_record_counts_error_as_failed() {
        let mut summary = TestSummary::default();
        summary.record(case("a", TestCaseStatus::Passed));
        summary.record(case("b", TestCaseStatus::Error));
        summary.record(case("c", TestCaseStatus::Failed));
        summary.record(case("d", TestCaseStatus::Skipped));

        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.cases.len(), 4);
    }

    #[test]
    fn test_merge_all_sums_counts_and_durations() {
        let mut first = TestSummary::default();
        first.record(case("a", TestCaseStatus::Passed));
        first.duration_sec = 1.5;

        let mut second = TestSummary::default();
        second.record(case("b", TestCaseStatus::Failed));
        second.record(case("c", TestCaseStatus::Passed));
        second.duration_sec = 2.0;

        let merged = TestSummary::merge_all(vec![first, second]);
        assert_eq!(merged.total, 3);
        assert_eq!(merged.passed, 2);
        assert_eq!(merged.failed, 1);
        assert!((merged.duration_sec - 3.5).abs() < f64::EPSILON);
        let names: Vec<&str> = merged.cases.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_merge_all_empty_is_zero() {
        let merged = TestSummary::merge_all(Vec::new());
        assert_eq!(merged, TestSummary::default());
    }

    #[test]
    fn test_manifest_summary_deserializes_without_cases() {
        let json = r#"{"total":10,"passed":9,"failed":1,"skipped":0,"duration_sec":42.5}"#;
        let summary: TestSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total, 10);
        assert_eq!(summary.failed, 1);
        assert!(summary.cases.is_empty());
    }
}
