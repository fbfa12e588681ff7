mod issue_classification;

pub use issue_classification::IssueClassification;
