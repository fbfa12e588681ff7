mod readiness_evaluator;
mod version_parser;

pub use readiness_evaluator::ReadinessEvaluator;
pub use version_parser::{ParsedVersion, VersionParser};
