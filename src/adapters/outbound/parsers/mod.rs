/// Parsers for result files published next to snapshot manifests
mod junit_parser;

pub use junit_parser::JunitParser;
