/// Data Transfer Objects for the application layer
mod output_format;
mod sync_report;

pub use output_format::OutputFormat;
pub use sync_report::{IssueSyncReport, SnapshotSyncReport};
