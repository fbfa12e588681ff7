/// Network adapters for the issue tracker
mod jira_client;
mod pagination;
mod retry;
mod tracker_error;

pub use jira_client::{JiraClient, JiraConfig, DEFAULT_PAGE_SIZE};
pub use pagination::{collect_pages, Page};
pub use retry::RetryPolicy;
pub use tracker_error::TrackerError;
