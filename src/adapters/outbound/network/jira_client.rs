use super::pagination::{collect_pages, Page};
use super::retry::RetryPolicy;
use super::tracker_error::{truncate_body, TrackerError};
use crate::ports::outbound::IssueTracker;
use crate::readiness::domain::{ActiveRelease, TrackerIssue, VersionInfo};
use crate::readiness::services::VersionParser;
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "release_readiness::jira";

/// Default number of issues requested per search page
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Component tagging release-tracking tickets
const RELEASE_COMPONENT: &str = "-area/release";

const DISCOVERY_FIELDS: &str = "summary,status,fixVersions,duedate,components,assignee";
const SEARCH_FIELDS: &str =
    "summary,status,priority,labels,fixVersions,assignee,issuetype,resolution,updated";

/// Date layout of `duedate` and version `releaseDate`
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total: usize,
    #[serde(default)]
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    key: String,
    #[serde(default)]
    fields: WireFields,
}

#[derive(Debug, Default, Deserialize)]
struct WireFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    status: Option<NamedField>,
    #[serde(default)]
    priority: Option<NamedField>,
    #[serde(default)]
    labels: Vec<String>,
    #[serde(default)]
    assignee: Option<UserField>,
    #[serde(default)]
    issuetype: Option<NamedField>,
    #[serde(default)]
    resolution: Option<NamedField>,
    #[serde(default)]
    updated: Option<String>,
    #[serde(default)]
    duedate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedField {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserField {
    #[serde(default)]
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireVersion {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    released: bool,
    #[serde(default)]
    archived: bool,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

fn name_of(field: Option<NamedField>) -> String {
    field.map(|f| f.name).unwrap_or_default()
}

impl From<WireIssue> for TrackerIssue {
    fn from(issue: WireIssue) -> Self {
        let fields = issue.fields;
        Self {
            key: issue.key,
            summary: fields.summary,
            status: name_of(fields.status),
            priority: name_of(fields.priority),
            labels: fields.labels,
            assignee: fields.assignee.map(|a| a.display_name),
            issue_type: name_of(fields.issuetype),
            resolution: fields.resolution.map(|r| r.name),
            updated: fields.updated,
        }
    }
}

impl From<WireVersion> for VersionInfo {
    fn from(version: WireVersion) -> Self {
        Self {
            release_date: parse_date(version.release_date.as_deref()),
            name: version.name,
            description: version.description,
            released: version.released,
            archived: version.archived,
        }
    }
}

/// Connection settings for the JIRA REST API
#[derive(Debug, Clone)]
pub struct JiraConfig {
    /// e.g. `https://issues.redhat.com`
    pub base_url: String,
    /// Personal access token sent as a bearer token; empty for anonymous access
    pub token: String,
    /// Project key, e.g. `PROJQUAY`
    pub project: String,
    /// Custom field holding the target version, e.g. `customfield_12319940`
    pub target_version_field: Option<String>,
    pub page_size: usize,
    pub retry: RetryPolicy,
}

impl JiraConfig {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            project: project.into(),
            target_version_field: None,
            page_size: DEFAULT_PAGE_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

/// JiraClient adapter for the JIRA Server/Cloud REST API v2
///
/// Implements the IssueTracker port. Every request goes through the
/// configured `RetryPolicy`; searches are paginated with `startAt` and
/// `maxResults`. Once the client's cancellation token fires, pending waits
/// and requests fail with `TrackerError::Cancelled`.
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    project: String,
    target_version_field: Option<String>,
    page_size: usize,
    retry: RetryPolicy,
    cancel: CancellationToken,
}

impl JiraClient {
    /// Creates a new JIRA client
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: JiraConfig) -> Result<Self> {
        let user_agent = format!("release-readiness/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(user_agent)
            .build()
            .context("Failed to build HTTP client for JIRA")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
            project: config.project,
            target_version_field: config
                .target_version_field
                .filter(|field| !field.trim().is_empty()),
            page_size: config.page_size.max(1),
            retry: config.retry,
            cancel: CancellationToken::new(),
        })
    }

    /// Ties every request and retry wait of this client to `cancel`
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    fn discovery_jql(&self) -> String {
        format!(
            r#"project={} AND component="{}" AND status NOT IN (Closed, Done)"#,
            self.project, RELEASE_COMPONENT
        )
    }

    /// JQL selecting the issues of one release
    ///
    /// With a target-version field configured, an issue matches when either
    /// its fixVersion or the custom field equals the version.
    pub(crate) fn search_jql(&self, fix_version: &str) -> String {
        let version = fix_version.replace('"', "\\\"");
        match &self.target_version_field {
            None => format!(r#"project={} AND fixVersion="{}""#, self.project, version),
            Some(field) => {
                let field_id = field.strip_prefix("customfield_").unwrap_or(field);
                format!(
                    r#"project={} AND (fixVersion="{}" OR cf[{}]="{}")"#,
                    self.project, version, field_id, version
                )
            }
        }
    }

    /// Performs one GET and classifies the response
    async fn get(&self, url: String) -> std::result::Result<Vec<u8>, TrackerError> {
        tracing::debug!(target: TRACING_TARGET, url = %url, "GET");

        let mut request = self.client.get(&url).header(ACCEPT, "application/json");
        if !self.token.is_empty() {
            request = request.bearer_auth(&self.token);
        }

        let response = request.send().await?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        let body = response.bytes().await?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(TrackerError::RateLimited {
                retry_after,
                body: truncate_body(&body),
            });
        }
        if status != StatusCode::OK {
            return Err(TrackerError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body.to_vec())
    }

    async fn get_with_retry(&self, url: String) -> std::result::Result<Vec<u8>, TrackerError> {
        let client = self;
        self.retry
            .run(&self.cancel, move || client.get(url.clone()))
            .await
    }

    async fn search_page(
        &self,
        jql: &str,
        fields: &str,
        start_at: usize,
    ) -> std::result::Result<Page<WireIssue>, TrackerError> {
        let url = format!(
            "{}/rest/api/2/search?jql={}&fields={}&startAt={}&maxResults={}",
            self.base_url,
            urlencoding::encode(jql),
            urlencoding::encode(fields),
            start_at,
            self.page_size
        );
        let body = self.get_with_retry(url).await?;
        let response: SearchResponse = serde_json::from_slice(&body)?;
        Ok(Page {
            total: response.total,
            items: response.issues,
        })
    }

    async fn search_all(
        &self,
        jql: &str,
        fields: &str,
    ) -> std::result::Result<Vec<WireIssue>, TrackerError> {
        let client = self;
        collect_pages(move |start_at| client.search_page(jql, fields, start_at)).await
    }

    /// Fetches version metadata by name
    ///
    /// # Errors
    /// Returns `TrackerError::VersionNotFound` if the project has no such version
    pub async fn version(&self, name: &str) -> std::result::Result<VersionInfo, TrackerError> {
        let url = format!(
            "{}/rest/api/2/project/{}/versions",
            self.base_url,
            urlencoding::encode(&self.project)
        );
        let body = self.get_with_retry(url).await?;
        let versions: Vec<WireVersion> = serde_json::from_slice(&body)?;

        versions
            .into_iter()
            .find(|v| v.name == name)
            .map(VersionInfo::from)
            .ok_or_else(|| TrackerError::VersionNotFound {
                name: name.to_string(),
                project: self.project.clone(),
            })
    }
}

/// Converts a release-tracking ticket into a discovered release
///
/// Returns `None` when the summary has no version or the version cannot be
/// mapped to an application.
fn active_release_from(issue: WireIssue) -> Option<ActiveRelease> {
    let Some(parsed) = VersionParser::parse_summary(&issue.fields.summary) else {
        tracing::debug!(
            target: TRACING_TARGET,
            key = %issue.key,
            summary = %issue.fields.summary,
            "no version in release ticket summary"
        );
        return None;
    };
    let fix_version = parsed.fix_version();
    let s3_application = VersionParser::application_for(&fix_version)?;

    Some(ActiveRelease {
        due_date: parse_date(issue.fields.duedate.as_deref()),
        assignee: issue
            .fields
            .assignee
            .map(|a| a.display_name)
            .unwrap_or_default(),
        ticket_key: issue.key,
        fix_version,
        s3_application,
    })
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn discover_active_releases(&self) -> Result<Vec<ActiveRelease>> {
        let issues = self
            .search_all(&self.discovery_jql(), DISCOVERY_FIELDS)
            .await
            .context("Failed to discover active releases")?;

        let tickets = issues.len();
        let releases: Vec<ActiveRelease> =
            issues.into_iter().filter_map(active_release_from).collect();

        tracing::debug!(
            target: TRACING_TARGET,
            tickets,
            releases = releases.len(),
            "release discovery finished"
        );
        Ok(releases)
    }

    async fn search_issues(&self, fix_version: &str) -> Result<Vec<TrackerIssue>> {
        let issues = self
            .search_all(&self.search_jql(fix_version), SEARCH_FIELDS)
            .await
            .with_context(|| format!("Failed to search issues for {}", fix_version))?;

        Ok(issues.into_iter().map(TrackerIssue::from).collect())
    }

    async fn get_version(&self, name: &str) -> Result<Option<VersionInfo>> {
        match self.version(name).await {
            Ok(info) => Ok(Some(info)),
            Err(TrackerError::VersionNotFound { .. }) => Ok(None),
            Err(e) => {
                Err(anyhow::Error::new(e).context(format!("Failed to look up version {}", name)))
            }
        }
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}
