//! Configuration file support for release-readiness.
//!
//! Provides YAML-based configuration through `release-readiness.config.yml`
//! files, and resolves it together with CLI/environment overrides into the
//! settings the process runs with.

use anyhow::Context;
use release_readiness::adapters::outbound::network::{JiraConfig, RetryPolicy, DEFAULT_PAGE_SIZE};
use release_readiness::adapters::outbound::object_store::ObjectStoreConfig;
use release_readiness::shared::error::ReadinessError;
use release_readiness::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "release-readiness.config.yml";

const DEFAULT_S3_POLL_SECS: u64 = 30;
const DEFAULT_JIRA_POLL_SECS: u64 = 300;
const DEFAULT_S3_REGION: &str = "us-east-1";
const DEFAULT_JIRA_URL: &str = "https://issues.redhat.com";
const DEFAULT_JIRA_PROJECT: &str = "PROJQUAY";
const DEFAULT_TARGET_VERSION_FIELD: &str = "customfield_12319940";
const DEFAULT_MIN_REQUEST_DELAY_MS: u64 = 1000;
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub s3: S3Section,
    #[serde(default)]
    pub jira: JiraSection,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct StoreSection {
    /// JSON state file; the store is memory-only when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
pub struct S3Section {
    pub endpoint: Option<String>,
    pub region: Option<String>,
    pub bucket: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub poll_interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
pub struct JiraSection {
    pub url: Option<String>,
    pub token: Option<String>,
    pub project: Option<String>,
    pub target_version_field: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub min_request_delay_ms: Option<u64>,
    pub max_retries: Option<u32>,
    pub page_size: Option<usize>,
}

/// Values given on the command line or through the environment.
///
/// Each one set here wins over the configuration file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub store_path: Option<PathBuf>,
    pub jira_url: Option<String>,
    pub jira_token: Option<String>,
    pub jira_project: Option<String>,
    pub jira_target_version_field: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_region: Option<String>,
    pub s3_bucket: Option<String>,
    pub s3_access_key: Option<String>,
    pub s3_secret_key: Option<String>,
}

/// Object-store syncer settings
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub store: ObjectStoreConfig,
    pub poll_interval: Duration,
}

/// Issue-tracker syncer settings
#[derive(Debug, Clone)]
pub struct JiraSettings {
    pub client: JiraConfig,
    pub poll_interval: Duration,
}

/// Fully resolved settings.
///
/// A syncer section is `None` when its upstream is not configured: S3 needs
/// a bucket, JIRA needs a token.
#[derive(Debug, Clone)]
pub struct Settings {
    pub store_path: Option<PathBuf>,
    pub s3: Option<S3Settings>,
    pub jira: Option<JiraSettings>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    warn_unknown_fields(&config);
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(field = %key, "Unknown config field will be ignored");
    }
}

/// Returns the first non-blank value
fn pick(over: Option<String>, file: Option<String>) -> Option<String> {
    over.into_iter()
        .chain(file)
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

fn positive(value: u64, field: &str) -> Result<u64> {
    if value == 0 {
        return Err(ReadinessError::InvalidConfig {
            message: format!("{} must be greater than zero", field),
            hint: format!("Remove '{}' to use the default, or set a positive value", field),
        }
        .into());
    }
    Ok(value)
}

impl Settings {
    /// Merges the file with overrides and applies defaults.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for zero poll intervals or page sizes
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let store_path = overrides.store_path.or(file.store.path);

        let s3 = match pick(overrides.s3_bucket, file.s3.bucket) {
            Some(bucket) => Some(S3Settings {
                store: ObjectStoreConfig {
                    endpoint: pick(overrides.s3_endpoint, file.s3.endpoint),
                    region: pick(overrides.s3_region, file.s3.region)
                        .unwrap_or_else(|| DEFAULT_S3_REGION.to_string()),
                    bucket,
                    access_key: pick(overrides.s3_access_key, file.s3.access_key),
                    secret_key: pick(overrides.s3_secret_key, file.s3.secret_key),
                },
                poll_interval: Duration::from_secs(positive(
                    file.s3.poll_interval_secs.unwrap_or(DEFAULT_S3_POLL_SECS),
                    "s3.poll_interval_secs",
                )?),
            }),
            None => None,
        };

        let mut section = file.jira;
        let jira = match pick(overrides.jira_token, section.token.take()) {
            Some(token) => {
                let mut client = JiraConfig::new(
                    pick(overrides.jira_url, section.url)
                        .unwrap_or_else(|| DEFAULT_JIRA_URL.to_string()),
                    token,
                    pick(overrides.jira_project, section.project)
                        .unwrap_or_else(|| DEFAULT_JIRA_PROJECT.to_string()),
                );
                client.target_version_field = Some(
                    pick(overrides.jira_target_version_field, section.target_version_field)
                        .unwrap_or_else(|| DEFAULT_TARGET_VERSION_FIELD.to_string()),
                );
                client.page_size = positive(
                    section.page_size.unwrap_or(DEFAULT_PAGE_SIZE) as u64,
                    "jira.page_size",
                )? as usize;
                client.retry = RetryPolicy {
                    min_delay: Duration::from_millis(
                        section
                            .min_request_delay_ms
                            .unwrap_or(DEFAULT_MIN_REQUEST_DELAY_MS),
                    ),
                    max_retries: section.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
                    ..RetryPolicy::default()
                };

                Some(JiraSettings {
                    client,
                    poll_interval: Duration::from_secs(positive(
                        section.poll_interval_secs.unwrap_or(DEFAULT_JIRA_POLL_SECS),
                        "jira.poll_interval_secs",
                    )?),
                })
            }
            None => None,
        };

        Ok(Self {
            store_path,
            s3,
            jira,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
store:
  path: /var/lib/release-readiness/state.json
s3:
  endpoint: http://garage:3900
  bucket: konflux-snapshots
  poll_interval_secs: 60
jira:
  token: secret
  project: PROJQUAY
  max_retries: 5
  page_size: 50
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(
            config.store.path.as_deref(),
            Some(Path::new("/var/lib/release-readiness/state.json"))
        );
        assert_eq!(config.s3.bucket.as_deref(), Some("konflux-snapshots"));
        assert_eq!(config.s3.poll_interval_secs, Some(60));
        assert_eq!(config.jira.max_retries, Some(5));
        assert_eq!(config.jira.page_size, Some(50));
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_captured() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "surprise: true\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert!(config.unknown_fields.contains_key("surprise"));
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "s3:\n  bucket: b\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.s3.bucket.as_deref(), Some("b"));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_resolve_defaults_disable_both_syncers() {
        let settings = Settings::resolve(ConfigFile::default(), Overrides::default()).unwrap();
        assert!(settings.s3.is_none());
        assert!(settings.jira.is_none());
        assert!(settings.store_path.is_none());
    }

    #[test]
    fn test_resolve_applies_defaults() {
        let overrides = Overrides {
            jira_token: Some("t".to_string()),
            s3_bucket: Some("b".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(ConfigFile::default(), overrides).unwrap();

        let s3 = settings.s3.unwrap();
        assert_eq!(s3.store.region, "us-east-1");
        assert_eq!(s3.poll_interval, Duration::from_secs(30));

        let jira = settings.jira.unwrap();
        assert_eq!(jira.client.base_url, "https://issues.redhat.com");
        assert_eq!(jira.client.project, "PROJQUAY");
        assert_eq!(
            jira.client.target_version_field.as_deref(),
            Some("customfield_12319940")
        );
        assert_eq!(jira.client.page_size, 100);
        assert_eq!(jira.client.retry.max_retries, 3);
        assert_eq!(jira.client.retry.min_delay, Duration::from_secs(1));
        assert_eq!(jira.poll_interval, Duration::from_secs(300));
    }

    #[test]
    fn test_overrides_win_over_file() {
        let mut file = ConfigFile::default();
        file.jira.token = Some("from-file".to_string());
        file.jira.project = Some("FILEPROJ".to_string());
        file.s3.bucket = Some("file-bucket".to_string());

        let overrides = Overrides {
            jira_project: Some("CLIPROJ".to_string()),
            s3_bucket: Some("  ".to_string()),
            ..Default::default()
        };
        let settings = Settings::resolve(file, overrides).unwrap();

        let jira = settings.jira.unwrap();
        assert_eq!(jira.client.token, "from-file");
        assert_eq!(jira.client.project, "CLIPROJ");
        assert_eq!(settings.s3.unwrap().store.bucket, "file-bucket");
    }

    #[test]
    fn test_resolve_reads_jira_section_from_file() {
        let mut file = ConfigFile::default();
        file.jira.token = Some("file-token".to_string());
        file.jira.url = Some("https://jira.example.com".to_string());
        file.jira.poll_interval_secs = Some(120);
        file.jira.min_request_delay_ms = Some(250);
        file.jira.max_retries = Some(5);
        file.jira.page_size = Some(25);

        let jira = Settings::resolve(file, Overrides::default())
            .unwrap()
            .jira
            .unwrap();

        assert_eq!(jira.client.token, "file-token");
        assert_eq!(jira.client.base_url, "https://jira.example.com");
        assert_eq!(jira.client.page_size, 25);
        assert_eq!(jira.client.retry.max_retries, 5);
        assert_eq!(jira.client.retry.min_delay, Duration::from_millis(250));
        assert_eq!(jira.poll_interval, Duration::from_secs(120));
    }

    #[test]
    fn test_zero_interval_is_rejected() {
        let mut file = ConfigFile::default();
        file.s3.bucket = Some("b".to_string());
        file.s3.poll_interval_secs = Some(0);

        let err = format!(
            "{}",
            Settings::resolve(file, Overrides::default()).unwrap_err()
        );
        assert!(err.contains("s3.poll_interval_secs"));
    }
}
