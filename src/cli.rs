use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use release_readiness::application::dto::OutputFormat;
use std::path::PathBuf;

use crate::config::Overrides;

/// Synchronise Konflux snapshots and JIRA release issues into release readiness signals
#[derive(Parser, Debug)]
#[command(name = "release-readiness")]
#[command(version)]
#[command(about = "Synchronise Konflux snapshots and JIRA release issues into release readiness signals", long_about = None)]
pub struct Args {
    /// Path to a config file (defaults to ./release-readiness.config.yml if present)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON state file for the store (memory-only when omitted)
    #[arg(long, global = true, env = "STORE_PATH", value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub jira: JiraArgs,

    #[command(flatten)]
    pub s3: S3Args,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ClapArgs, Debug, Default)]
pub struct JiraArgs {
    /// JIRA base URL
    #[arg(long = "jira-url", global = true, env = "JIRA_URL")]
    pub url: Option<String>,

    /// JIRA personal access token; enables the issue syncer
    #[arg(long = "jira-token", global = true, env = "JIRA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// JIRA project key
    #[arg(long = "jira-project", global = true, env = "JIRA_PROJECT")]
    pub project: Option<String>,

    /// Custom field holding the target version
    #[arg(long = "jira-target-version-field", global = true, env = "JIRA_TARGET_VERSION_FIELD")]
    pub target_version_field: Option<String>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct S3Args {
    /// Custom S3 endpoint (GarageFS, MinIO)
    #[arg(long = "s3-endpoint", global = true, env = "S3_ENDPOINT")]
    pub endpoint: Option<String>,

    #[arg(long = "s3-region", global = true, env = "S3_REGION")]
    pub region: Option<String>,

    /// Bucket holding snapshot manifests; enables the snapshot syncer
    #[arg(long = "s3-bucket", global = true, env = "S3_BUCKET")]
    pub bucket: Option<String>,

    #[arg(long = "s3-access-key", global = true, env = "S3_ACCESS_KEY", hide_env_values = true)]
    pub access_key: Option<String>,

    #[arg(long = "s3-secret-key", global = true, env = "S3_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run both sync loops until interrupted
    Serve,

    /// Run one sync pass and print the report
    Sync {
        /// Restrict the pass to one syncer
        #[arg(long, value_enum)]
        only: Option<SyncTarget>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the readiness signal of stored releases
    Readiness {
        /// Evaluate a single release (fix version name)
        #[arg(short, long)]
        release: Option<String>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTarget {
    Snapshots,
    Issues,
}

impl SyncTarget {
    pub fn includes(only: Option<SyncTarget>, target: SyncTarget) -> bool {
        only.map_or(true, |only| only == target)
    }
}

impl Args {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            store_path: self.store.clone(),
            jira_url: self.jira.url.clone(),
            jira_token: self.jira.token.clone(),
            jira_project: self.jira.project.clone(),
            jira_target_version_field: self.jira.target_version_field.clone(),
            s3_endpoint: self.s3.endpoint.clone(),
            s3_region: self.s3.region.clone(),
            s3_bucket: self.s3.bucket.clone(),
            s3_access_key: self.s3.access_key.clone(),
            s3_secret_key: self.s3.secret_key.clone(),
        }
    }
}
