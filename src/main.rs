mod cli;
mod config;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use cli::{Args, Command, SyncTarget};
use config::Settings;
use release_readiness::adapters::outbound::console::{ReadinessPrinter, SyncSummary};
use release_readiness::adapters::outbound::network::JiraClient;
use release_readiness::adapters::outbound::object_store::S3ArtifactStore;
use release_readiness::adapters::outbound::persistence::MemoryStore;
use release_readiness::application::dto::OutputFormat;
use release_readiness::application::scheduler::run_periodic;
use release_readiness::application::use_cases::{IssueSyncer, ReadinessQuery, SnapshotSyncer};
use release_readiness::ports::inbound::ReadinessQueryPort;
use release_readiness::ports::outbound::StorageFlush;
use release_readiness::shared::error::ExitCode;
use release_readiness::shared::Result;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const TRACING_TARGET: &str = "release_readiness::main";

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    let colored = !args.no_color && std::io::stdout().is_terminal();
    if let Err(e) = telemetry::init_tracing(!args.no_color && std::io::stderr().is_terminal()) {
        eprintln!("{}", e);
    }

    if let Err(e) = run(args, colored).await {
        eprintln!("\n❌ An error occurred:\n");
        eprintln!("{}", e);

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("\nCaused by: {}", err);
            source = err.source();
        }

        eprintln!();
        process::exit(ExitCode::ApplicationError.as_i32());
    }
}

async fn run(args: Args, colored: bool) -> Result<()> {
    let file = match &args.config {
        Some(path) => config::load_config_from_path(path)?,
        None => config::discover_config(Path::new("."))?.unwrap_or_default(),
    };
    let settings = Settings::resolve(file, args.overrides())?;

    let store = Arc::new(match &settings.store_path {
        Some(path) => MemoryStore::open(path)?,
        None => MemoryStore::new(),
    });

    match args.command {
        Command::Serve => serve(&settings, store).await,
        Command::Sync { only, format } => sync(&settings, store, only, format, colored).await,
        Command::Readiness { release, format } => {
            readiness(store, release.as_deref(), format, colored).await
        }
    }
}

fn snapshot_syncer(
    settings: &Settings,
    store: &Arc<MemoryStore>,
) -> Result<Option<SnapshotSyncer<S3ArtifactStore, MemoryStore>>> {
    let Some(s3) = &settings.s3 else {
        return Ok(None);
    };
    let artifacts = Arc::new(S3ArtifactStore::new(&s3.store)?);
    Ok(Some(SnapshotSyncer::new(artifacts, Arc::clone(store))))
}

fn issue_syncer(
    settings: &Settings,
    store: &Arc<MemoryStore>,
    cancel: &CancellationToken,
) -> Result<Option<IssueSyncer<JiraClient, MemoryStore>>> {
    let Some(jira) = &settings.jira else {
        return Ok(None);
    };
    let client = JiraClient::new(jira.client.clone())?.with_cancellation(cancel.clone());
    let tracker = Arc::new(client);
    Ok(Some(IssueSyncer::new(tracker, Arc::clone(store))))
}

/// Cancels `cancel` on Ctrl-C
fn cancel_on_ctrl_c(cancel: &CancellationToken) {
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!(target: TRACING_TARGET, "Shutdown requested");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!(
                target: TRACING_TARGET,
                error = %e,
                "Failed to listen for Ctrl-C"
            ),
        }
    });
}

async fn serve(settings: &Settings, store: Arc<MemoryStore>) -> Result<()> {
    let cancel = CancellationToken::new();
    let snapshots = snapshot_syncer(settings, &store)?;
    let issues = issue_syncer(settings, &store, &cancel)?;

    if snapshots.is_none() && issues.is_none() {
        tracing::warn!(
            target: TRACING_TARGET,
            "Neither S3 nor JIRA is configured; nothing to sync"
        );
    }

    cancel_on_ctrl_c(&cancel);

    let snapshot_loop = async {
        if let (Some(syncer), Some(s3)) = (&snapshots, &settings.s3) {
            run_periodic(syncer, s3.poll_interval, cancel.clone()).await;
        }
    };
    let issue_loop = async {
        if let (Some(syncer), Some(jira)) = (&issues, &settings.jira) {
            run_periodic(syncer, jira.poll_interval, cancel.clone()).await;
        }
    };
    tokio::join!(snapshot_loop, issue_loop);

    if snapshots.is_none() && issues.is_none() {
        cancel.cancelled().await;
    }
    store.flush().await
}

async fn sync(
    settings: &Settings,
    store: Arc<MemoryStore>,
    only: Option<SyncTarget>,
    format: OutputFormat,
    colored: bool,
) -> Result<()> {
    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(&cancel);

    let snapshot_report = match snapshot_syncer(settings, &store)? {
        Some(syncer) if SyncTarget::includes(only, SyncTarget::Snapshots) => {
            Some(syncer.sync_once(&cancel).await)
        }
        _ => None,
    };
    let issue_report = match issue_syncer(settings, &store, &cancel)? {
        Some(syncer) if SyncTarget::includes(only, SyncTarget::Issues) => {
            Some(syncer.sync_once(&cancel).await)
        }
        _ => None,
    };

    store.flush().await?;

    if snapshot_report.is_none() && issue_report.is_none() {
        tracing::warn!(
            target: TRACING_TARGET,
            "No syncer selected or configured; set S3_BUCKET and/or JIRA_TOKEN"
        );
    }

    let printer = ReadinessPrinter::new(format, colored);
    print!(
        "{}",
        printer.render_sync(&SyncSummary {
            snapshots: snapshot_report.as_ref(),
            issues: issue_report.as_ref(),
        })?
    );
    Ok(())
}

async fn readiness(
    store: Arc<MemoryStore>,
    release: Option<&str>,
    format: OutputFormat,
    colored: bool,
) -> Result<()> {
    let query = ReadinessQuery::new(store);

    let releases = match release {
        Some(name) => {
            let found = query.release_readiness(name).await?.with_context(|| {
                format!(
                    "Release not found: {}\n\n💡 Hint: Run `release-readiness sync --only issues` to discover releases",
                    name
                )
            })?;
            vec![found]
        }
        None => query.all_release_readiness().await?,
    };

    let printer = ReadinessPrinter::new(format, colored);
    print!("{}", printer.render_readiness(&releases)?);
    Ok(())
}
