use crate::application::dto::{IssueSyncReport, OutputFormat, SnapshotSyncReport};
use crate::ports::inbound::ReleaseReadiness;
use crate::readiness::domain::Signal;
use crate::shared::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::fmt::Write;

/// Combined result of a one-shot `sync` run
#[derive(Debug, Default, Serialize)]
pub struct SyncSummary<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshots: Option<&'a SnapshotSyncReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<&'a IssueSyncReport>,
}

/// ReadinessPrinter renders readiness verdicts and sync reports for stdout
pub struct ReadinessPrinter {
    format: OutputFormat,
    colored: bool,
}

impl ReadinessPrinter {
    pub fn new(format: OutputFormat, colored: bool) -> Self {
        Self { format, colored }
    }

    /// Renders one line (or JSON object) per release
    pub fn render_readiness(&self, releases: &[ReleaseReadiness]) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(releases)?);
        }

        if releases.is_empty() {
            return Ok("No releases found.\n".to_string());
        }

        let name_width = releases
            .iter()
            .map(|r| r.release.name.len())
            .max()
            .unwrap_or(0)
            .max("RELEASE".len());

        let mut out = String::new();
        writeln!(
            out,
            "{:<name_width$}  {:<6}  {:>6}  {:>4}  {:>4}  {:<10}  {:<5}  MESSAGE",
            "RELEASE", "SIGNAL", "ISSUES", "OPEN", "CVES", "DUE", "TESTS",
        )?;
        for entry in releases {
            let due = entry
                .release
                .due_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            let tests = match &entry.latest_snapshot {
                Some(snapshot) if snapshot.tests_passed => "pass",
                Some(_) => "fail",
                None => "-",
            };
            writeln!(
                out,
                "{:<name_width$}  {}  {:>6}  {:>4}  {:>4}  {:<10}  {:<5}  {}",
                entry.release.name,
                self.signal(entry.readiness.signal),
                entry.issues.total,
                entry.issues.open,
                entry.issues.cves,
                due,
                tests,
                entry.readiness.message,
            )?;
        }
        Ok(out)
    }

    /// Renders the reports of a one-shot sync run
    pub fn render_sync(&self, summary: &SyncSummary<'_>) -> Result<String> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(summary)?);
        }

        let mut out = String::new();
        if let Some(report) = summary.snapshots {
            writeln!(
                out,
                "Snapshots: {} applications, {} seen, {} ingested, {} already stored, {} failed",
                report.applications,
                report.snapshots_seen,
                report.ingested,
                report.skipped_existing,
                report.failed,
            )?;
        }
        if let Some(report) = summary.issues {
            if report.aborted {
                writeln!(out, "Issues: pass aborted (release discovery failed)")?;
            }
            writeln!(
                out,
                "Issues: {} releases discovered, {} reconciled, {} synced, {} issues",
                report.discovered, report.reconciled, report.releases_synced, report.issues_synced,
            )?;
            if !report.failed_releases.is_empty() {
                writeln!(out, "  Failed: {}", report.failed_releases.join(", "))?;
            }
        }
        Ok(out)
    }

    fn signal(&self, signal: Signal) -> String {
        let label = format!("{:<6}", signal.as_str());
        if !self.colored {
            return label;
        }
        match signal {
            Signal::Green => label.green().bold().to_string(),
            Signal::Yellow => label.yellow().bold().to_string(),
            Signal::Red => label.red().bold().to_string(),
        }
    }
}
