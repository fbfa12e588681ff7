use crate::ports::outbound::{
    IssueRepository, ReleaseRepository, SnapshotRepository, StorageFlush,
};
use crate::readiness::domain::{
    ApplicationSummary, ComponentRecord, IssueFilter, IssueRecord, IssueSummary, NewSnapshot,
    ReleaseVersion, SnapshotRecord, TestResultRecord,
};
use crate::readiness::policies::IssueClassification;
use crate::shared::error::ReadinessError;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use tokio::sync::Mutex;

const TRACING_TARGET: &str = "release_readiness::store";

/// On-disk form of the whole store
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_snapshot_id: i64,
    snapshots: Vec<SnapshotRecord>,
    components: Vec<String>,
    releases: Vec<ReleaseVersion>,
    issues: Vec<IssueRecord>,
}

/// MemoryStore adapter holding all synced state in concurrent maps
///
/// Implements the snapshot, release and issue repository ports. Each map is
/// a `DashMap`, so both sync loops can use one shared handle without extra
/// locking. Snapshot-name uniqueness is enforced through the map entry API.
///
/// When opened with a path, mutations only mark the store dirty. `flush`
/// then rewrites a JSON state file atomically (temporary file in the same
/// directory, then rename). Writes that leave a record unchanged do not mark
/// the store dirty.
pub struct MemoryStore {
    snapshots: DashMap<i64, SnapshotRecord>,
    snapshot_ids: DashMap<String, i64>,
    next_snapshot_id: AtomicI64,
    components: DashSet<String>,
    releases: DashMap<String, ReleaseVersion>,
    /// Keyed by (fix version, issue key)
    issues: DashMap<(String, String), IssueRecord>,
    path: Option<PathBuf>,
    dirty: AtomicBool,
    file_writes: AtomicU64,
    write_lock: Mutex<()>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty, purely in-memory store
    pub fn new() -> Self {
        Self {
            snapshots: DashMap::new(),
            snapshot_ids: DashMap::new(),
            next_snapshot_id: AtomicI64::new(1),
            components: DashSet::new(),
            releases: DashMap::new(),
            issues: DashMap::new(),
            path: None,
            dirty: AtomicBool::new(false),
            file_writes: AtomicU64::new(0),
            write_lock: Mutex::new(()),
        }
    }

    /// Opens a file-backed store, loading existing state if the file exists
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or decoded, or
    /// if the path is a symbolic link
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self::new();

        if let Ok(metadata) = fs::symlink_metadata(&path) {
            if metadata.is_symlink() {
                return Err(store_io(&path, "Store path is a symbolic link").into());
            }
            let data = fs::read(&path).map_err(|e| store_io(&path, e))?;
            let file: StoreFile = serde_json::from_slice(&data)
                .map_err(|e| store_io(&path, format!("Invalid store file: {}", e)))?;
            store.load(file);
        }

        tracing::info!(
            target: TRACING_TARGET,
            path = %path.display(),
            snapshots = store.snapshots.len(),
            releases = store.releases.len(),
            issues = store.issues.len(),
            "Store opened"
        );

        store.path = Some(path);
        Ok(store)
    }

    fn load(&mut self, file: StoreFile) {
        let mut max_id = 0;
        for snapshot in file.snapshots {
            max_id = max_id.max(snapshot.id);
            self.snapshot_ids.insert(snapshot.name.clone(), snapshot.id);
            self.snapshots.insert(snapshot.id, snapshot);
        }
        self.next_snapshot_id
            .store(file.next_snapshot_id.max(max_id + 1), Ordering::SeqCst);
        for component in file.components {
            self.components.insert(component);
        }
        for release in file.releases {
            self.releases.insert(release.name.clone(), release);
        }
        for issue in file.issues {
            self.issues
                .insert((issue.fix_version.clone(), issue.key.clone()), issue);
        }
    }

    fn to_file(&self) -> StoreFile {
        let mut snapshots: Vec<SnapshotRecord> =
            self.snapshots.iter().map(|e| e.value().clone()).collect();
        snapshots.sort_by_key(|s| s.id);
        let mut components: Vec<String> = self.components.iter().map(|c| c.clone()).collect();
        components.sort();
        let mut releases: Vec<ReleaseVersion> =
            self.releases.iter().map(|e| e.value().clone()).collect();
        releases.sort_by(|a, b| a.name.cmp(&b.name));
        let mut issues: Vec<IssueRecord> = self.issues.iter().map(|e| e.value().clone()).collect();
        issues.sort_by(|a, b| (&a.fix_version, &a.key).cmp(&(&b.fix_version, &b.key)));

        StoreFile {
            next_snapshot_id: self.next_snapshot_id.load(Ordering::SeqCst),
            snapshots,
            components,
            releases,
            issues,
        }
    }

    /// Number of times the state file has been rewritten since opening
    pub fn file_writes(&self) -> u64 {
        self.file_writes.load(Ordering::SeqCst)
    }

    fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Writes the current state to the backing file if anything changed
    async fn persist(&self) -> Result<()> {
        let Some(path) = self.path.clone() else {
            self.dirty.store(false, Ordering::SeqCst);
            return Ok(());
        };

        let _guard = self.write_lock.lock().await;
        if !self.dirty.swap(false, Ordering::SeqCst) {
            return Ok(());
        }

        let data = match serde_json::to_vec_pretty(&self.to_file()) {
            Ok(data) => data,
            Err(e) => {
                self.mark_dirty();
                return Err(e.into());
            }
        };
        let written = tokio::task::spawn_blocking(move || write_atomically(&path, &data)).await;
        match written {
            Ok(Ok(())) => {
                let writes = self.file_writes.fetch_add(1, Ordering::SeqCst) + 1;
                tracing::debug!(target: TRACING_TARGET, writes, "Store flushed");
                Ok(())
            }
            Ok(Err(e)) => {
                self.mark_dirty();
                Err(e)
            }
            Err(e) => {
                self.mark_dirty();
                Err(e.into())
            }
        }
    }

    fn snapshot_headers(&self, application: Option<&str>) -> Vec<SnapshotRecord> {
        let mut headers: Vec<SnapshotRecord> = self
            .snapshots
            .iter()
            .filter(|e| application.map_or(true, |app| e.value().application == app))
            .map(|e| e.value().header())
            .collect();
        sort_newest_first(&mut headers);
        headers
    }

    fn issues_of(&self, fix_version: &str) -> Vec<IssueRecord> {
        self.issues
            .iter()
            .filter(|e| e.key().0 == fix_version)
            .map(|e| e.value().clone())
            .collect()
    }

    fn attach<F>(&self, snapshot_id: i64, attach: F) -> Result<()>
    where
        F: FnOnce(&mut SnapshotRecord),
    {
        match self.snapshots.get_mut(&snapshot_id) {
            Some(mut snapshot) => {
                attach(snapshot.value_mut());
                Ok(())
            }
            None => Err(ReadinessError::UnknownSnapshotId { id: snapshot_id }.into()),
        }
    }
}

fn store_io(path: &Path, details: impl ToString) -> ReadinessError {
    ReadinessError::StoreIo {
        path: path.to_path_buf(),
        details: details.to_string(),
    }
}

fn write_atomically(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| store_io(path, e))?;
    file.write_all(data).map_err(|e| store_io(path, e))?;
    file.as_file().sync_all().map_err(|e| store_io(path, e))?;
    file.persist(path).map_err(|e| store_io(path, e.error))?;
    Ok(())
}

/// Newest first by creation time, then by id
fn sort_newest_first(snapshots: &mut [SnapshotRecord]) {
    snapshots.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
}

#[async_trait]
impl StorageFlush for MemoryStore {
    async fn flush(&self) -> Result<()> {
        self.persist().await
    }
}

#[async_trait]
impl SnapshotRepository for MemoryStore {
    async fn snapshot_exists_by_name(&self, name: &str) -> Result<bool> {
        Ok(self.snapshot_ids.contains_key(name))
    }

    async fn create_snapshot(&self, snapshot: NewSnapshot) -> Result<SnapshotRecord> {
        let record = match self.snapshot_ids.entry(snapshot.name.clone()) {
            Entry::Occupied(_) => {
                return Err(ReadinessError::DuplicateSnapshot {
                    name: snapshot.name,
                }
                .into())
            }
            Entry::Vacant(vacant) => {
                let id = self.next_snapshot_id.fetch_add(1, Ordering::SeqCst);
                let record = SnapshotRecord::from_new(id, snapshot);
                self.snapshots.insert(id, record.clone());
                vacant.insert(id);
                record
            }
        };

        self.mark_dirty();
        Ok(record)
    }

    async fn ensure_component(&self, name: &str) -> Result<()> {
        if self.components.insert(name.to_string()) {
            self.mark_dirty();
        }
        Ok(())
    }

    async fn create_snapshot_component(&self, component: ComponentRecord) -> Result<()> {
        self.attach(component.snapshot_id, |snapshot| {
            snapshot.components.push(component)
        })?;
        self.mark_dirty();
        Ok(())
    }

    async fn create_snapshot_test_result(&self, result: TestResultRecord) -> Result<()> {
        self.attach(result.snapshot_id, |snapshot| {
            snapshot.test_results.push(result)
        })?;
        self.mark_dirty();
        Ok(())
    }

    async fn list_components(&self) -> Result<Vec<String>> {
        let mut components: Vec<String> = self.components.iter().map(|c| c.clone()).collect();
        components.sort();
        Ok(components)
    }

    async fn get_snapshot_by_name(&self, name: &str) -> Result<Option<SnapshotRecord>> {
        let Some(id) = self.snapshot_ids.get(name).map(|id| *id) else {
            return Ok(None);
        };
        Ok(self.snapshots.get(&id).map(|s| s.value().clone()))
    }

    async fn list_snapshots(
        &self,
        application: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SnapshotRecord>> {
        Ok(self
            .snapshot_headers(application)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    async fn latest_snapshot_for_application(
        &self,
        application: &str,
    ) -> Result<Option<SnapshotRecord>> {
        Ok(self.snapshot_headers(Some(application)).into_iter().next())
    }

    async fn latest_snapshot_per_application(&self) -> Result<Vec<ApplicationSummary>> {
        let mut grouped: BTreeMap<String, Vec<SnapshotRecord>> = BTreeMap::new();
        for header in self.snapshot_headers(None) {
            grouped
                .entry(header.application.clone())
                .or_default()
                .push(header);
        }

        Ok(grouped
            .into_iter()
            .filter_map(|(application, snapshots)| {
                let snapshot_count = snapshots.len();
                snapshots
                    .into_iter()
                    .next()
                    .map(|latest_snapshot| ApplicationSummary {
                        application,
                        latest_snapshot,
                        snapshot_count,
                    })
            })
            .collect())
    }
}

#[async_trait]
impl ReleaseRepository for MemoryStore {
    async fn upsert_release_version(&self, release: ReleaseVersion) -> Result<()> {
        let previous = self.releases.insert(release.name.clone(), release.clone());
        if previous.as_ref() != Some(&release) {
            self.mark_dirty();
        }
        Ok(())
    }

    async fn get_release_version(&self, name: &str) -> Result<Option<ReleaseVersion>> {
        Ok(self.releases.get(name).map(|r| r.value().clone()))
    }

    async fn list_active_release_versions(&self) -> Result<Vec<ReleaseVersion>> {
        let mut releases: Vec<ReleaseVersion> = self
            .releases
            .iter()
            .filter(|e| e.value().is_active())
            .map(|e| e.value().clone())
            .collect();
        releases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(releases)
    }

    async fn list_all_release_versions(&self) -> Result<Vec<ReleaseVersion>> {
        let mut releases: Vec<ReleaseVersion> =
            self.releases.iter().map(|e| e.value().clone()).collect();
        releases.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(releases)
    }
}

#[async_trait]
impl IssueRepository for MemoryStore {
    async fn upsert_issue(&self, issue: IssueRecord) -> Result<()> {
        let key = (issue.fix_version.clone(), issue.key.clone());
        let previous = self.issues.insert(key, issue.clone());
        if previous.as_ref() != Some(&issue) {
            self.mark_dirty();
        }
        Ok(())
    }

    async fn delete_issues_not_in(&self, fix_version: &str, keys: &[String]) -> Result<usize> {
        let mut deleted = 0;
        self.issues.retain(|(version, key), _| {
            let keep = version != fix_version || keys.contains(key);
            if !keep {
                deleted += 1;
            }
            keep
        });

        if deleted > 0 {
            tracing::debug!(
                target: TRACING_TARGET,
                version = %fix_version,
                deleted,
                "Removed stale issues"
            );
            self.mark_dirty();
        }
        Ok(deleted)
    }

    async fn list_issues(
        &self,
        fix_version: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<IssueRecord>> {
        let mut issues: Vec<IssueRecord> = self
            .issues_of(fix_version)
            .into_iter()
            .filter(|issue| filter.matches(issue))
            .collect();
        issues.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(issues)
    }

    async fn get_issue_summary(&self, fix_version: &str) -> Result<IssueSummary> {
        Ok(IssueClassification::summarize(&self.issues_of(fix_version)))
    }

    async fn get_issue_summaries_batch(
        &self,
        fix_versions: &[String],
    ) -> Result<HashMap<String, IssueSummary>> {
        let mut summaries = HashMap::new();
        for version in fix_versions {
            let issues = self.issues_of(version);
            if !issues.is_empty() {
                summaries.insert(version.clone(), IssueClassification::summarize(&issues));
            }
        }
        Ok(summaries)
    }
}
