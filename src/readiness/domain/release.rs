use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A tracked release train, keyed by its fix-version name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseVersion {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub release_date: Option<NaiveDate>,
    #[serde(default)]
    pub released: bool,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub release_ticket_key: String,
    #[serde(default)]
    pub release_ticket_assignee: String,
    /// Artifact-store application producing this release's snapshots
    #[serde(default)]
    pub s3_application: String,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl ReleaseVersion {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Neither released nor archived
    pub fn is_active(&self) -> bool {
        !self.released && !self.archived
    }

    /// Overlays tracker version metadata onto this record.
    ///
    /// A missing release date in the metadata leaves the stored one untouched.
    pub fn apply_version_info(&mut self, info: &VersionInfo) {
        self.description = info.description.clone();
        self.released = info.released;
        self.archived = info.archived;
        if info.release_date.is_some() {
            self.release_date = info.release_date;
        }
    }
}

/// Version metadata as reported by the issue tracker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub name: String,
    pub description: String,
    pub release_date: Option<NaiveDate>,
    pub released: bool,
    pub archived: bool,
}

impl VersionInfo {
    pub fn is_closed(&self) -> bool {
        self.released || self.archived
    }
}

/// A release discovered from an open release-tracking ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveRelease {
    /// e.g. `quay-v3.16.2`
    pub fix_version: String,
    pub ticket_key: String,
    pub assignee: String,
    pub due_date: Option<NaiveDate>,
    /// e.g. `quay-v3-16`
    pub s3_application: String,
}

impl ActiveRelease {
    /// Creates the release record this discovery describes, without tracker
    /// version metadata.
    pub fn to_release_version(&self) -> ReleaseVersion {
        ReleaseVersion {
            name: self.fix_version.clone(),
            release_ticket_key: self.ticket_key.clone(),
            release_ticket_assignee: self.assignee.clone(),
            s3_application: self.s3_application.clone(),
            due_date: self.due_date,
            ..ReleaseVersion::default()
        }
    }
}
