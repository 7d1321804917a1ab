//! Update availability for a running version against a repository's releases
//!
//! `UpdateChecker` holds the last fetched release list as an immutable
//! snapshot. A fetch replaces the snapshot in one assignment after the
//! source call completes, so queries made while a fetch is in flight see
//! the previous list. Every query is derived from the snapshot on demand.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::release::select::{latest_prerelease, latest_release, version_or_zero};
use crate::release::{
    InvalidRepository, ReleaseRecord, ReleaseSource, ReleaseSourceError, Repository, TagFilter,
};
use crate::version::SemanticVersion;

type Snapshot = Arc<Vec<ReleaseRecord>>;

pub struct UpdateChecker<S: ReleaseSource> {
    current_version: SemanticVersion,
    repository: Repository,
    source: Arc<S>,
    releases: RwLock<Option<Snapshot>>,
}

impl<S: ReleaseSource> UpdateChecker<S> {
    /// Creates a checker for `owner/name`; fails if either is empty
    pub fn new(
        current_version: SemanticVersion,
        owner: &str,
        name: &str,
        source: Arc<S>,
    ) -> Result<Self, InvalidRepository> {
        let repository = Repository::new(owner, name)?;
        Ok(Self::for_repository(current_version, repository, source))
    }

    pub fn for_repository(
        current_version: SemanticVersion,
        repository: Repository,
        source: Arc<S>,
    ) -> Self {
        Self {
            current_version,
            repository,
            source,
            releases: RwLock::new(None),
        }
    }

    pub fn current_version(&self) -> &SemanticVersion {
        &self.current_version
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Last fetched release list, None until a fetch has succeeded
    pub fn releases(&self) -> Option<Snapshot> {
        self.releases
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Fetch the release list and replace the held snapshot
    ///
    /// Source errors are returned unchanged and leave the previous snapshot
    /// in place. Returns the number of releases now held.
    pub async fn fetch_releases(&self) -> Result<usize, ReleaseSourceError> {
        debug!("Fetching releases for {}", self.repository);

        let releases = self
            .source
            .fetch_releases(&self.repository)
            .await
            .inspect_err(|e| warn!("Failed to fetch releases for {}: {}", self.repository, e))?;

        let count = releases.len();
        *self
            .releases
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(releases));

        info!("Fetched {} releases for {}", count, self.repository);
        Ok(count)
    }

    pub fn latest_release(&self) -> Option<ReleaseRecord> {
        self.latest_release_with(TagFilter::default())
    }

    pub fn latest_release_with(&self, filter: TagFilter) -> Option<ReleaseRecord> {
        let releases = self.releases()?;
        latest_release(&releases, filter).cloned()
    }

    pub fn latest_prerelease(&self) -> Option<ReleaseRecord> {
        self.latest_prerelease_with(TagFilter::default())
    }

    pub fn latest_prerelease_with(&self, filter: TagFilter) -> Option<ReleaseRecord> {
        let releases = self.releases()?;
        latest_prerelease(&releases, filter).cloned()
    }

    /// Latest stable release is newer than the current version
    pub fn has_newer_release(&self) -> bool {
        self.evaluate(TagFilter::default()).has_newer_release
    }

    /// Latest prerelease is newer than both the latest stable release and
    /// the current version
    pub fn has_newer_prerelease(&self) -> bool {
        self.evaluate(TagFilter::default()).has_newer_prerelease
    }

    pub fn update_available(&self) -> bool {
        self.evaluate(TagFilter::default()).update_available()
    }

    pub fn status(&self) -> UpdateStatus {
        self.status_with(TagFilter::default())
    }

    /// Summary of one snapshot; both channels use the same `filter`
    pub fn status_with(&self, filter: TagFilter) -> UpdateStatus {
        let evaluation = self.evaluate(filter);

        UpdateStatus {
            repository: self.repository.to_string(),
            current_version: self.current_version.clone(),
            fetched: evaluation.release_count.is_some(),
            release_count: evaluation.release_count.unwrap_or(0),
            has_newer_release: evaluation.has_newer_release,
            has_newer_prerelease: evaluation.has_newer_prerelease,
            update_available: evaluation.update_available(),
            latest_release: evaluation.latest_release.as_ref().map(ReleaseSummary::from),
            latest_prerelease: evaluation
                .latest_prerelease
                .as_ref()
                .map(ReleaseSummary::from),
        }
    }

    fn evaluate(&self, filter: TagFilter) -> Evaluation {
        let Some(releases) = self.releases() else {
            return Evaluation::default();
        };

        let release = latest_release(&releases, filter);
        let prerelease = latest_prerelease(&releases, filter);

        let release_version = version_or_zero(release);
        let prerelease_version = version_or_zero(prerelease);

        let has_newer_release = release_version > self.current_version;
        let has_newer_prerelease =
            prerelease_version > release_version && prerelease_version > self.current_version;

        Evaluation {
            release_count: Some(releases.len()),
            latest_release: release.cloned(),
            latest_prerelease: prerelease.cloned(),
            has_newer_release,
            has_newer_prerelease,
        }
    }
}

#[derive(Debug, Default)]
struct Evaluation {
    /// None when nothing has been fetched yet
    release_count: Option<usize>,
    latest_release: Option<ReleaseRecord>,
    latest_prerelease: Option<ReleaseRecord>,
    has_newer_release: bool,
    has_newer_prerelease: bool,
}

impl Evaluation {
    fn update_available(&self) -> bool {
        self.has_newer_release || self.has_newer_prerelease
    }
}

/// Result of an update check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatus {
    pub repository: String,
    pub current_version: SemanticVersion,
    /// Whether a release list has been fetched at all
    pub fetched: bool,
    pub release_count: usize,
    pub latest_release: Option<ReleaseSummary>,
    pub latest_prerelease: Option<ReleaseSummary>,
    pub has_newer_release: bool,
    pub has_newer_prerelease: bool,
    pub update_available: bool,
}

/// Selected release with its derived version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseSummary {
    pub tag: Option<String>,
    pub version: SemanticVersion,
    pub name: Option<String>,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl From<&ReleaseRecord> for ReleaseSummary {
    fn from(release: &ReleaseRecord) -> Self {
        Self {
            tag: release.tag().map(str::to_string),
            version: release.version(),
            name: release.name.clone(),
            url: release.html_url.clone(),
            published_at: release.published_at,
        }
    }
}
