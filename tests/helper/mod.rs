//! Release source test utilities

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use release_check::{ReleaseRecord, ReleaseSource, ReleaseSourceError, Repository};

/// In-memory release source keyed by "owner/name"
#[derive(Default)]
pub struct StaticSource {
    releases: HashMap<String, Vec<ReleaseRecord>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_releases(mut self, repository: &str, releases: &[(&str, bool)]) -> Self {
        self.releases.insert(repository.to_string(), records(releases));
        self
    }
}

#[async_trait]
impl ReleaseSource for StaticSource {
    async fn fetch_releases(
        &self,
        repository: &Repository,
    ) -> Result<Vec<ReleaseRecord>, ReleaseSourceError> {
        self.releases
            .get(&repository.to_string())
            .cloned()
            .ok_or_else(|| ReleaseSourceError::NotFound(repository.to_string()))
    }
}

/// Release source that blocks each fetch until a permit is added to its gate
pub struct GatedSource {
    releases: Vec<ReleaseRecord>,
    gate: Arc<Semaphore>,
}

impl GatedSource {
    pub fn new(releases: &[(&str, bool)]) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let source = Self {
            releases: records(releases),
            gate: gate.clone(),
        };
        (source, gate)
    }
}

#[async_trait]
impl ReleaseSource for GatedSource {
    async fn fetch_releases(
        &self,
        _repository: &Repository,
    ) -> Result<Vec<ReleaseRecord>, ReleaseSourceError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| ReleaseSourceError::InvalidResponse(e.to_string()))?;
        permit.forget();
        Ok(self.releases.clone())
    }
}

pub fn records(releases: &[(&str, bool)]) -> Vec<ReleaseRecord> {
    releases
        .iter()
        .map(|(tag, prerelease)| ReleaseRecord::new(*tag, *prerelease))
        .collect()
}
