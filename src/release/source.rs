//! Release source trait for fetching a repository's releases

#[cfg(test)]
use mockall::automock;

use crate::release::error::ReleaseSourceError;
use crate::release::types::{ReleaseRecord, Repository};

/// Trait for fetching the published releases of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches every release of `repository`
    ///
    /// # Returns
    /// * `Ok(Vec<ReleaseRecord>)` - All releases, empty if the repository has none
    /// * `Err(ReleaseSourceError)` - If the fetch fails
    async fn fetch_releases(
        &self,
        repository: &Repository,
    ) -> Result<Vec<ReleaseRecord>, ReleaseSourceError>;
}
