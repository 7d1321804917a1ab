//! Release discovery and update availability for GitHub-hosted projects
//!
//! Given the version that is currently running and a repository that
//! publishes tagged releases, [`UpdateChecker`] answers whether a newer
//! stable release or a newer prerelease exists.
//!
//! ```no_run
//! use std::sync::Arc;
//! use release_check::{GitHubReleaseSource, UpdateChecker};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let source = Arc::new(GitHubReleaseSource::github()?);
//! let checker = UpdateChecker::new("1.0.0".parse()?, "owner", "app", source)?;
//!
//! checker.fetch_releases().await?;
//! if checker.update_available() {
//!     println!("{:?}", checker.latest_release());
//! }
//! # Ok(())
//! # }
//! ```

pub mod checker;
pub mod config;
pub mod logging;
pub mod release;
pub mod version;

pub use checker::{ReleaseSummary, UpdateChecker, UpdateStatus};
pub use release::{
    Channel, GitHubReleaseSource, InvalidRepository, ReleaseRecord, ReleaseSource,
    ReleaseSourceError, Repository, TagFilter,
};
pub use version::{ParseVersionError, SemanticVersion};
