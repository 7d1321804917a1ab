//! Release records, their sources, and latest-release selection
//!
//! - [`types`]: `ReleaseRecord`, `Repository`, `Channel`, `TagFilter`
//! - [`select`]: picks the latest release per channel
//! - [`source`]: `ReleaseSource` trait for fetching releases
//! - [`github`]: GitHub Releases API implementation
//! - [`error`]: error types for sources and repository identity

pub mod error;
pub mod github;
pub mod select;
pub mod source;
pub mod types;

pub use error::{InvalidRepository, ReleaseSourceError};
pub use github::GitHubReleaseSource;
pub use source::ReleaseSource;
pub use types::{Channel, ReleaseRecord, Repository, TagFilter};
