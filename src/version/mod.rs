//! Version model for release tags
//!
//! - [`semver`]: `SemanticVersion`, strict tag parsing with a sentinel fallback,
//!   and semver precedence ordering

pub mod semver;

pub use semver::{NO_TAG_LABEL, ParseVersionError, SemanticVersion};
