//! Semantic version value type used to rank release tags
//!
//! Wraps `semver::Version` but defines its own ordering:
//! - `major.minor.patch` compared numerically
//! - a prerelease sorts before the plain release of the same triple
//! - prerelease identifiers follow semver precedence
//! - build metadata never takes part in ordering or equality
//!
//! Tags that are not strict semantic versions degrade to a `0.0.0` sentinel
//! carrying the raw tag text as its label. A sentinel ranks below every
//! parsed version, including `0.0.0` and its prereleases, and all sentinels
//! rank equal to each other.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use semver::{Prerelease, Version};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Label given to the sentinel version of a release without a tag
pub const NO_TAG_LABEL: &str = "No Tag";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid semantic version {input:?}: {reason}")]
pub struct ParseVersionError {
    pub input: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SemanticVersion {
    version: Version,
    /// Raw tag text, only set on the fallback sentinel
    label: Option<String>,
}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            version: Version::new(major, minor, patch),
            label: None,
        }
    }

    /// Baseline `0.0.0` used as the comparison floor when no release exists
    pub fn zero() -> Self {
        Self::new(0, 0, 0)
    }

    /// Baseline `major.0.0`
    pub fn with_major(major: u64) -> Self {
        Self::new(major, 0, 0)
    }

    /// Parse a release tag, never failing.
    ///
    /// Examples:
    /// - Some("1.2.3") -> 1.2.3
    /// - Some("v2.0.0-beta.1") -> 2.0.0-beta.1
    /// - Some("release-build-42") -> 0.0.0 labelled "release-build-42"
    /// - Some("") / None -> 0.0.0 labelled "No Tag"
    pub fn parse_tag(tag: Option<&str>) -> Self {
        match tag.filter(|t| !t.is_empty()) {
            Some(tag) => match parse_strict(tag) {
                Ok(version) => Self {
                    version,
                    label: None,
                },
                Err(_) => Self::sentinel(tag),
            },
            None => Self::sentinel(NO_TAG_LABEL),
        }
    }

    /// Returns true if `tag` parses strictly, without the sentinel fallback
    pub fn can_parse(tag: Option<&str>) -> bool {
        tag.filter(|t| !t.is_empty())
            .is_some_and(|t| parse_strict(t).is_ok())
    }

    fn sentinel(label: &str) -> Self {
        Self {
            version: Version::new(0, 0, 0),
            label: Some(label.to_string()),
        }
    }

    pub fn major(&self) -> u64 {
        self.version.major
    }

    pub fn minor(&self) -> u64 {
        self.version.minor
    }

    pub fn patch(&self) -> u64 {
        self.version.patch
    }

    pub fn prerelease(&self) -> Option<&str> {
        non_empty(self.version.pre.as_str())
    }

    pub fn build_metadata(&self) -> Option<&str> {
        non_empty(self.version.build.as_str())
    }

    /// Raw tag text of a sentinel version
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.version.pre.is_empty()
    }

    pub fn is_sentinel(&self) -> bool {
        self.label.is_some()
    }

}

/// Strict parse with an optional leading `v`/`V`
fn parse_strict(tag: &str) -> Result<Version, ParseVersionError> {
    let trimmed = tag.strip_prefix(['v', 'V']).unwrap_or(tag);
    Version::parse(trimmed).map_err(|e| ParseVersionError {
        input: tag.to_string(),
        reason: e.to_string(),
    })
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

/// A release (empty prerelease) outranks any prerelease of the same triple.
fn compare_prerelease(a: &Prerelease, b: &Prerelease) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}

impl FromStr for SemanticVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_strict(s).map(Self::from)
    }
}

impl From<Version> for SemanticVersion {
    fn from(version: Version) -> Self {
        Self {
            version,
            label: None,
        }
    }
}

impl Default for SemanticVersion {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_sentinel(), other.is_sentinel()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        let (a, b) = (&self.version, &other.version);
        a.major
            .cmp(&b.major)
            .then(a.minor.cmp(&b.minor))
            .then(a.patch.cmp(&b.patch))
            .then_with(|| compare_prerelease(&a.pre, &b.pre))
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_sentinel().hash(state);
        if self.is_sentinel() {
            return;
        }
        self.version.major.hash(state);
        self.version.minor.hash(state);
        self.version.patch.hash(state);
        self.version.pre.hash(state);
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
