use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::release::error::InvalidRepository;
use crate::version::SemanticVersion;

/// A published release as reported by a release source
///
/// Only `tag_name` and `prerelease` take part in ranking; the remaining
/// fields are carried through for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseRecord {
    pub tag_name: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
    pub name: Option<String>,
    pub html_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl ReleaseRecord {
    pub fn new(tag_name: impl Into<String>, prerelease: bool) -> Self {
        Self {
            tag_name: Some(tag_name.into()),
            prerelease,
            ..Default::default()
        }
    }

    /// Tag text, treating an empty tag as absent
    pub fn tag(&self) -> Option<&str> {
        self.tag_name.as_deref().filter(|t| !t.is_empty())
    }

    /// Version derived from the tag, falling back to the `0.0.0` sentinel
    pub fn version(&self) -> SemanticVersion {
        SemanticVersion::parse_tag(self.tag())
    }

    pub fn has_semver_tag(&self) -> bool {
        SemanticVersion::can_parse(self.tag())
    }

    pub fn channel(&self) -> Channel {
        if self.prerelease {
            Channel::Prerelease
        } else {
            Channel::Stable
        }
    }
}

/// Release track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Stable,
    Prerelease,
}

/// Which tags take part in "latest" selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagFilter {
    /// Only tags that parse strictly as semantic versions
    #[default]
    SemVerOnly,
    /// Every tag; unparsable ones rank below every version tag
    All,
}

impl TagFilter {
    pub fn from_only_semver_tags(only_semver_tags: bool) -> Self {
        if only_semver_tags {
            TagFilter::SemVerOnly
        } else {
            TagFilter::All
        }
    }

    pub fn admits(&self, release: &ReleaseRecord) -> bool {
        match self {
            TagFilter::SemVerOnly => release.has_semver_tag(),
            TagFilter::All => true,
        }
    }
}

/// A remote repository identified by owner and name, both non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, InvalidRepository> {
        let owner = owner.into();
        let name = name.into();

        if owner.trim().is_empty() {
            return Err(InvalidRepository::EmptyOwner);
        }
        if name.trim().is_empty() {
            return Err(InvalidRepository::EmptyName);
        }

        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for Repository {
    type Err = InvalidRepository;

    /// Parses "owner/name"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s
            .split_once('/')
            .filter(|(_, name)| !name.contains('/'))
            .ok_or_else(|| InvalidRepository::Malformed(s.to_string()))?;
        Self::new(owner, name)
    }
}
