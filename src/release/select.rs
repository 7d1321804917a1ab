//! Latest-release selection over a list of release records
//!
//! Selection ranks releases by the version derived from their tag. Among
//! releases with equal versions the one appearing last in the input wins,
//! the same result a stable ascending sort followed by "take last" gives.

use crate::release::types::{Channel, ReleaseRecord, TagFilter};
use crate::version::SemanticVersion;

/// Select the release with the highest tag version
///
/// Returns None for an empty input or when `filter` rejects every release.
pub fn latest<'a, I>(releases: I, filter: TagFilter) -> Option<&'a ReleaseRecord>
where
    I: IntoIterator<Item = &'a ReleaseRecord>,
{
    releases
        .into_iter()
        .filter(|release| filter.admits(release))
        .map(|release| (release.version(), release))
        // max_by returns the last of several equal maxima
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, release)| release)
}

/// Select the latest release on a single channel
pub fn latest_in_channel(
    releases: &[ReleaseRecord],
    channel: Channel,
    filter: TagFilter,
) -> Option<&ReleaseRecord> {
    latest(
        releases.iter().filter(|release| release.channel() == channel),
        filter,
    )
}

/// Latest non-prerelease
pub fn latest_release(releases: &[ReleaseRecord], filter: TagFilter) -> Option<&ReleaseRecord> {
    latest_in_channel(releases, Channel::Stable, filter)
}

/// Latest prerelease
pub fn latest_prerelease(releases: &[ReleaseRecord], filter: TagFilter) -> Option<&ReleaseRecord> {
    latest_in_channel(releases, Channel::Prerelease, filter)
}

/// Version of a selected release, or the zero floor when nothing was selected
pub fn version_or_zero(release: Option<&ReleaseRecord>) -> SemanticVersion {
    release.map_or_else(SemanticVersion::zero, ReleaseRecord::version)
}
