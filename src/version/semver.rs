use std::cmp::Ordering;

use semver::Version;

use crate::version::error::InvalidVersionError;

/// Parse a version string into a semver::Version.
///
/// Strict: the input must be a full `MAJOR.MINOR.PATCH` version, optionally
/// followed by pre-release and build metadata. Surrounding whitespace is
/// ignored, nothing else is.
pub fn parse_version(version: &str) -> Result<Version, InvalidVersionError> {
    Version::parse(version.trim()).map_err(|source| InvalidVersionError {
        input: version.to_string(),
        source,
    })
}

/// Parse a version floor, normalizing partial versions.
///
/// Handles partial numeric versions like "1" or "1.2" by padding with zeros.
/// Full versions are parsed as-is.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.2" -> Version(1, 2, 0)
/// - "1.2.3" -> Version(1, 2, 3)
pub fn parse_padded_version(version: &str) -> Result<Version, InvalidVersionError> {
    let trimmed = version.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => trimmed.to_string(),
    };
    Version::parse(&normalized).map_err(|source| InvalidVersionError {
        input: version.to_string(),
        source,
    })
}

/// Compare two version strings by semantic-versioning precedence.
///
/// Build metadata does not take part: `1.0.0+build.2` equals `1.0.0`.
pub fn compare_versions(left: &str, right: &str) -> Result<Ordering, InvalidVersionError> {
    Ok(parse_version(left)?.cmp_precedence(&parse_version(right)?))
}

/// Sort version strings ascending by semver precedence, failing on the first
/// unparseable one. Versions differing only in build metadata keep their
/// input order.
pub fn sort_versions(versions: &[String]) -> Result<Vec<String>, InvalidVersionError> {
    let mut parsed = versions
        .iter()
        .map(|v| parse_version(v).map(|p| (p, v.clone())))
        .collect::<Result<Vec<_>, _>>()?;

    parsed.sort_by(|(a, _), (b, _)| a.cmp_precedence(b));

    Ok(parsed.into_iter().map(|(_, v)| v).collect())
}

/// Whether `version` is at or above `floor`.
pub fn meets_floor(version: &Version, floor: &Version) -> bool {
    version.cmp_precedence(floor) != Ordering::Less
}
