//! Helpers over [`semver::Version`] used throughout reckoning.
//!
//! Versions are compared the way semantic versioning orders them: build
//! metadata never takes part in precedence.

use crate::error::{ReckonError, Result};
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Parse a version string, accepting an optional leading 'v' or 'V'
///
/// Numeric pre-release identifiers written with leading zeros (as in
/// `1.0.0-20240101.090542`) are read in their canonical form.
pub fn parse_version(text: &str) -> Result<Version> {
    let clean = text.trim().trim_start_matches('v').trim_start_matches('V');
    Version::parse(clean)
        .or_else(|e| Version::parse(&canonical_version_text(clean)).map_err(|_| e))
        .map_err(|e| ReckonError::version(format!("Invalid version '{}': {}", text, e)))
}

/// Drop leading zeros from every purely numeric dot-separated identifier.
///
/// Zero-padded fields keep their order once read as numbers, so `000000`
/// becomes `0` and `087` becomes `87`. Other identifiers are left alone.
pub fn canonical_identifiers(text: &str) -> String {
    text.split('.')
        .map(|ident| {
            if ident.len() > 1 && ident.bytes().all(|b| b.is_ascii_digit()) {
                let trimmed = ident.trim_start_matches('0');
                if trimmed.is_empty() {
                    "0"
                } else {
                    trimmed
                }
            } else {
                ident
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn canonical_version_text(text: &str) -> String {
    let (main, build) = match text.split_once('+') {
        Some((main, build)) => (main, Some(build)),
        None => (text, None),
    };
    let mut canonical = match main.split_once('-') {
        Some((normal, pre)) => format!("{}-{}", normal, canonical_identifiers(pre)),
        None => main.to_string(),
    };
    if let Some(build) = build {
        canonical.push('+');
        canonical.push_str(build);
    }
    canonical
}

/// The major.minor.patch part of a version, without pre-release or build metadata
pub fn normal_of(version: &Version) -> Version {
    Version::new(version.major, version.minor, version.patch)
}

/// Whether the version has no pre-release part
pub fn is_normal(version: &Version) -> bool {
    version.pre.is_empty()
}

/// Equality by semantic-version precedence (build metadata ignored)
pub fn same_precedence(a: &Version, b: &Version) -> bool {
    a.cmp_precedence(b) == Ordering::Equal
}

/// A copy of `version` carrying the given pre-release part, in canonical form
pub fn with_pre_release(version: &Version, pre_release: &str) -> Result<Version> {
    let pre = Prerelease::new(&canonical_identifiers(pre_release)).map_err(|e| {
        ReckonError::version(format!(
            "Invalid pre-release '{}' for {}: {}",
            pre_release, version, e
        ))
    })?;
    Ok(Version {
        pre,
        ..version.clone()
    })
}

/// A copy of `version` carrying the given build metadata
pub fn with_build_metadata(version: &Version, build: &str) -> Result<Version> {
    let build_metadata = BuildMetadata::new(build).map_err(|e| {
        ReckonError::version(format!(
            "Invalid build metadata '{}' for {}: {}",
            build, version, e
        ))
    })?;
    Ok(Version {
        build: build_metadata,
        ..version.clone()
    })
}

/// Which component of a normal version to increment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Major,
    #[default]
    Minor,
    Patch,
}

impl FromStr for Scope {
    type Err = ReckonError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(Scope::Major),
            "minor" => Ok(Scope::Minor),
            "patch" => Ok(Scope::Patch),
            other => Err(ReckonError::config(format!(
                "Unknown scope '{}' - expected major, minor or patch",
                other
            ))),
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Major => write!(f, "major"),
            Scope::Minor => write!(f, "minor"),
            Scope::Patch => write!(f, "patch"),
        }
    }
}

/// Increment the normal part of `version` by `scope`, resetting lower components
pub fn increment_normal(version: &Version, scope: Scope) -> Version {
    match scope {
        Scope::Major => Version::new(version.major + 1, 0, 0),
        Scope::Minor => Version::new(version.major, version.minor + 1, 0),
        Scope::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}
