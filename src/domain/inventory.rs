use crate::domain::version::{is_normal, parse_version, same_precedence};
use crate::error::{ReckonError, Result};
use semver::Version;
use std::collections::BTreeSet;

/// Snapshot of the repository facts a reckoning is based on.
///
/// Built once per reckoning and never mutated. Every version the inventory
/// names (current, base, base normal) is also an element of the claimed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VcsInventory {
    commit_id: String,
    current_version: Option<Version>,
    base_version: Option<Version>,
    base_normal: Option<Version>,
    commits_since_base: u32,
    parallel_normals: BTreeSet<Version>,
    claimed_versions: BTreeSet<Version>,
}

impl VcsInventory {
    /// Create an inventory, validating its invariants
    ///
    /// # Errors
    /// * `Inventory` - if `base_normal` carries a pre-release part, or if any of
    ///   `current_version`, `base_version`, `base_normal` is missing from `claimed_versions`
    pub fn new(
        commit_id: impl Into<String>,
        current_version: Option<Version>,
        base_version: Option<Version>,
        base_normal: Option<Version>,
        commits_since_base: u32,
        parallel_normals: BTreeSet<Version>,
        claimed_versions: BTreeSet<Version>,
    ) -> Result<Self> {
        if let Some(normal) = &base_normal {
            if !is_normal(normal) {
                return Err(ReckonError::inventory(format!(
                    "base normal {} has a pre-release part",
                    normal
                )));
            }
        }

        let named = [
            ("current version", &current_version),
            ("base version", &base_version),
            ("base normal", &base_normal),
        ];
        for (label, version) in named {
            if let Some(version) = version {
                if !claimed_versions.iter().any(|c| same_precedence(c, version)) {
                    return Err(ReckonError::inventory(format!(
                        "{} {} is not among the claimed versions",
                        label, version
                    )));
                }
            }
        }

        Ok(VcsInventory {
            commit_id: commit_id.into(),
            current_version,
            base_version,
            base_normal,
            commits_since_base,
            parallel_normals,
            claimed_versions,
        })
    }

    /// Inventory of a repository without commits or tags
    pub fn empty() -> Self {
        VcsInventory {
            commit_id: String::new(),
            current_version: None,
            base_version: None,
            base_normal: None,
            commits_since_base: 0,
            parallel_normals: BTreeSet::new(),
            claimed_versions: BTreeSet::new(),
        }
    }

    /// Start building an inventory
    pub fn builder() -> VcsInventoryBuilder {
        VcsInventoryBuilder::default()
    }

    pub fn commit_id(&self) -> &str {
        &self.commit_id
    }

    pub fn current_version(&self) -> Option<&Version> {
        self.current_version.as_ref()
    }

    pub fn base_version(&self) -> Option<&Version> {
        self.base_version.as_ref()
    }

    pub fn base_normal(&self) -> Option<&Version> {
        self.base_normal.as_ref()
    }

    pub fn commits_since_base(&self) -> u32 {
        self.commits_since_base
    }

    pub fn parallel_normals(&self) -> &BTreeSet<Version> {
        &self.parallel_normals
    }

    pub fn claimed_versions(&self) -> &BTreeSet<Version> {
        &self.claimed_versions
    }

    /// Whether a version of equal precedence has been claimed
    pub fn is_claimed(&self, version: &Version) -> bool {
        self.claimed_versions
            .iter()
            .any(|claimed| same_precedence(claimed, version))
    }

    /// Pre-release strings of every claimed version sharing `normal`
    pub fn claimed_pre_releases_for<'a>(
        &'a self,
        normal: &'a Version,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.claimed_versions
            .iter()
            .filter(move |v| {
                v.major == normal.major && v.minor == normal.minor && v.patch == normal.patch
            })
            .map(|v| v.pre.as_str())
    }
}

/// Fluent builder for [`VcsInventory`].
///
/// `build` adds the current, base and base-normal versions to the claimed set.
#[derive(Debug, Clone, Default)]
pub struct VcsInventoryBuilder {
    commit_id: String,
    current_version: Option<Version>,
    base_version: Option<Version>,
    base_normal: Option<Version>,
    commits_since_base: u32,
    parallel_normals: BTreeSet<Version>,
    claimed_versions: BTreeSet<Version>,
}

impl VcsInventoryBuilder {
    pub fn commit_id(mut self, commit_id: impl Into<String>) -> Self {
        self.commit_id = commit_id.into();
        self
    }

    pub fn current_version(mut self, version: Version) -> Self {
        self.current_version = Some(version);
        self
    }

    pub fn base_version(mut self, version: Version) -> Self {
        self.base_version = Some(version);
        self
    }

    pub fn base_normal(mut self, version: Version) -> Self {
        self.base_normal = Some(version);
        self
    }

    pub fn commits_since_base(mut self, commits: u32) -> Self {
        self.commits_since_base = commits;
        self
    }

    pub fn parallel_normal(mut self, version: Version) -> Self {
        self.parallel_normals.insert(version);
        self
    }

    pub fn parallel_normals(mut self, versions: impl IntoIterator<Item = Version>) -> Self {
        self.parallel_normals.extend(versions);
        self
    }

    pub fn claimed_version(mut self, version: Version) -> Self {
        self.claimed_versions.insert(version);
        self
    }

    pub fn claimed_versions(mut self, versions: impl IntoIterator<Item = Version>) -> Self {
        self.claimed_versions.extend(versions);
        self
    }

    /// Parse and add claimed versions from strings
    pub fn claimed(mut self, versions: &[&str]) -> Result<Self> {
        for text in versions {
            self.claimed_versions.insert(parse_version(text)?);
        }
        Ok(self)
    }

    pub fn build(mut self) -> Result<VcsInventory> {
        for version in [&self.current_version, &self.base_version, &self.base_normal]
            .into_iter()
            .flatten()
        {
            self.claimed_versions.insert(version.clone());
        }

        VcsInventory::new(
            self.commit_id,
            self.current_version,
            self.base_version,
            self.base_normal,
            self.commits_since_base,
            self.parallel_normals,
            self.claimed_versions,
        )
    }
}
