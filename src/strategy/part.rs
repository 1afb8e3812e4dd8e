//! Simple part strategies: constant text and the commit id

use crate::domain::VcsInventory;
use crate::error::Result;
use crate::strategy::{BuildMetadataPartStrategy, PreReleasePartStrategy};
use semver::Version;

/// A part strategy that always reckons the same text, or nothing.
///
/// Serves both the pre-release and the build metadata role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantPartStrategy {
    part: Option<String>,
}

impl ConstantPartStrategy {
    /// Always reckon `part`
    pub fn new(part: impl Into<String>) -> Self {
        ConstantPartStrategy {
            part: Some(part.into()),
        }
    }

    /// Always reckon no part at all
    pub fn none() -> Self {
        ConstantPartStrategy { part: None }
    }

    pub fn part(&self) -> Option<&str> {
        self.part.as_deref()
    }
}

impl PreReleasePartStrategy for ConstantPartStrategy {
    fn reckon_pre_release(
        &self,
        _inventory: &VcsInventory,
        _normal: &Version,
        _stage: &str,
    ) -> Result<Option<String>> {
        Ok(self.part.clone())
    }
}

impl BuildMetadataPartStrategy for ConstantPartStrategy {
    fn reckon_build_metadata(&self, _inventory: &VcsInventory) -> Result<Option<String>> {
        Ok(self.part.clone())
    }
}

/// Uses the inventory's commit id as build metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitIdBuildMetadata;

impl BuildMetadataPartStrategy for CommitIdBuildMetadata {
    fn reckon_build_metadata(&self, inventory: &VcsInventory) -> Result<Option<String>> {
        Ok(Some(inventory.commit_id().to_string()))
    }
}
