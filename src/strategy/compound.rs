//! Pre-release decoration assembled from two independent part strategies

use crate::domain::VcsInventory;
use crate::error::Result;
use crate::strategy::{
    decorate, BuildMetadataPartStrategy, ConstantPartStrategy, PreReleasePartStrategy,
    PreReleaseStrategy, SharedBuildMetadataPart, SharedPreReleasePart,
};
use semver::Version;
use std::sync::Arc;

/// A [PreReleaseStrategy] that reckons the pre-release part and the build
/// metadata separately, delegating each to a part strategy.
///
/// The pre-release part is consulted with the blank stage.
#[derive(Clone)]
pub struct CompoundPreReleaseStrategy {
    pre_release_part: SharedPreReleasePart,
    build_metadata_part: SharedBuildMetadataPart,
}

impl CompoundPreReleaseStrategy {
    pub fn new(
        pre_release_part: SharedPreReleasePart,
        build_metadata_part: SharedBuildMetadataPart,
    ) -> Self {
        CompoundPreReleaseStrategy {
            pre_release_part,
            build_metadata_part,
        }
    }

    /// Builder starting with no pre-release part and no build metadata
    pub fn builder() -> CompoundBuilder {
        CompoundBuilder::default()
    }
}

impl PreReleaseStrategy for CompoundPreReleaseStrategy {
    fn reckon_target_version(
        &self,
        inventory: &VcsInventory,
        target_normal: &Version,
    ) -> Result<Version> {
        let pre_release = self
            .pre_release_part
            .reckon_pre_release(inventory, target_normal, "")?;
        let build_metadata = self.build_metadata_part.reckon_build_metadata(inventory)?;
        decorate(target_normal, pre_release, build_metadata)
    }
}

/// Builder for [CompoundPreReleaseStrategy]
#[derive(Clone)]
pub struct CompoundBuilder {
    pre_release_part: SharedPreReleasePart,
    build_metadata_part: SharedBuildMetadataPart,
}

impl Default for CompoundBuilder {
    fn default() -> Self {
        CompoundBuilder {
            pre_release_part: Arc::new(ConstantPartStrategy::none()),
            build_metadata_part: Arc::new(ConstantPartStrategy::none()),
        }
    }
}

impl CompoundBuilder {
    pub fn pre_release_part(mut self, strategy: impl PreReleasePartStrategy + 'static) -> Self {
        self.pre_release_part = Arc::new(strategy);
        self
    }

    pub fn build_metadata_part(
        mut self,
        strategy: impl BuildMetadataPartStrategy + 'static,
    ) -> Self {
        self.build_metadata_part = Arc::new(strategy);
        self
    }

    pub fn build(self) -> CompoundPreReleaseStrategy {
        CompoundPreReleaseStrategy::new(self.pre_release_part, self.build_metadata_part)
    }
}
