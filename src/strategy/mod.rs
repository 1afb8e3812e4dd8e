//! Reckoning strategies
//!
//! A reckoning is split into two decisions, each behind its own trait:
//!
//! - [NormalStrategy]: which major.minor.patch the commit should carry
//! - [PreReleaseStrategy]: how that normal is decorated with pre-release and
//!   build metadata
//!
//! Pre-release strategies are usually composed from two single-purpose part
//! strategies, [PreReleasePartStrategy] and [BuildMetadataPartStrategy], either
//! directly ([CompoundPreReleaseStrategy]) or per stage
//! ([CompoundStagePreReleaseStrategy]).
//!
//! All strategies are immutable once built and are `Send + Sync`, so one
//! configuration can serve any number of reckonings from any thread.

pub mod compound;
pub mod date;
pub mod normal;
pub mod numbered;
pub mod part;
pub mod snapshot;
pub mod stage;

pub use compound::CompoundPreReleaseStrategy;
pub use date::{DatePreReleasePartStrategy, InstantSupplier};
pub use normal::{ConstantVersionStrategy, ScopeNormalStrategy};
pub use numbered::NumberedStagePreReleasePartStrategy;
pub use part::{CommitIdBuildMetadata, ConstantPartStrategy};
pub use snapshot::{NoPreReleaseStrategy, SnapshotPreReleaseStrategy};
pub use stage::{CompoundStagePreReleaseStrategy, StageKind, StageRegistry, StageSupplier};

use crate::domain::VcsInventory;
use crate::error::Result;
use semver::Version;
use std::sync::Arc;

/// Reckons the normal (major.minor.patch) version for an inventory.
///
/// Any pre-release or build metadata on the returned value is discarded by
/// the reckoner.
pub trait NormalStrategy: Send + Sync {
    fn reckon_normal(&self, inventory: &VcsInventory) -> Result<Version>;
}

/// Decorates a reckoned normal version with pre-release and build metadata.
pub trait PreReleaseStrategy: Send + Sync {
    fn reckon_target_version(&self, inventory: &VcsInventory, target_normal: &Version)
        -> Result<Version>;
}

/// Determines the pre-release part to attach to a normal version.
///
/// `stage` is the name of the stage being reckoned; strategies that are not
/// stage-aware ignore it. Returning `None` leaves the pre-release part empty.
pub trait PreReleasePartStrategy: Send + Sync {
    fn reckon_pre_release(
        &self,
        inventory: &VcsInventory,
        normal: &Version,
        stage: &str,
    ) -> Result<Option<String>>;
}

/// Determines the build metadata to attach to a version.
pub trait BuildMetadataPartStrategy: Send + Sync {
    fn reckon_build_metadata(&self, inventory: &VcsInventory) -> Result<Option<String>>;
}

/// Shared handle to a pre-release part strategy
pub type SharedPreReleasePart = Arc<dyn PreReleasePartStrategy>;

/// Shared handle to a build metadata part strategy
pub type SharedBuildMetadataPart = Arc<dyn BuildMetadataPartStrategy>;

impl<T: NormalStrategy + ?Sized> NormalStrategy for Arc<T> {
    fn reckon_normal(&self, inventory: &VcsInventory) -> Result<Version> {
        (**self).reckon_normal(inventory)
    }
}

impl<T: NormalStrategy + ?Sized> NormalStrategy for Box<T> {
    fn reckon_normal(&self, inventory: &VcsInventory) -> Result<Version> {
        (**self).reckon_normal(inventory)
    }
}

impl<T: PreReleasePartStrategy + ?Sized> PreReleasePartStrategy for Arc<T> {
    fn reckon_pre_release(
        &self,
        inventory: &VcsInventory,
        normal: &Version,
        stage: &str,
    ) -> Result<Option<String>> {
        (**self).reckon_pre_release(inventory, normal, stage)
    }
}

impl<T: BuildMetadataPartStrategy + ?Sized> BuildMetadataPartStrategy for Arc<T> {
    fn reckon_build_metadata(&self, inventory: &VcsInventory) -> Result<Option<String>> {
        (**self).reckon_build_metadata(inventory)
    }
}

impl<T: PreReleaseStrategy + ?Sized> PreReleaseStrategy for Box<T> {
    fn reckon_target_version(
        &self,
        inventory: &VcsInventory,
        target_normal: &Version,
    ) -> Result<Version> {
        (**self).reckon_target_version(inventory, target_normal)
    }
}

/// Apply optional pre-release and build metadata parts to a normal version
pub(crate) fn decorate(
    normal: &Version,
    pre_release: Option<String>,
    build_metadata: Option<String>,
) -> Result<Version> {
    let with_pre_release = match pre_release {
        Some(pre) => crate::domain::with_pre_release(normal, &pre)?,
        None => normal.clone(),
    };
    match build_metadata {
        Some(build) => crate::domain::with_build_metadata(&with_pre_release, &build),
        None => Ok(with_pre_release),
    }
}
