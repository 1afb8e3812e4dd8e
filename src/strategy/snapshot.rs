use crate::domain::VcsInventory;
use crate::error::Result;
use crate::strategy::PreReleaseStrategy;
use semver::Version;
use std::fmt;
use std::sync::Arc;

/// Leaves the target normal undecorated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoPreReleaseStrategy;

impl PreReleaseStrategy for NoPreReleaseStrategy {
    fn reckon_target_version(
        &self,
        _inventory: &VcsInventory,
        target_normal: &Version,
    ) -> Result<Version> {
        Ok(target_normal.clone())
    }
}

pub const SNAPSHOT: &str = "SNAPSHOT";

/// Source of the snapshot flag for a reckoning
pub type SnapshotSupplier = Arc<dyn Fn() -> bool + Send + Sync>;

/// Marks the normal as `-SNAPSHOT` when the supplier says so
#[derive(Clone)]
pub struct SnapshotPreReleaseStrategy {
    snapshot: SnapshotSupplier,
}

impl SnapshotPreReleaseStrategy {
    pub fn new(snapshot: SnapshotSupplier) -> Self {
        SnapshotPreReleaseStrategy { snapshot }
    }

    pub fn fixed(snapshot: bool) -> Self {
        Self::new(Arc::new(move || snapshot))
    }
}

impl fmt::Debug for SnapshotPreReleaseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotPreReleaseStrategy")
            .finish_non_exhaustive()
    }
}

impl PreReleaseStrategy for SnapshotPreReleaseStrategy {
    fn reckon_target_version(
        &self,
        _inventory: &VcsInventory,
        target_normal: &Version,
    ) -> Result<Version> {
        if (self.snapshot)() {
            crate::domain::with_pre_release(target_normal, SNAPSHOT)
        } else {
            Ok(target_normal.clone())
        }
    }
}
