use crate::domain::{increment_normal, normal_of, Scope, VcsInventory};
use crate::error::Result;
use crate::strategy::{NormalStrategy, PreReleaseStrategy};
use semver::Version;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Always reckons the same version. Used for pinned releases.
///
/// As a [PreReleaseStrategy] it ignores the target normal and returns its
/// version verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstantVersionStrategy {
    version: Version,
}

impl ConstantVersionStrategy {
    pub fn new(version: Version) -> Self {
        ConstantVersionStrategy { version }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl NormalStrategy for ConstantVersionStrategy {
    fn reckon_normal(&self, _inventory: &VcsInventory) -> Result<Version> {
        Ok(self.version.clone())
    }
}

impl PreReleaseStrategy for ConstantVersionStrategy {
    fn reckon_target_version(
        &self,
        _inventory: &VcsInventory,
        _target_normal: &Version,
    ) -> Result<Version> {
        Ok(self.version.clone())
    }
}

/// Source of the scope requested for a reckoning, if any
pub type ScopeSupplier = Arc<dyn Fn() -> Option<Scope> + Send + Sync>;

/// Increments the base normal by a requested scope.
///
/// Without a base normal the increment starts from 0.0.0. When the
/// incremented normal is already being developed on a parallel branch it is
/// incremented once more. A commit that is already tagged keeps its own
/// normal unless a scope was explicitly requested.
#[derive(Clone)]
pub struct ScopeNormalStrategy {
    scope: ScopeSupplier,
    default_scope: Scope,
}

impl ScopeNormalStrategy {
    pub fn new(scope: ScopeSupplier) -> Self {
        ScopeNormalStrategy {
            scope,
            default_scope: Scope::default(),
        }
    }

    /// Always increment by `scope`
    pub fn fixed(scope: Scope) -> Self {
        Self::new(Arc::new(move || Some(scope)))
    }

    /// Scope used when the supplier yields nothing
    pub fn with_default_scope(mut self, scope: Scope) -> Self {
        self.default_scope = scope;
        self
    }
}

impl fmt::Debug for ScopeNormalStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeNormalStrategy")
            .field("default_scope", &self.default_scope)
            .finish_non_exhaustive()
    }
}

impl NormalStrategy for ScopeNormalStrategy {
    fn reckon_normal(&self, inventory: &VcsInventory) -> Result<Version> {
        let requested = (self.scope)();

        if let (Some(current), None) = (inventory.current_version(), requested) {
            debug!(%current, "commit already tagged, keeping its normal");
            return Ok(normal_of(current));
        }

        let scope = requested.unwrap_or(self.default_scope);
        let base = inventory
            .base_normal()
            .cloned()
            .unwrap_or_else(|| Version::new(0, 0, 0));

        let incremented = increment_normal(&base, scope);
        let target = if inventory.parallel_normals().contains(&incremented) {
            increment_normal(&incremented, scope)
        } else {
            incremented
        };

        debug!(%base, %scope, %target, "scoped normal");
        Ok(target)
    }
}
