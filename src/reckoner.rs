//! Top-level reckoning
//!
//! A reckoning asks the normal strategy for a major.minor.patch, lets the
//! pre-release strategy decorate it, and then refuses any candidate that
//! another commit already carries.

use crate::domain::{normal_of, same_precedence, VcsInventory};
use crate::error::{ReckonError, Result};
use crate::git::InventorySupplier;
use crate::strategy::{NormalStrategy, PreReleaseStrategy};
use semver::Version;
use tracing::{debug, info};

/// Reckon the version for the commit described by `inventory`
///
/// # Errors
/// * `AlreadyReleased` - if the candidate is claimed and is not the version
///   the current commit is already tagged with
/// * any error raised by either strategy
pub fn reckon(
    inventory: &VcsInventory,
    normal: &dyn NormalStrategy,
    pre_release: &dyn PreReleaseStrategy,
) -> Result<Version> {
    let target_normal = normal_of(&normal.reckon_normal(inventory)?);
    debug!(normal = %target_normal, "reckoned normal");

    let candidate = pre_release.reckon_target_version(inventory, &target_normal)?;
    debug!(%candidate, "reckoned candidate");

    if inventory.is_claimed(&candidate) && !is_current(inventory, &candidate) {
        return Err(ReckonError::AlreadyReleased { version: candidate });
    }

    info!(version = %candidate, commit = inventory.commit_id(), "reckoned version");
    Ok(candidate)
}

/// Take a fresh inventory from `supplier` and reckon with it
pub fn reckon_from(
    supplier: &dyn InventorySupplier,
    normal: &dyn NormalStrategy,
    pre_release: &dyn PreReleaseStrategy,
) -> Result<Version> {
    let inventory = supplier.inventory()?;
    reckon(&inventory, normal, pre_release)
}

fn is_current(inventory: &VcsInventory, candidate: &Version) -> bool {
    inventory
        .current_version()
        .is_some_and(|current| same_precedence(current, candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Scope;
    use crate::git::MockInventorySupplier;
    use crate::strategy::{
        CommitIdBuildMetadata, CompoundPreReleaseStrategy, CompoundStagePreReleaseStrategy,
        ConstantVersionStrategy, NoPreReleaseStrategy, NumberedStagePreReleasePartStrategy,
        ScopeNormalStrategy,
    };

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_constant_normal_when_unclaimed() {
        let inv = VcsInventory::builder()
            .claimed(&["1.0.0", "1.1.0-rc.1"])
            .unwrap()
            .build()
            .unwrap();
        let normal = ConstantVersionStrategy::new(v("1.1.0"));
        assert_eq!(reckon(&inv, &normal, &NoPreReleaseStrategy).unwrap(), v("1.1.0"));
    }

    #[test]
    fn test_claimed_version_accepted_on_its_own_commit() {
        let inv = VcsInventory::builder()
            .current_version(v("1.1.0"))
            .build()
            .unwrap();
        let normal = ConstantVersionStrategy::new(v("1.1.0"));
        assert_eq!(reckon(&inv, &normal, &NoPreReleaseStrategy).unwrap(), v("1.1.0"));
    }

    #[test]
    fn test_claimed_version_rejected_without_current() {
        let inv = VcsInventory::builder()
            .claimed(&["1.1.0"])
            .unwrap()
            .build()
            .unwrap();
        let normal = ConstantVersionStrategy::new(v("1.1.0"));
        let err = reckon(&inv, &normal, &NoPreReleaseStrategy).unwrap_err();
        assert!(
            matches!(err, ReckonError::AlreadyReleased { ref version } if *version == v("1.1.0"))
        );
        assert_eq!(
            err.to_string(),
            "Reckoned version 1.1.0 has already been released."
        );
    }

    #[test]
    fn test_claimed_version_rejected_when_current_differs() {
        let inv = VcsInventory::builder()
            .current_version(v("1.2.0"))
            .claimed(&["1.1.0"])
            .unwrap()
            .build()
            .unwrap();
        let normal = ConstantVersionStrategy::new(v("1.1.0"));
        assert!(matches!(
            reckon(&inv, &normal, &NoPreReleaseStrategy),
            Err(ReckonError::AlreadyReleased { .. })
        ));
    }

    #[test]
    fn test_build_metadata_does_not_dodge_conflict() {
        let inv = VcsInventory::builder()
            .commit_id("beef")
            .claimed(&["2.0.0+cafe"])
            .unwrap()
            .build()
            .unwrap();
        let normal = ConstantVersionStrategy::new(v("2.0.0"));
        let pre_release = CompoundPreReleaseStrategy::builder()
            .build_metadata_part(CommitIdBuildMetadata)
            .build();
        assert!(matches!(
            reckon(&inv, &normal, &pre_release),
            Err(ReckonError::AlreadyReleased { .. })
        ));
    }

    #[test]
    fn test_normal_decoration_is_discarded() {
        let inv = VcsInventory::builder().build().unwrap();
        let normal = ConstantVersionStrategy::new(v("3.0.0-beta.1+xyz"));
        assert_eq!(reckon(&inv, &normal, &NoPreReleaseStrategy).unwrap(), v("3.0.0"));
    }

    #[test]
    fn test_reckoning_is_idempotent() {
        let inv = VcsInventory::builder()
            .commit_id("abc")
            .base_normal(v("1.0.0"))
            .claimed(&["1.1.0-rc.1", "1.1.0-rc.2"])
            .unwrap()
            .build()
            .unwrap();
        let normal = ScopeNormalStrategy::fixed(Scope::Minor);
        let pre_release = CompoundStagePreReleaseStrategy::builder()
            .pre_release_stages(["beta", "rc"])
            .build_with_stage_supplier(std::sync::Arc::new(|| Some("rc".to_string())))
            .unwrap();

        let first = reckon(&inv, &normal, &pre_release).unwrap();
        let second = reckon(&inv, &normal, &pre_release).unwrap();
        assert_eq!(first, v("1.1.0-rc.3"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_reckoned_version_round_trips_as_current() {
        let normal = ConstantVersionStrategy::new(v("0.4.0"));
        let pre_release = CompoundPreReleaseStrategy::builder()
            .pre_release_part(NumberedStagePreReleasePartStrategy::for_stage("rc"))
            .build();

        let untagged = VcsInventory::builder()
            .claimed(&["0.4.0-rc.1"])
            .unwrap()
            .build()
            .unwrap();
        let reckoned = reckon(&untagged, &normal, &pre_release).unwrap();
        assert_eq!(reckoned, v("0.4.0-rc.2"));

        let tagged = VcsInventory::builder()
            .current_version(reckoned.clone())
            .base_version(reckoned.clone())
            .build()
            .unwrap();
        let again = reckon(&tagged, &normal, &ConstantVersionStrategy::new(reckoned.clone()));
        assert_eq!(again.unwrap(), reckoned);
    }

    #[test]
    fn test_reckon_from_supplier() {
        let supplier = MockInventorySupplier::new(
            VcsInventory::builder()
                .base_normal(v("2.3.0"))
                .build()
                .unwrap(),
        );
        let version = reckon_from(
            &supplier,
            &ScopeNormalStrategy::fixed(Scope::Patch),
            &NoPreReleaseStrategy,
        )
        .unwrap();
        assert_eq!(version, v("2.3.1"));
    }
}
