//! Stage-aware pre-release strategy
//!
//! Every reckoned version belongs to a *stage*:
//!
//! - one development stage: throw-away builds, assumed when no stage is given
//! - zero or more pre-release stages: candidates and milestones whose names
//!   usually appear in the pre-release part. They must be registered in
//!   strictly increasing alphabetical order, so that moving through them in
//!   that order never lowers semantic-version precedence.
//! - one final stage: a generally consumable release. Its pre-release part is
//!   always empty and cannot be overridden.
//!
//! Each stage can override the pre-release part strategy and the build
//! metadata part strategy; unset overrides fall back to the strategy-wide
//! defaults. All naming and ordering rules are checked once, when the
//! strategy is built.

use crate::domain::VcsInventory;
use crate::error::{ReckonError, Result};
use crate::strategy::{
    decorate, BuildMetadataPartStrategy, ConstantPartStrategy,
    NumberedStagePreReleasePartStrategy, PreReleasePartStrategy, PreReleaseStrategy,
    SharedBuildMetadataPart, SharedPreReleasePart,
};
use semver::Version;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_DEVELOPMENT_STAGE: &str = "";
pub const DEFAULT_FINAL_STAGE: &str = "final";

/// Source of the stage to reckon with, consulted at most once per reckoning
pub type StageSupplier = Arc<dyn Fn() -> Option<String> + Send + Sync>;

/// The role a registered stage plays in the release progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Development,
    PreRelease,
    Final,
}

#[derive(Clone, Default)]
struct StageReckoners {
    pre_release: Option<SharedPreReleasePart>,
    build_metadata: Option<SharedBuildMetadataPart>,
}

/// The validated set of stage names and their per-stage overrides
#[derive(Clone)]
pub struct StageRegistry {
    development: String,
    final_stage: String,
    pre_release: Vec<String>,
    reckoners: HashMap<String, StageReckoners>,
}

impl StageRegistry {
    pub fn development_stage(&self) -> &str {
        &self.development
    }

    pub fn final_stage(&self) -> &str {
        &self.final_stage
    }

    pub fn pre_release_stages(&self) -> &[String] {
        &self.pre_release
    }

    /// Every registered stage, in release-progression order
    pub fn stage_names(&self) -> Vec<String> {
        std::iter::once(self.development.clone())
            .chain(self.pre_release.iter().cloned())
            .chain(std::iter::once(self.final_stage.clone()))
            .collect()
    }

    pub fn kind_of(&self, stage: &str) -> Option<StageKind> {
        if stage == self.development {
            Some(StageKind::Development)
        } else if stage == self.final_stage {
            Some(StageKind::Final)
        } else if self.pre_release.iter().any(|s| s == stage) {
            Some(StageKind::PreRelease)
        } else {
            None
        }
    }

    fn lookup(&self, stage: &str) -> Result<&StageReckoners> {
        self.reckoners
            .get(stage)
            .ok_or_else(|| ReckonError::UnknownStage {
                stage: stage.to_string(),
                known: self.stage_names(),
            })
    }
}

impl fmt::Debug for StageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageRegistry")
            .field("development", &self.development)
            .field("pre_release", &self.pre_release)
            .field("final_stage", &self.final_stage)
            .finish()
    }
}

/// Stage-based [PreReleaseStrategy] composed from part strategies.
///
/// The stage can be passed explicitly with [reckon_for_stage]; as a
/// [PreReleaseStrategy] it asks its stage supplier once per reckoning and
/// assumes the development stage when that yields nothing.
///
/// [reckon_for_stage]: CompoundStagePreReleaseStrategy::reckon_for_stage
#[derive(Clone)]
pub struct CompoundStagePreReleaseStrategy {
    registry: StageRegistry,
    default_pre_release: SharedPreReleasePart,
    default_build_metadata: SharedBuildMetadataPart,
    stage_supplier: Option<StageSupplier>,
}

impl CompoundStagePreReleaseStrategy {
    pub fn builder() -> StageBuilder {
        StageBuilder::default()
    }

    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Reckon the decorated version for `stage`, or the development stage
    /// when `stage` is `None`
    ///
    /// # Errors
    /// * `UnknownStage` - if `stage` is not registered
    /// * any error raised by the stage's part strategies
    pub fn reckon_for_stage(
        &self,
        inventory: &VcsInventory,
        target_normal: &Version,
        stage: Option<&str>,
    ) -> Result<Version> {
        let stage = stage.unwrap_or(&self.registry.development);
        let reckoners = self.registry.lookup(stage)?;

        let pre_release = reckoners
            .pre_release
            .as_ref()
            .unwrap_or(&self.default_pre_release)
            .reckon_pre_release(inventory, target_normal, stage)?;
        let build_metadata = reckoners
            .build_metadata
            .as_ref()
            .unwrap_or(&self.default_build_metadata)
            .reckon_build_metadata(inventory)?;

        debug!(
            stage,
            normal = %target_normal,
            pre_release = pre_release.as_deref().unwrap_or(""),
            build_metadata = build_metadata.as_deref().unwrap_or(""),
            "stage decoration"
        );

        decorate(target_normal, pre_release, build_metadata)
    }
}

impl PreReleaseStrategy for CompoundStagePreReleaseStrategy {
    fn reckon_target_version(
        &self,
        inventory: &VcsInventory,
        target_normal: &Version,
    ) -> Result<Version> {
        let stage = self.stage_supplier.as_ref().and_then(|supplier| supplier());
        self.reckon_for_stage(inventory, target_normal, stage.as_deref())
    }
}

impl fmt::Debug for CompoundStagePreReleaseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundStagePreReleaseStrategy")
            .field("registry", &self.registry)
            .field("stage_supplier", &self.stage_supplier.is_some())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
enum StageRef {
    Development,
    Final,
    Named(String),
}

#[derive(Clone)]
enum Override {
    PreRelease(SharedPreReleasePart),
    BuildMetadata(SharedBuildMetadataPart),
}

/// Builder for [CompoundStagePreReleaseStrategy].
///
/// Setters never fail; every rule is checked by [build](StageBuilder::build).
#[derive(Clone)]
pub struct StageBuilder {
    development: String,
    final_stage: String,
    pre_release: Vec<String>,
    default_pre_release: SharedPreReleasePart,
    default_build_metadata: SharedBuildMetadataPart,
    overrides: Vec<(StageRef, Override)>,
}

impl Default for StageBuilder {
    fn default() -> Self {
        StageBuilder {
            development: DEFAULT_DEVELOPMENT_STAGE.to_string(),
            final_stage: DEFAULT_FINAL_STAGE.to_string(),
            pre_release: Vec::new(),
            default_pre_release: Arc::new(NumberedStagePreReleasePartStrategy::new()),
            default_build_metadata: Arc::new(ConstantPartStrategy::none()),
            overrides: Vec::new(),
        }
    }
}

impl StageBuilder {
    /// Name of the development stage (default `""`)
    pub fn development_stage(mut self, stage: impl Into<String>) -> Self {
        self.development = stage.into();
        self
    }

    /// Name of the final stage (default `"final"`). It never appears in a
    /// version; it only identifies the stage when one is requested.
    pub fn final_stage(mut self, stage: impl Into<String>) -> Self {
        self.final_stage = stage.into();
        self
    }

    /// Pre-release stages, in strictly increasing alphabetical order
    pub fn pre_release_stages<I, S>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pre_release = stages.into_iter().map(Into::into).collect();
        self
    }

    /// Pre-release part used by stages without their own (default: numbered stage)
    pub fn default_pre_release_part(
        mut self,
        strategy: impl PreReleasePartStrategy + 'static,
    ) -> Self {
        self.default_pre_release = Arc::new(strategy);
        self
    }

    /// Build metadata used by stages without their own (default: none)
    pub fn default_build_metadata_part(
        mut self,
        strategy: impl BuildMetadataPartStrategy + 'static,
    ) -> Self {
        self.default_build_metadata = Arc::new(strategy);
        self
    }

    pub fn pre_release_part(
        self,
        stage: impl Into<String>,
        strategy: impl PreReleasePartStrategy + 'static,
    ) -> Self {
        self.push(
            StageRef::Named(stage.into()),
            Override::PreRelease(Arc::new(strategy)),
        )
    }

    pub fn build_metadata_part(
        self,
        stage: impl Into<String>,
        strategy: impl BuildMetadataPartStrategy + 'static,
    ) -> Self {
        self.push(
            StageRef::Named(stage.into()),
            Override::BuildMetadata(Arc::new(strategy)),
        )
    }

    pub fn development_pre_release_part(
        self,
        strategy: impl PreReleasePartStrategy + 'static,
    ) -> Self {
        self.push(StageRef::Development, Override::PreRelease(Arc::new(strategy)))
    }

    pub fn development_build_metadata_part(
        self,
        strategy: impl BuildMetadataPartStrategy + 'static,
    ) -> Self {
        self.push(
            StageRef::Development,
            Override::BuildMetadata(Arc::new(strategy)),
        )
    }

    pub fn final_build_metadata_part(
        self,
        strategy: impl BuildMetadataPartStrategy + 'static,
    ) -> Self {
        self.push(StageRef::Final, Override::BuildMetadata(Arc::new(strategy)))
    }

    fn push(mut self, stage: StageRef, part: Override) -> Self {
        self.overrides.push((stage, part));
        self
    }

    /// Build a strategy that always assumes the development stage unless a
    /// stage is passed to [reckon_for_stage](CompoundStagePreReleaseStrategy::reckon_for_stage)
    pub fn build(self) -> Result<CompoundStagePreReleaseStrategy> {
        self.finish(None)
    }

    /// Build a strategy that asks `supplier` for the stage on every reckoning
    pub fn build_with_stage_supplier(
        self,
        supplier: StageSupplier,
    ) -> Result<CompoundStagePreReleaseStrategy> {
        self.finish(Some(supplier))
    }

    fn finish(
        self,
        stage_supplier: Option<StageSupplier>,
    ) -> Result<CompoundStagePreReleaseStrategy> {
        let registry = self.registry()?;
        Ok(CompoundStagePreReleaseStrategy {
            registry,
            default_pre_release: self.default_pre_release,
            default_build_metadata: self.default_build_metadata,
            stage_supplier,
        })
    }

    fn registry(&self) -> Result<StageRegistry> {
        if self.development == self.final_stage {
            return Err(ReckonError::StageInUse(self.final_stage.clone()));
        }

        for pair in self.pre_release.windows(2) {
            if pair[0] >= pair[1] {
                return Err(ReckonError::StageOrder {
                    previous: pair[0].clone(),
                    next: pair[1].clone(),
                });
            }
        }

        if let Some(clash) = self
            .pre_release
            .iter()
            .find(|s| **s == self.development || **s == self.final_stage)
        {
            return Err(ReckonError::StageInUse(clash.clone()));
        }

        let mut reckoners: HashMap<String, StageReckoners> = HashMap::new();
        reckoners.insert(self.development.clone(), StageReckoners::default());
        reckoners.insert(
            self.final_stage.clone(),
            StageReckoners {
                pre_release: Some(Arc::new(ConstantPartStrategy::none())),
                build_metadata: None,
            },
        );
        for stage in &self.pre_release {
            reckoners.insert(stage.clone(), StageReckoners::default());
        }

        for (stage, part) in &self.overrides {
            let name = match stage {
                StageRef::Development => &self.development,
                StageRef::Final => &self.final_stage,
                StageRef::Named(name) => name,
            };
            let is_final = *name == self.final_stage;
            let entry = reckoners
                .get_mut(name.as_str())
                .ok_or_else(|| ReckonError::UndefinedStage(name.clone()))?;

            match part {
                Override::PreRelease(_) if is_final => {
                    return Err(ReckonError::FinalStageImmutable(name.clone()));
                }
                Override::PreRelease(strategy) => entry.pre_release = Some(Arc::clone(strategy)),
                Override::BuildMetadata(strategy) => {
                    entry.build_metadata = Some(Arc::clone(strategy))
                }
            }
        }

        Ok(StageRegistry {
            development: self.development.clone(),
            final_stage: self.final_stage.clone(),
            pre_release: self.pre_release.clone(),
            reckoners,
        })
    }
}
