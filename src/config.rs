use crate::based_on::BasedOn;
use crate::domain::{parse_version, Scope};
use crate::error::{ReckonError, Result};
use crate::git::tag::DEFAULT_TAG_PREFIX;
use crate::git::TagSelector;
use crate::strategy::stage::{DEFAULT_DEVELOPMENT_STAGE, DEFAULT_FINAL_STAGE};
use crate::strategy::{
    CommitIdBuildMetadata, CompoundStagePreReleaseStrategy, ConstantPartStrategy,
    ConstantVersionStrategy, DatePreReleasePartStrategy, NormalStrategy,
    NumberedStagePreReleasePartStrategy, ScopeNormalStrategy, SharedBuildMetadataPart,
    SharedPreReleasePart, StageSupplier,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const CONFIG_FILE_NAME: &str = "reckon.toml";

/// Represents the complete configuration for git-reckon.
///
/// Contains tag selection, the normal strategy, the stage layout and the
/// branch to stage mapping.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub normal: NormalConfig,

    #[serde(default)]
    pub stages: StagesConfig,

    #[serde(default)]
    pub branches: BranchesConfig,
}

fn default_tag_prefix() -> String {
    DEFAULT_TAG_PREFIX.to_string()
}

/// Which tags name versions, and how new tags are named
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_tag_prefix")]
    pub prefix: String,

    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            prefix: default_tag_prefix(),
            pattern: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NormalKind {
    #[default]
    Scope,
    Constant,
}

/// How the normal version is reckoned
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct NormalConfig {
    #[serde(default)]
    pub strategy: NormalKind,

    /// Pinned version for the `constant` strategy
    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub default_scope: Scope,
}

/// Pre-release part strategy named in configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PreReleasePartKind {
    None,
    Numbered,
    Timestamp,
    Constant(String),
}

impl PreReleasePartKind {
    pub fn strategy(&self) -> SharedPreReleasePart {
        match self {
            PreReleasePartKind::None => Arc::new(ConstantPartStrategy::none()),
            PreReleasePartKind::Numbered => Arc::new(NumberedStagePreReleasePartStrategy::new()),
            PreReleasePartKind::Timestamp => {
                Arc::new(DatePreReleasePartStrategy::system_clock())
            }
            PreReleasePartKind::Constant(part) => {
                Arc::new(ConstantPartStrategy::new(part.clone()))
            }
        }
    }
}

/// Build metadata part strategy named in configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BuildMetadataPartKind {
    #[default]
    None,
    CommitId,
    Constant(String),
}

impl BuildMetadataPartKind {
    pub fn strategy(&self) -> SharedBuildMetadataPart {
        match self {
            BuildMetadataPartKind::None => Arc::new(ConstantPartStrategy::none()),
            BuildMetadataPartKind::CommitId => Arc::new(CommitIdBuildMetadata),
            BuildMetadataPartKind::Constant(part) => {
                Arc::new(ConstantPartStrategy::new(part.clone()))
            }
        }
    }
}

fn default_development_stage() -> String {
    DEFAULT_DEVELOPMENT_STAGE.to_string()
}

fn default_final_stage() -> String {
    DEFAULT_FINAL_STAGE.to_string()
}

fn default_pre_release_part() -> PreReleasePartKind {
    PreReleasePartKind::Numbered
}

/// Per-stage replacements for the default part strategies
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct StageOverride {
    #[serde(default)]
    pub pre_release: Option<PreReleasePartKind>,

    #[serde(default)]
    pub build_metadata: Option<BuildMetadataPartKind>,
}

/// Stage names, in release order, and how each stage decorates versions
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StagesConfig {
    #[serde(default = "default_development_stage")]
    pub development: String,

    #[serde(default = "default_final_stage", rename = "final")]
    pub final_stage: String,

    #[serde(default)]
    pub pre_release: Vec<String>,

    #[serde(default = "default_pre_release_part")]
    pub default_pre_release: PreReleasePartKind,

    #[serde(default)]
    pub default_build_metadata: BuildMetadataPartKind,

    #[serde(default)]
    pub overrides: BTreeMap<String, StageOverride>,
}

impl Default for StagesConfig {
    fn default() -> Self {
        StagesConfig {
            development: default_development_stage(),
            final_stage: default_final_stage(),
            pre_release: Vec::new(),
            default_pre_release: default_pre_release_part(),
            default_build_metadata: BuildMetadataPartKind::default(),
            overrides: BTreeMap::new(),
        }
    }
}

/// Stage selection by the checked-out branch
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct BranchesConfig {
    /// Branch name to stage name
    #[serde(default)]
    pub stages: HashMap<String, String>,

    /// Stage used when HEAD is detached
    #[serde(default)]
    pub detached: Option<String>,

    /// Stage used when no other rule applies
    #[serde(default)]
    pub normally: Option<String>,
}

impl BranchesConfig {
    pub fn selection(&self) -> BasedOn<String, String> {
        let mut selection = BasedOn::new("branch");
        for (branch, stage) in &self.stages {
            selection = selection.when([branch.clone()], stage.clone());
        }
        if let Some(stage) = &self.detached {
            selection = selection.when_absent(stage.clone());
        }
        if let Some(stage) = &self.normally {
            selection = selection.normally(stage.clone());
        }
        selection
    }

    /// Stage to reckon for `branch` (`None` when detached)
    ///
    /// Without any branch rules this is `None`, meaning the development stage.
    ///
    /// # Errors
    /// * `UnsetStrategy` - if rules exist but none matches and no `normally` is set
    pub fn stage_for(&self, branch: Option<&str>) -> Result<Option<String>> {
        let selection = self.selection();
        if selection.is_empty() {
            return Ok(None);
        }
        let branch = branch.map(str::to_string);
        selection.select(branch.as_ref()).map(|stage| Some(stage.clone()))
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ReckonError::config(e.to_string()))
    }

    pub fn tag_selector(&self) -> Result<TagSelector> {
        let selector = TagSelector::default().with_prefix(self.tags.prefix.clone());
        match &self.tags.pattern {
            Some(pattern) => selector.with_pattern(pattern),
            None => Ok(selector),
        }
    }

    /// Normal strategy, incrementing by `scope` when one is requested
    ///
    /// # Errors
    /// * `Config` - if the constant strategy has no valid `version`
    pub fn normal_strategy(&self, scope: Option<Scope>) -> Result<Box<dyn NormalStrategy>> {
        match self.normal.strategy {
            NormalKind::Scope => Ok(Box::new(
                ScopeNormalStrategy::new(Arc::new(move || scope))
                    .with_default_scope(self.normal.default_scope),
            )),
            NormalKind::Constant => {
                let text = self.normal.version.as_deref().ok_or_else(|| {
                    ReckonError::config("normal.version is required for the constant strategy")
                })?;
                Ok(Box::new(ConstantVersionStrategy::new(parse_version(text)?)))
            }
        }
    }

    /// Stage strategy that takes its stage from `stage_supplier`
    ///
    /// # Errors
    /// * any stage layout error (`StageOrder`, `StageInUse`, `UndefinedStage`,
    ///   `FinalStageImmutable`)
    pub fn stage_strategy(
        &self,
        stage_supplier: StageSupplier,
    ) -> Result<CompoundStagePreReleaseStrategy> {
        let stages = &self.stages;
        let mut builder = CompoundStagePreReleaseStrategy::builder()
            .development_stage(stages.development.clone())
            .final_stage(stages.final_stage.clone())
            .pre_release_stages(stages.pre_release.iter().cloned())
            .default_pre_release_part(stages.default_pre_release.strategy())
            .default_build_metadata_part(stages.default_build_metadata.strategy());

        for (stage, overrides) in &stages.overrides {
            if let Some(pre_release) = &overrides.pre_release {
                builder = builder.pre_release_part(stage.clone(), pre_release.strategy());
            }
            if let Some(build_metadata) = &overrides.build_metadata {
                builder = builder.build_metadata_part(stage.clone(), build_metadata.strategy());
            }
        }

        builder.build_with_stage_supplier(stage_supplier)
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `reckon.toml` in current directory
/// 3. `.reckon.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml(&config_str)
}
