use crate::domain::VcsInventory;
use crate::error::{ReckonError, Result};
use crate::strategy::PreReleasePartStrategy;
use regex::Regex;
use semver::Version;
use std::sync::LazyLock;
use tracing::debug;

static STAGE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<name>\w+)\.(?P<num>\d+)$").expect("stage pattern is valid")
});

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+$").expect("number pattern is valid"));

/// Formats pre-release parts as `<stage>.<n>`.
///
/// `n` is one more than the highest counter already claimed for the same
/// normal version and stage, so each (normal, stage) pair counts up from 1
/// independently. A blank stage degrades to a bare `<n>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberedStagePreReleasePartStrategy {
    fixed_stage: Option<String>,
}

impl NumberedStagePreReleasePartStrategy {
    /// Number whichever stage is being reckoned
    pub fn new() -> Self {
        Self::default()
    }

    /// Always number `stage`, whatever stage is being reckoned
    pub fn for_stage(stage: impl Into<String>) -> Self {
        NumberedStagePreReleasePartStrategy {
            fixed_stage: Some(stage.into()),
        }
    }

    fn highest_counter<'a>(claimed: impl Iterator<Item = &'a str>, stage: &str) -> Result<u64> {
        let counters: Vec<&str> = if stage.is_empty() {
            claimed.filter(|pre| NUMBER_REGEX.is_match(pre)).collect()
        } else {
            claimed
                .filter_map(|pre| STAGE_REGEX.captures(pre))
                .filter(|caps| &caps["name"] == stage)
                .filter_map(|caps| caps.name("num").map(|num| num.as_str()))
                .collect()
        };

        counters.into_iter().try_fold(0, |highest, counter| {
            let value = counter.parse::<u64>().map_err(|_| {
                ReckonError::version(format!(
                    "Pre-release counter {} for stage '{}' is out of range",
                    counter, stage
                ))
            })?;
            Ok(highest.max(value))
        })
    }
}

impl PreReleasePartStrategy for NumberedStagePreReleasePartStrategy {
    fn reckon_pre_release(
        &self,
        inventory: &VcsInventory,
        normal: &Version,
        stage: &str,
    ) -> Result<Option<String>> {
        let stage = self.fixed_stage.as_deref().unwrap_or(stage);
        let previous = Self::highest_counter(inventory.claimed_pre_releases_for(normal), stage)?;
        let next = previous.checked_add(1).ok_or_else(|| {
            ReckonError::version(format!(
                "No pre-release counter left for stage '{}' of {}",
                stage, normal
            ))
        })?;

        debug!(%normal, stage, previous, next, "numbered pre-release");

        Ok(Some(if stage.is_empty() {
            next.to_string()
        } else {
            format!("{}.{}", stage, next)
        }))
    }
}
