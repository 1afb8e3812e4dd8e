use crate::domain::{canonical_identifiers, VcsInventory};
use crate::error::{ReckonError, Result};
use crate::strategy::PreReleasePartStrategy;
use chrono::{DateTime, Utc};
use semver::Version;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Source of the instant a timestamp pre-release is formatted from
pub type InstantSupplier = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Successively finer UTC formats, each appended after a dot
const FORMATS: [&str; 3] = ["%Y%m%d", "%H%M%S", "%3f"];

/// Reckons a unique timestamp as the pre-release part.
///
/// The candidate starts as `YYYYMMDD`. While a version with the same normal
/// and that exact pre-release is already claimed, the candidate is extended
/// with `.HHmmss` and then `.SSS` (milliseconds). All three are formatted from
/// a single instant taken once per reckoning.
///
/// The fields keep their zero padding in the returned text. Claimed versions
/// hold them in canonical form (`20240101.90542`), so candidates are compared
/// that way too.
#[derive(Clone)]
pub struct DatePreReleasePartStrategy {
    instant: InstantSupplier,
}

impl DatePreReleasePartStrategy {
    pub fn new(instant: InstantSupplier) -> Self {
        DatePreReleasePartStrategy { instant }
    }

    /// Timestamp from the system clock at reckoning time
    pub fn system_clock() -> Self {
        Self::new(Arc::new(Utc::now))
    }

    /// Always timestamp with `instant`
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self::new(Arc::new(move || instant))
    }
}

impl fmt::Debug for DatePreReleasePartStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatePreReleasePartStrategy")
            .finish_non_exhaustive()
    }
}

impl PreReleasePartStrategy for DatePreReleasePartStrategy {
    fn reckon_pre_release(
        &self,
        inventory: &VcsInventory,
        normal: &Version,
        _stage: &str,
    ) -> Result<Option<String>> {
        let claimed: HashSet<&str> = inventory.claimed_pre_releases_for(normal).collect();
        let timestamp = (self.instant)();

        let mut candidate = String::new();
        for (precision, format) in FORMATS.iter().enumerate() {
            if precision > 0 {
                candidate.push('.');
            }
            candidate.push_str(&timestamp.format(format).to_string());

            if !claimed.contains(canonical_identifiers(&candidate).as_str()) {
                debug!(%normal, precision, candidate = candidate.as_str(), "timestamp pre-release");
                return Ok(Some(candidate));
            }
        }

        Err(ReckonError::TimestampExhausted {
            normal: normal.clone(),
            candidate,
        })
    }
}
