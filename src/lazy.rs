use crate::error::{ReckonError, Result};
use semver::Version;
use std::fmt;
use std::sync::{Mutex, OnceLock};

type Reckoning = Box<dyn FnOnce() -> Result<Version> + Send>;

/// A version reckoned on first use.
///
/// The closure runs at most once, even when several threads ask at the same
/// time. Its outcome, version or error, is kept and handed out on every later
/// access.
pub struct ReckonedVersion {
    outcome: OnceLock<Result<Version>>,
    reckoning: Mutex<Option<Reckoning>>,
}

impl ReckonedVersion {
    pub fn new(reckoning: impl FnOnce() -> Result<Version> + Send + 'static) -> Self {
        ReckonedVersion {
            outcome: OnceLock::new(),
            reckoning: Mutex::new(Some(Box::new(reckoning))),
        }
    }

    /// Version that is already known
    pub fn of(version: Version) -> Self {
        let outcome = OnceLock::new();
        let _ = outcome.set(Ok(version));
        ReckonedVersion {
            outcome,
            reckoning: Mutex::new(None),
        }
    }

    pub fn get(&self) -> std::result::Result<&Version, &ReckonError> {
        self.outcome
            .get_or_init(|| {
                let reckoning = match self.reckoning.lock() {
                    Ok(mut slot) => slot.take(),
                    Err(poisoned) => poisoned.into_inner().take(),
                };
                match reckoning {
                    Some(reckon) => reckon(),
                    None => Err(ReckonError::version("version reckoning was abandoned")),
                }
            })
            .as_ref()
    }

    pub fn is_reckoned(&self) -> bool {
        self.outcome.get().is_some()
    }
}

impl fmt::Display for ReckonedVersion {
    /// The version, or `unspecified` when reckoning failed
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Ok(version) => write!(f, "{}", version),
            Err(_) => write!(f, "unspecified"),
        }
    }
}

impl fmt::Debug for ReckonedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReckonedVersion")
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_reckons_once_and_caches_version() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = ReckonedVersion::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Version::new(1, 2, 3))
        });

        assert!(!lazy.is_reckoned());
        assert_eq!(lazy.get().unwrap(), &Version::new(1, 2, 3));
        assert_eq!(lazy.to_string(), "1.2.3");
        assert!(lazy.is_reckoned());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_caches_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = ReckonedVersion::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ReckonError::AlreadyReleased {
                version: Version::new(1, 0, 0),
            })
        });

        assert!(matches!(lazy.get(), Err(ReckonError::AlreadyReleased { .. })));
        assert!(matches!(lazy.get(), Err(ReckonError::AlreadyReleased { .. })));
        assert_eq!(lazy.to_string(), "unspecified");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_concurrent_access_reckons_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = Arc::new(ReckonedVersion::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Version::new(0, 9, 0))
        }));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let lazy = Arc::clone(&lazy);
                thread::spawn(move || lazy.get().map(Clone::clone).ok())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(Version::new(0, 9, 0)));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_known_version() {
        let lazy = ReckonedVersion::of(Version::new(4, 0, 0));
        assert!(lazy.is_reckoned());
        assert_eq!(lazy.to_string(), "4.0.0");
    }
}
