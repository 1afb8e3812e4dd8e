use crate::error::{ReckonError, Result};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Chooses a value by looking up a basis, such as the current branch.
///
/// Lookup order: an explicit mapping for the basis, the `when_absent`
/// choice when there is no basis at all, then the `normally` fallback.
#[derive(Debug, Clone)]
pub struct BasedOn<K, V> {
    description: String,
    mappings: HashMap<K, V>,
    when_absent: Option<V>,
    normally: Option<V>,
}

impl<K, V> BasedOn<K, V>
where
    K: Eq + Hash + Debug,
{
    /// `description` names the basis in `UnsetStrategy` errors
    pub fn new(description: impl Into<String>) -> Self {
        BasedOn {
            description: description.into(),
            mappings: HashMap::new(),
            when_absent: None,
            normally: None,
        }
    }

    pub fn when<I>(mut self, keys: I, value: V) -> Self
    where
        I: IntoIterator<Item = K>,
        V: Clone,
    {
        for key in keys {
            self.mappings.insert(key, value.clone());
        }
        self
    }

    pub fn when_absent(mut self, value: V) -> Self {
        self.when_absent = Some(value);
        self
    }

    pub fn normally(mut self, value: V) -> Self {
        self.normally = Some(value);
        self
    }

    /// Whether any choice at all has been configured
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty() && self.when_absent.is_none() && self.normally.is_none()
    }

    /// # Errors
    /// * `UnsetStrategy` - if neither a mapping nor a fallback applies
    pub fn select(&self, basis: Option<&K>) -> Result<&V> {
        let chosen = match basis {
            Some(key) => self.mappings.get(key),
            None => self.when_absent.as_ref(),
        };

        chosen.or(self.normally.as_ref()).ok_or_else(|| {
            ReckonError::UnsetStrategy(match basis {
                Some(key) => format!("{} {:?}", self.description, key),
                None => format!("absent {}", self.description),
            })
        })
    }
}
