use crate::domain::parse_version;
use crate::error::{ReckonError, Result};
use regex::Regex;
use semver::Version;

pub const DEFAULT_TAG_PREFIX: &str = "v";

/// Decides which tags name versions, and which version each names.
///
/// By default a tag is read as a version after dropping the tag prefix, if
/// the tag starts with it. With a pattern, only matching tags are read: the
/// version text is the only capture group, or the group named `version`, or
/// the whole match.
#[derive(Debug, Clone)]
pub struct TagSelector {
    prefix: String,
    pattern: Option<Regex>,
}

impl Default for TagSelector {
    fn default() -> Self {
        TagSelector {
            prefix: DEFAULT_TAG_PREFIX.to_string(),
            pattern: None,
        }
    }
}

impl TagSelector {
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// # Errors
    /// * `Config` - if `pattern` is not a valid regex
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| ReckonError::config(format!("Invalid tag pattern '{}': {}", pattern, e)))?;
        self.pattern = Some(regex);
        Ok(self)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Tag name to create for `version`
    pub fn format(&self, version: &Version) -> String {
        format!("{}{}", self.prefix, version)
    }

    /// Version text a tag carries, or `None` if the tag is not selected
    pub fn version_text<'a>(&self, tag: &'a str) -> Option<&'a str> {
        match &self.pattern {
            None => Some(tag.strip_prefix(self.prefix.as_str()).unwrap_or(tag)),
            Some(regex) => {
                let captures = regex.captures(tag)?;
                let group = if regex.captures_len() == 2 {
                    captures.get(1)
                } else {
                    captures.name("version")
                };
                group.or_else(|| captures.get(0)).map(|m| m.as_str())
            }
        }
    }

    /// Parse the version a tag names
    ///
    /// Returns `None` for tags the selector does not pick, and an error for
    /// picked tags whose text is not a semantic version.
    pub fn select(&self, tag: &str) -> Option<Result<Version>> {
        self.version_text(tag).map(parse_version)
    }
}
