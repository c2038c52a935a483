//! Translator configuration.
//!
//! Read from the `findargs` section of a figment:
//!
//! ```yaml
//! findargs:
//!   max_depth: 16
//!   cursor_tiebreaker: createdAt
//! ```
//!
//! Missing keys fall back to [`TranslatorConfig::default`].

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use findargs::Limits;
use serde::{Deserialize, Serialize};

pub const SECTION: &str = "findargs";
pub const DEFAULT_MAX_DEPTH: usize = 32;
pub const DEFAULT_CURSOR_TIEBREAKER: &str = "createdAt";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Upper bound for `where` and `include` nesting.
    pub max_depth: usize,
    /// Field always appended as the second cursor sort key.
    pub cursor_tiebreaker: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            cursor_tiebreaker: DEFAULT_CURSOR_TIEBREAKER.to_owned(),
        }
    }
}

impl TranslatorConfig {
    /// Extract the `findargs` section, or the defaults when it is absent.
    ///
    /// # Errors
    /// Returns the figment error when the section has the wrong shape.
    pub fn from_figment(figment: &Figment) -> Result<Self, figment::Error> {
        if !figment.contains(SECTION) {
            return Ok(Self::default());
        }
        figment.extract_inner(SECTION)
    }

    /// Defaults, then `path` (YAML), then `FINDARGS_*` environment variables.
    ///
    /// # Errors
    /// Returns the figment error for unreadable or malformed sources.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        let figment = Figment::new()
            .merge(Serialized::default(SECTION, Self::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("FINDARGS_").map(|k| format!("{SECTION}.{k}").into()));
        Self::from_figment(&figment)
    }

    #[must_use]
    pub fn limits(&self) -> Limits {
        Limits::new().with_max_depth(self.max_depth)
    }
}
