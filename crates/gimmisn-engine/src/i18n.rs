//! Translation context for report text.
//!
//! Translations are an explicit value handed to formatting calls, loaded
//! from a TOML file with a `[messages]` table:
//!
//! ```toml
//! [messages]
//! "Street name" = "Utcanév"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::types::GimmisnResult;

/// Message catalog for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Translations {
    #[serde(default)]
    messages: HashMap<String, String>,
}

impl Translations {
    /// Returns a catalog that leaves every message untouched.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Parses a catalog from TOML text.
    pub fn from_toml(content: &str) -> GimmisnResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads a catalog from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> GimmisnResult<Self> {
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Translates a message, falling back to the input.
    pub fn translate(&self, message: &str) -> String {
        self.messages
            .get(message)
            .cloned()
            .unwrap_or_else(|| message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        assert_eq!(Translations::identity().translate("Street name"), "Street name");
    }

    #[test]
    fn test_catalog() {
        let tr = Translations::from_toml("[messages]\n\"Street name\" = \"Utcanév\"\n").unwrap();
        assert_eq!(tr.translate("Street name"), "Utcanév");
        assert_eq!(tr.translate("Missing count"), "Missing count");
    }
}
