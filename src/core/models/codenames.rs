//! Codename display names
//!
//! Maps machine codenames to the words used in generated permission
//! descriptions. The built-in entries cover the conventional CRUD codenames
//! and the wildcard sentinel; deployments extend the map through
//! configuration.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::core::keys::WILDCARD_CODENAME;

static DEFAULT_CODENAMES: Lazy<HashMap<String, String>> = Lazy::new(|| {
    HashMap::from([
        ("add".to_string(), "add".to_string()),
        ("change".to_string(), "change".to_string()),
        ("delete".to_string(), "delete".to_string()),
        (WILDCARD_CODENAME.to_string(), "wildcard".to_string()),
    ])
});

/// The built-in codename display names.
pub fn default_codenames() -> &'static HashMap<String, String> {
    &DEFAULT_CODENAMES
}

/// Codename display map: built-in entries plus configured extras.
///
/// Extras extend the defaults and may override them; unknown codenames fall
/// back to the codename itself.
#[derive(Debug, Clone)]
pub struct CodenameMap {
    entries: HashMap<String, String>,
}

impl CodenameMap {
    /// Build a map from the defaults extended with `extras`.
    pub fn with_extras(extras: &HashMap<String, String>) -> Self {
        let mut entries = DEFAULT_CODENAMES.clone();
        entries.extend(extras.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { entries }
    }

    /// Display name for a codename, falling back to the codename itself.
    pub fn display<'a>(&'a self, codename: &'a str) -> &'a str {
        self.entries
            .get(codename)
            .map(String::as_str)
            .unwrap_or(codename)
    }
}

impl Default for CodenameMap {
    fn default() -> Self {
        Self {
            entries: DEFAULT_CODENAMES.clone(),
        }
    }
}
