//! Stored permission rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::codenames::CodenameMap;
use crate::core::keys::{PermKey, PermKind, format_key};

/// Permission identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermId(pub i64);

impl std::fmt::Display for PermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored permission.
///
/// The embedded key is the uniqueness tuple: the store never holds two rows
/// with the same key. `name` overrides the generated description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perm {
    /// Store-assigned identifier
    pub id: PermId,
    /// Canonical key, doubles as the uniqueness tuple
    #[serde(flatten)]
    pub key: PermKey,
    /// Explicit display name, wins over the generated description
    pub name: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Perm {
    /// The permission kind.
    pub fn kind(&self) -> PermKind {
        self.key.kind
    }

    /// The action codename.
    pub fn codename(&self) -> &str {
        &self.key.codename
    }

    pub fn is_generic(&self) -> bool {
        self.key.kind == PermKind::Generic
    }

    pub fn is_model(&self) -> bool {
        self.key.kind == PermKind::Model
    }

    pub fn is_object(&self) -> bool {
        self.key.kind == PermKind::Object
    }

    pub fn is_field(&self) -> bool {
        self.key.kind == PermKind::Field
    }

    /// Whether this row is a wildcard grant for its scope.
    pub fn is_wildcard(&self) -> bool {
        self.key.is_wildcard()
    }

    /// Human-readable description.
    ///
    /// The explicit name wins when set; otherwise the description is built
    /// from the scope and the codename display map, e.g.
    /// `Permission | model articles.Article | add`.
    pub fn display_name(&self, codenames: &CodenameMap) -> String {
        if let Some(name) = &self.name {
            return name.clone();
        }

        let mut parts = vec!["Permission".to_string()];
        if let Some(scope) = self.scope_name() {
            parts.push(scope);
        }
        parts.push(codenames.display(&self.key.codename).to_string());
        parts.join(" | ")
    }

    fn scope_name(&self) -> Option<String> {
        let model = self.key.model.as_ref()?;
        match self.key.kind {
            PermKind::Generic => None,
            PermKind::Model => Some(format!("model {}", model)),
            PermKind::Object => {
                let pk = self.key.object_pk.as_deref().unwrap_or("?");
                Some(format!("model {} | object {}", model, pk))
            }
            PermKind::Field => {
                let field = self.key.field.as_deref().unwrap_or("?");
                Some(format!("model {} | field {}", model, field))
            }
        }
    }
}

impl std::fmt::Display for Perm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_key(&self.key))
    }
}
