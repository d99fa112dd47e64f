//! Type definitions for permission keys

use serde::{Deserialize, Serialize};

/// Codename sentinel matching any codename within its scope
pub const WILDCARD_CODENAME: &str = "*";

/// Permission granularity
///
/// The set is closed: per-kind behavior is always a `match` over these four
/// variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermKind {
    /// Free-standing named permission
    Generic,
    /// Permission on every row of a model
    Model,
    /// Permission on a single persisted object
    Object,
    /// Permission on a single field of a model
    Field,
}

impl PermKind {
    /// All kinds, in declaration order
    pub const ALL: [PermKind; 4] = [
        PermKind::Generic,
        PermKind::Model,
        PermKind::Object,
        PermKind::Field,
    ];

    /// Returns the key-string prefix for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            PermKind::Generic => "generic",
            PermKind::Model => "model",
            PermKind::Object => "object",
            PermKind::Field => "field",
        }
    }
}

impl std::fmt::Display for PermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PermKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(PermKind::Generic),
            "model" => Ok(PermKind::Model),
            "object" => Ok(PermKind::Object),
            "field" => Ok(PermKind::Field),
            _ => Err(format!("Invalid permission kind: {}", s)),
        }
    }
}

/// Reference to an application model, the `app.Model` pair of a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModelRef {
    /// Application label
    pub app: String,
    /// Model name
    pub model: String,
}

impl ModelRef {
    /// Create a new model reference
    pub fn new<A: Into<String>, M: Into<String>>(app: A, model: M) -> Self {
        Self {
            app: app.into(),
            model: model.into(),
        }
    }
}

impl std::fmt::Display for ModelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.app, self.model)
    }
}

/// Caller-supplied reference to an entity of some model
///
/// `pk` is `None` for entities that have not been persisted yet; object
/// permissions refuse those.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// The model the entity belongs to
    pub model: ModelRef,
    /// Primary key, if persisted
    pub pk: Option<String>,
}

impl ObjectRef {
    /// Reference to a persisted entity
    pub fn new<P: Into<String>>(model: ModelRef, pk: P) -> Self {
        Self {
            model,
            pk: Some(pk.into()),
        }
    }

    /// Reference to an entity that has no primary key yet
    pub fn unsaved(model: ModelRef) -> Self {
        Self { model, pk: None }
    }

    /// Whether the referenced entity has a primary key
    pub fn is_persisted(&self) -> bool {
        self.pk.is_some()
    }
}

/// Canonical permission descriptor
///
/// Doubles as the uniqueness tuple of the permission store: two rows may
/// never share the same `(kind, codename, model, object_pk, field)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermKey {
    /// Permission granularity
    pub kind: PermKind,
    /// Action identifier, or the wildcard sentinel
    pub codename: String,
    /// Target model for model/object/field kinds
    pub model: Option<ModelRef>,
    /// Target primary key for the object kind
    pub object_pk: Option<String>,
    /// Target field name for the field kind
    pub field: Option<String>,
}

impl PermKey {
    /// Generic permission descriptor
    pub fn generic<C: Into<String>>(codename: C) -> Self {
        Self {
            kind: PermKind::Generic,
            codename: codename.into(),
            model: None,
            object_pk: None,
            field: None,
        }
    }

    /// Model permission descriptor
    pub fn model<C: Into<String>>(model: ModelRef, codename: C) -> Self {
        Self {
            kind: PermKind::Model,
            codename: codename.into(),
            model: Some(model),
            object_pk: None,
            field: None,
        }
    }

    /// Object permission descriptor
    pub fn object<P: Into<String>, C: Into<String>>(model: ModelRef, pk: P, codename: C) -> Self {
        Self {
            kind: PermKind::Object,
            codename: codename.into(),
            model: Some(model),
            object_pk: Some(pk.into()),
            field: None,
        }
    }

    /// Field permission descriptor
    pub fn field<F: Into<String>, C: Into<String>>(model: ModelRef, field: F, codename: C) -> Self {
        Self {
            kind: PermKind::Field,
            codename: codename.into(),
            model: Some(model),
            object_pk: None,
            field: Some(field.into()),
        }
    }

    /// Whether this descriptor carries the wildcard codename
    pub fn is_wildcard(&self) -> bool {
        self.codename == WILDCARD_CODENAME
    }

    /// The wildcard descriptor for the same `(kind, model, object_pk, field)`
    /// scope
    pub fn wildcard_of(&self) -> PermKey {
        PermKey {
            kind: self.kind,
            codename: WILDCARD_CODENAME.to_string(),
            model: self.model.clone(),
            object_pk: self.object_pk.clone(),
            field: self.field.clone(),
        }
    }

    /// Whether `other` names the same scope, ignoring the codename
    pub fn same_scope(&self, other: &PermKey) -> bool {
        self.kind == other.kind
            && self.model == other.model
            && self.object_pk == other.object_pk
            && self.field == other.field
    }
}
