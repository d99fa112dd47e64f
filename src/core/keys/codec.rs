//! Parsing and formatting of permission key strings
//!
//! Key shapes per kind (every segment must be non-empty):
//!
//! ```text
//! generic.codename
//! model.app.Model.codename
//! object.app.Model.codename      (plus a supplied object reference)
//! field.app.Model.field.codename
//! ```

use crate::utils::error::{PermError, Result};

use super::types::{ModelRef, ObjectRef, PermKey, PermKind};

/// Parse a permission key string into its canonical descriptor.
///
/// For the object kind the supplied `obj` is validated: it must be present,
/// its model must match the key's `app.Model` segments, and it must be
/// persisted. Other kinds ignore `obj`.
pub fn parse_key(key: &str, obj: Option<&ObjectRef>) -> Result<PermKey> {
    let (kind_str, rest) = key.split_once('.').ok_or_else(|| {
        PermError::malformed_key(format!("key {:?} has no kind prefix", key))
    })?;

    let kind: PermKind = kind_str
        .parse()
        .map_err(|_| PermError::malformed_key(format!("unknown kind {:?} in key {:?}", kind_str, key)))?;

    let segments: Vec<&str> = rest.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(PermError::malformed_key(format!(
            "key {:?} contains an empty segment",
            key
        )));
    }

    match kind {
        PermKind::Generic => match segments.as_slice() {
            [codename] => Ok(PermKey::generic(*codename)),
            _ => Err(shape_error(key, kind, "generic.codename")),
        },
        PermKind::Model => match segments.as_slice() {
            [app, model, codename] => Ok(PermKey::model(ModelRef::new(*app, *model), *codename)),
            _ => Err(shape_error(key, kind, "model.app.Model.codename")),
        },
        PermKind::Object => match segments.as_slice() {
            [app, model, codename] => {
                let model = ModelRef::new(*app, *model);
                let pk = validated_object_pk(key, &model, obj)?;
                Ok(PermKey::object(model, pk, *codename))
            }
            _ => Err(shape_error(key, kind, "object.app.Model.codename")),
        },
        PermKind::Field => match segments.as_slice() {
            [app, model, field, codename] => Ok(PermKey::field(
                ModelRef::new(*app, *model),
                *field,
                *codename,
            )),
            _ => Err(shape_error(key, kind, "field.app.Model.field.codename")),
        },
    }
}

/// Format a descriptor back to its key string.
///
/// Exact inverse of [`parse_key`] for well-formed descriptors; the object
/// kind renders without its primary key, which travels as the separate
/// object reference.
pub fn format_key(key: &PermKey) -> String {
    match key.kind {
        PermKind::Generic => format!("generic.{}", key.codename),
        PermKind::Model => format!("model.{}.{}", model_of(key), key.codename),
        PermKind::Object => format!("object.{}.{}", model_of(key), key.codename),
        PermKind::Field => format!(
            "field.{}.{}.{}",
            model_of(key),
            key.field.as_deref().unwrap_or_default(),
            key.codename
        ),
    }
}

fn model_of(key: &PermKey) -> String {
    key.model
        .as_ref()
        .map(ModelRef::to_string)
        .unwrap_or_default()
}

fn shape_error(key: &str, kind: PermKind, expected: &str) -> PermError {
    PermError::malformed_key(format!(
        "key {:?} does not match the {} shape {:?}",
        key, kind, expected
    ))
}

fn validated_object_pk(key: &str, model: &ModelRef, obj: Option<&ObjectRef>) -> Result<String> {
    let obj = obj.ok_or_else(|| {
        PermError::incorrect_object(format!("object key {:?} requires an object reference", key))
    })?;
    if obj.model != *model {
        return Err(PermError::incorrect_content_type(format!(
            "object of model {} does not match key {:?}",
            obj.model, key
        )));
    }
    obj.pk.clone().ok_or_else(|| {
        PermError::object_not_persisted(format!(
            "object of model {} needs to be persisted first",
            obj.model
        ))
    })
}
