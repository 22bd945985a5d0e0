//! Partial-update resolution.
//!
//! A PATCH body is inspected twice: once as a raw JSON object to record which
//! keys were sent, then decoded into [`UpdateItemInput`]. Combining the two is
//! what separates "description omitted" from "description: null".

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use catalog_core::{DomainError, DomainResult};

use crate::item::UpdateItemInput;

/// Keys an update payload may carry. Anything else is ignored.
const UPDATABLE_FIELDS: [&str; 4] = ["name", "description", "price", "stock"];

/// The recognised keys that appeared in a payload, regardless of their values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPresence(BTreeSet<&'static str>);

impl KeyPresence {
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self(
            UPDATABLE_FIELDS
                .into_iter()
                .filter(|field| object.contains_key(*field))
                .collect(),
        )
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains(field)
    }

}

/// Turn a loosely-typed update payload into an [`UpdateItemInput`].
///
/// Fails with `InvalidInput` when the payload is not an object or a field has
/// the wrong type (including `null` for `name`, `price` or `stock`). An object
/// with no recognised keys resolves to an input with no changes; the service
/// rejects that before storage is touched.
pub fn resolve_update(payload: Value) -> DomainResult<UpdateItemInput> {
    let Value::Object(object) = payload else {
        return Err(DomainError::invalid_input(
            "update payload must be a JSON object",
        ));
    };

    let presence = KeyPresence::from_object(&object);

    let mut input: UpdateItemInput = serde_json::from_value(Value::Object(object))
        .map_err(|e| DomainError::invalid_input(format!("malformed update payload: {e}")))?;
    input.description_present = presence.contains("description");

    Ok(input)
}
