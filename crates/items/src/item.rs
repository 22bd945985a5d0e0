//! Item data model and the create/update payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use catalog_core::ItemId;

/// A persisted catalog entry.
///
/// `price` stays text end-to-end (`"10.50"`) so no value ever passes through a
/// float. Timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: String,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating an item. Every field except `description` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: String,
    pub stock: i32,
}

/// Sparse payload for a partial update.
///
/// `name`, `price` and `stock` are not nullable: an explicit `null` fails to
/// decode instead of being read as "absent". `description` is nullable, so the
/// decoded `Option` alone cannot tell "omitted" from "null"; `description_present`
/// records whether the key appeared at all. It is not part of the wire schema and
/// is filled in by [`crate::resolve_update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UpdateItemInput {
    #[serde(default, deserialize_with = "present_non_null")]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(skip)]
    pub description_present: bool,
    #[serde(default, deserialize_with = "present_non_null")]
    pub price: Option<String>,
    #[serde(default, deserialize_with = "present_non_null")]
    pub stock: Option<i32>,
}

/// Per-field intent derived from an update payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldChange<T> {
    Untouched,
    Set(T),
    Clear,
}

impl UpdateItemInput {
    /// What the update does to `description`.
    pub fn description_change(&self) -> FieldChange<&str> {
        match (self.description_present, self.description.as_deref()) {
            (false, _) => FieldChange::Untouched,
            (true, Some(value)) => FieldChange::Set(value),
            (true, None) => FieldChange::Clear,
        }
    }

    /// True when at least one column would be written.
    pub fn has_changes(&self) -> bool {
        self.name.is_some()
            || self.description_change() != FieldChange::Untouched
            || self.price.is_some()
            || self.stock.is_some()
    }
}

/// One page of a listing plus the total number of rows matching the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemPage {
    pub items: Vec<Item>,
    pub total: i64,
}

// Only invoked when the key is present, thanks to `#[serde(default)]`; a JSON
// null therefore reaches `T::deserialize` and is rejected there.
fn present_non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
