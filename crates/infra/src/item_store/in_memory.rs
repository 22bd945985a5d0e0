use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use catalog_core::{DomainError, ItemId};
use catalog_items::{
    CatalogError, CatalogResult, CreateItemInput, FieldChange, Item, ItemRepository,
    UpdateItemInput,
};

/// In-memory item repository for tests/dev.
///
/// Mirrors the Postgres contract: unique names (case-sensitive, like the
/// unique index), case-insensitive substring search, newest-first ordering and
/// `NotFound` for missing ids. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    inner: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> CatalogError {
        CatalogError::storage(anyhow::anyhow!("in-memory item store lock poisoned"))
    }

    fn matching(&self, query: &str) -> CatalogResult<Vec<Item>> {
        let map = self.inner.read().map_err(|_| Self::poisoned())?;
        let needle = query.to_lowercase();

        let mut items: Vec<Item> = map
            .values()
            .filter(|item| needle.is_empty() || item.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        Ok(items)
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, input: &CreateItemInput) -> CatalogResult<Item> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        if map.values().any(|existing| existing.name == input.name) {
            return Err(DomainError::DuplicateName.into());
        }

        let now = Utc::now();
        let item = Item {
            id: ItemId::new(),
            name: input.name.clone(),
            description: input.description.clone(),
            price: input.price.clone(),
            stock: input.stock,
            created_at: now,
            updated_at: now,
        };
        map.insert(item.id, item.clone());
        Ok(item)
    }

    async fn list(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<Vec<Item>> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(0);
        Ok(self.matching(query)?.into_iter().skip(skip).take(take).collect())
    }

    async fn count(&self, query: &str) -> CatalogResult<i64> {
        Ok(self.matching(query)?.len() as i64)
    }

    async fn get_by_id(&self, id: ItemId) -> CatalogResult<Item> {
        let map = self.inner.read().map_err(|_| Self::poisoned())?;
        map.get(&id).cloned().ok_or_else(|| DomainError::NotFound.into())
    }

    async fn update(&self, id: ItemId, input: &UpdateItemInput) -> CatalogResult<Item> {
        if !input.has_changes() {
            return Err(DomainError::invalid_input("at least one field is required").into());
        }

        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        if !map.contains_key(&id) {
            return Err(DomainError::NotFound.into());
        }
        if let Some(name) = &input.name {
            if map.values().any(|other| other.id != id && &other.name == name) {
                return Err(DomainError::DuplicateName.into());
            }
        }

        let item = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        if let Some(name) = &input.name {
            item.name = name.clone();
        }
        match input.description_change() {
            FieldChange::Untouched => {}
            FieldChange::Set(description) => item.description = Some(description.to_string()),
            FieldChange::Clear => item.description = None,
        }
        if let Some(price) = &input.price {
            item.price = price.clone();
        }
        if let Some(stock) = input.stock {
            item.stock = stock;
        }
        item.updated_at = Utc::now();

        Ok(item.clone())
    }

    async fn delete(&self, id: ItemId) -> CatalogResult<()> {
        let mut map = self.inner.write().map_err(|_| Self::poisoned())?;
        map.remove(&id).map(|_| ()).ok_or_else(|| DomainError::NotFound.into())
    }
}
