//! Storage port for catalog items.

use async_trait::async_trait;

use catalog_core::ItemId;

use crate::error::CatalogResult;
use crate::item::{CreateItemInput, Item, UpdateItemInput};

/// Persistence port for items.
///
/// Implementations translate their native failure signals into domain kinds:
/// a unique-name violation becomes `DuplicateName`, a missing row on
/// get/update/delete becomes `NotFound`. Any other failure is returned as
/// `CatalogError::Storage` and never reclassified.
///
/// Every method is a single future; dropping it (e.g. when a request deadline
/// fires) cancels the underlying call.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a new row and return it with its generated id and timestamps.
    async fn insert(&self, input: &CreateItemInput) -> CatalogResult<Item>;

    /// Rows ordered newest first, filtered by case-insensitive substring on
    /// `name` when `query` is non-empty. No match yields an empty vector.
    async fn list(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<Vec<Item>>;

    /// Number of rows matching the same filter as [`ItemRepository::list`].
    async fn count(&self, query: &str) -> CatalogResult<i64>;

    async fn get_by_id(&self, id: ItemId) -> CatalogResult<Item>;

    /// Apply a partial update in one atomic statement, refreshing `updated_at`.
    ///
    /// Rejects an input with no changes with `InvalidInput` instead of
    /// executing a no-op.
    async fn update(&self, id: ItemId, input: &UpdateItemInput) -> CatalogResult<Item>;

    /// Hard delete.
    async fn delete(&self, id: ItemId) -> CatalogResult<()>;
}
