//! Postgres-backed item repository.
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `CatalogError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | CatalogError | Scenario |
//! |------------|----------------------|--------------|----------|
//! | Database (unique violation) | `23505` | `Domain(DuplicateName)` | Name already taken (`ux_items_name`) |
//! | Database (check violation) | `23514` | `Domain(InvalidInput)` | `price > 0` / `stock >= 0` rejected by the table |
//! | Database (numeric out of range) | `22003` | `Domain(InvalidInput)` | Price does not fit `NUMERIC(10,2)` |
//! | Database (other) | Any other | `Storage` | Unexpected database error |
//! | PoolTimedOut / Io / other | N/A | `Storage` | Connectivity, timeouts, etc. |
//!
//! A missing row on get/update/delete is detected from an empty result
//! (`fetch_optional`) and reported as `Domain(NotFound)`.
//!
//! Every write is a single statement: inserts and updates return the affected
//! row via `RETURNING`, so there is no read-then-write window.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row, postgres::PgRow};
use tracing::{Span, instrument};

use catalog_core::{DomainError, ItemId};
use catalog_items::{
    CatalogError, CatalogResult, CreateItemInput, Item, ItemRepository, UpdateItemInput,
};

use super::sql::{ITEM_COLUMNS, NAME_FILTER, SqlValue, UpdateStatement, name_pattern};

/// Postgres-backed item repository.
///
/// `PostgresItemRepository` is `Send + Sync` and cheap to clone; the pool
/// handles connection sharing.
#[derive(Debug, Clone)]
pub struct PostgresItemRepository {
    pool: PgPool,
}

impl PostgresItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, input), fields(name = %input.name), err)]
    pub async fn insert_item(&self, input: &CreateItemInput) -> CatalogResult<Item> {
        let sql = format!(
            "INSERT INTO items (id, name, description, price, stock) \
             VALUES ($1, $2, $3, $4::numeric, $5) \
             RETURNING {ITEM_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(*ItemId::new().as_uuid())
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(&input.price)
            .bind(input.stock)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert_item", e))?;

        Ok(row.into())
    }

    #[instrument(skip(self), fields(item_count = tracing::field::Empty), err)]
    pub async fn list_items(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<Vec<Item>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE {NAME_FILTER} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(name_pattern(query))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_items", e))?;

        Span::current().record("item_count", rows.len());
        Ok(rows.into_iter().map(Item::from).collect())
    }

    #[instrument(skip(self), err)]
    pub async fn count_items(&self, query: &str) -> CatalogResult<i64> {
        let sql = format!("SELECT COUNT(*) AS total FROM items WHERE {NAME_FILTER}");

        let row = sqlx::query(&sql)
            .bind(name_pattern(query))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_items", e))?;

        row.try_get::<i64, _>("total")
            .map_err(|e| map_sqlx_error("count_items", e))
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    pub async fn get_item(&self, id: ItemId) -> CatalogResult<Item> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_item", e))?;

        row.map(Item::from)
            .ok_or_else(|| DomainError::NotFound.into())
    }

    #[instrument(skip(self, input), fields(item_id = %id), err)]
    pub async fn update_item(&self, id: ItemId, input: &UpdateItemInput) -> CatalogResult<Item> {
        let Some(statement) = UpdateStatement::compose(input) else {
            return Err(DomainError::invalid_input("at least one field is required").into());
        };

        let mut query = sqlx::query_as::<_, ItemRow>(&statement.sql);
        for value in statement.values {
            query = match value {
                SqlValue::Text(text) => query.bind(text),
                SqlValue::Int(int) => query.bind(int),
            };
        }

        let row = query
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("update_item", e))?;

        row.map(Item::from)
            .ok_or_else(|| DomainError::NotFound.into())
    }

    #[instrument(skip(self), fields(item_id = %id), err)]
    pub async fn delete_item(&self, id: ItemId) -> CatalogResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_item", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound.into());
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for PostgresItemRepository {
    async fn insert(&self, input: &CreateItemInput) -> CatalogResult<Item> {
        self.insert_item(input).await
    }

    async fn list(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<Vec<Item>> {
        self.list_items(query, limit, offset).await
    }

    async fn count(&self, query: &str) -> CatalogResult<i64> {
        self.count_items(query).await
    }

    async fn get_by_id(&self, id: ItemId) -> CatalogResult<Item> {
        self.get_item(id).await
    }

    async fn update(&self, id: ItemId, input: &UpdateItemInput) -> CatalogResult<Item> {
        self.update_item(id, input).await
    }

    async fn delete(&self, id: ItemId) -> CatalogResult<()> {
        self.delete_item(id).await
    }
}

/// Map SQLx errors to CatalogError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> CatalogError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some("23505") => return DomainError::DuplicateName.into(),
            Some("23514") => {
                return DomainError::invalid_input("value violates a table constraint").into();
            }
            Some("22003") => {
                return DomainError::invalid_input("numeric value out of range").into();
            }
            _ => {}
        }
    }
    CatalogError::storage(anyhow::Error::new(err).context(format!("{operation} failed")))
}

// SQLx row types

#[derive(Debug)]
struct ItemRow {
    id: uuid::Uuid,
    name: String,
    description: Option<String>,
    price: String,
    stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for ItemRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ItemRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: ItemId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock: row.stock,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
