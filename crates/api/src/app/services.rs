use std::sync::Arc;

use sqlx::PgPool;

use catalog_infra::{InMemoryItemRepository, PostgresItemRepository};
use catalog_items::{CatalogService, ItemRepository};

/// Everything the handlers need, shared behind an `Arc` extension.
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
    /// Pool probed by `/ready`. `None` when running without a database.
    pub db: Option<PgPool>,
}

impl AppServices {
    pub fn new(repository: Arc<dyn ItemRepository>, db: Option<PgPool>) -> Self {
        Self {
            catalog: CatalogService::new(repository),
            db,
        }
    }

    /// Production wiring: Postgres repository over `pool`.
    pub fn postgres(pool: PgPool) -> Self {
        Self::new(Arc::new(PostgresItemRepository::new(pool.clone())), Some(pool))
    }

    /// In-memory repository and no pool (tests/dev). `/ready` reports 503.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryItemRepository::new()), None)
    }
}
