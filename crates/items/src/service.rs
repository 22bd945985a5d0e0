//! Catalog service: business rules in front of the repository.
//!
//! Validation and normalisation happen here, before storage is ever called.
//! Errors coming back from the repository are returned untouched so callers
//! can match on the exact domain kind.

use std::sync::Arc;

use catalog_core::{DomainError, ItemId};

use crate::error::CatalogResult;
use crate::item::{CreateItemInput, Item, ItemPage, UpdateItemInput};
use crate::repository::ItemRepository;
use crate::validation::{Price, is_valid_name, is_valid_stock};

#[derive(Clone)]
pub struct CatalogService {
    repository: Arc<dyn ItemRepository>,
}

impl CatalogService {
    pub fn new(repository: Arc<dyn ItemRepository>) -> Self {
        Self { repository }
    }

    /// Validate, normalise and persist a new item.
    pub async fn create(&self, mut input: CreateItemInput) -> CatalogResult<Item> {
        input.name = input.name.trim().to_string();
        if !is_valid_name(&input.name) {
            return Err(DomainError::invalid_input("name must not be empty").into());
        }
        input.price = Price::parse(&input.price)?.into_string();
        if !is_valid_stock(input.stock) {
            return Err(DomainError::invalid_input("stock must be >= 0").into());
        }

        let item = self.repository.insert(&input).await?;
        tracing::info!(item_id = %item.id, "item created");
        Ok(item)
    }

    /// One page of items plus the total matching `query`.
    ///
    /// `page` and `limit` must both be at least 1; defaults and upper bounds
    /// are the caller's concern.
    pub async fn list(&self, page: i64, limit: i64, query: &str) -> CatalogResult<ItemPage> {
        if page < 1 || limit < 1 {
            return Err(DomainError::invalid_input("page and limit must be >= 1").into());
        }
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| DomainError::invalid_input("page out of range"))?;
        let query = query.trim();

        let items = self.repository.list(query, limit, offset).await?;
        let total = self.repository.count(query).await?;

        Ok(ItemPage { items, total })
    }

    pub async fn get(&self, id: ItemId) -> CatalogResult<Item> {
        self.repository.get_by_id(id).await
    }

    /// Validate the fields present in `input` and apply them.
    pub async fn update(&self, id: ItemId, mut input: UpdateItemInput) -> CatalogResult<Item> {
        if !input.has_changes() {
            return Err(DomainError::invalid_input("at least one field is required").into());
        }

        if let Some(name) = input.name.as_mut() {
            *name = name.trim().to_string();
            if !is_valid_name(name) {
                return Err(DomainError::invalid_input("name must not be empty").into());
            }
        }
        if let Some(price) = input.price.take() {
            input.price = Some(Price::parse(&price)?.into_string());
        }
        if let Some(stock) = input.stock {
            if !is_valid_stock(stock) {
                return Err(DomainError::invalid_input("stock must be >= 0").into());
            }
        }

        let item = self.repository.update(id, &input).await?;
        tracing::info!(item_id = %item.id, "item updated");
        Ok(item)
    }

    pub async fn delete(&self, id: ItemId) -> CatalogResult<()> {
        self.repository.delete(id).await?;
        tracing::info!(item_id = %id, "item deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;

    use crate::error::CatalogError;

    /// Records every call and answers from canned results.
    #[derive(Default)]
    struct FakeRepository {
        calls: Mutex<Vec<&'static str>>,
        inserted: Mutex<Option<CreateItemInput>>,
        updated: Mutex<Option<(ItemId, UpdateItemInput)>>,
        listed: Mutex<Option<(String, i64, i64)>>,
        counted: Mutex<Option<String>>,
        fail_with: Option<DomainError>,
        fail_storage: bool,
        total: i64,
    }

    impl FakeRepository {
        fn failing(err: DomainError) -> Self {
            Self {
                fail_with: Some(err),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn outcome(&self, call: &'static str) -> CatalogResult<()> {
            self.calls.lock().unwrap().push(call);
            if let Some(err) = &self.fail_with {
                return Err(err.clone().into());
            }
            if self.fail_storage {
                return Err(CatalogError::storage(anyhow::anyhow!("connection reset")));
            }
            Ok(())
        }
    }

    fn item(name: &str, price: &str, stock: i32) -> Item {
        let now = Utc::now();
        Item {
            id: ItemId::new(),
            name: name.to_string(),
            description: None,
            price: price.to_string(),
            stock,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl ItemRepository for FakeRepository {
        async fn insert(&self, input: &CreateItemInput) -> CatalogResult<Item> {
            self.outcome("insert")?;
            *self.inserted.lock().unwrap() = Some(input.clone());
            Ok(item(&input.name, &input.price, input.stock))
        }

        async fn list(&self, query: &str, limit: i64, offset: i64) -> CatalogResult<Vec<Item>> {
            self.outcome("list")?;
            *self.listed.lock().unwrap() = Some((query.to_string(), limit, offset));
            Ok(vec![item("Phone X", "1.00", 1)])
        }

        async fn count(&self, query: &str) -> CatalogResult<i64> {
            self.outcome("count")?;
            *self.counted.lock().unwrap() = Some(query.to_string());
            Ok(self.total)
        }

        async fn get_by_id(&self, _id: ItemId) -> CatalogResult<Item> {
            self.outcome("get_by_id")?;
            Ok(item("Widget", "1.00", 1))
        }

        async fn update(&self, id: ItemId, input: &UpdateItemInput) -> CatalogResult<Item> {
            self.outcome("update")?;
            *self.updated.lock().unwrap() = Some((id, input.clone()));
            Ok(item("Widget", "1.00", 1))
        }

        async fn delete(&self, _id: ItemId) -> CatalogResult<()> {
            self.outcome("delete")
        }
    }

    fn service(repo: &Arc<FakeRepository>) -> CatalogService {
        CatalogService::new(repo.clone())
    }

    fn create_input(name: &str, price: &str, stock: i32) -> CreateItemInput {
        CreateItemInput {
            name: name.to_string(),
            description: None,
            price: price.to_string(),
            stock,
        }
    }

    #[tokio::test]
    async fn create_trims_before_persisting() {
        let repo = Arc::new(FakeRepository::default());
        let created = service(&repo)
            .create(create_input("  Widget ", " 10.00 ", 3))
            .await
            .unwrap();

        assert_eq!(created.name, "Widget");
        assert_eq!(created.price, "10.00");
        let inserted = repo.inserted.lock().unwrap().clone().unwrap();
        assert_eq!(inserted.name, "Widget");
        assert_eq!(inserted.price, "10.00");
    }

    #[tokio::test]
    async fn create_rejects_invalid_fields_without_touching_storage() {
        let cases = [
            create_input("   ", "10.00", 1),
            create_input("Widget", "", 1),
            create_input("Widget", "0", 1),
            create_input("Widget", "0.00", 1),
            create_input("Widget", "-1.00", 1),
            create_input("Widget", "abc", 1),
            create_input("Widget", "10.00", -1),
        ];

        for input in cases {
            let repo = Arc::new(FakeRepository::default());
            let err = service(&repo).create(input.clone()).await.unwrap_err();
            assert!(
                matches!(err.as_domain(), Some(DomainError::InvalidInput(_))),
                "{input:?}"
            );
            assert!(repo.calls().is_empty(), "{input:?}");
        }
    }

    #[tokio::test]
    async fn create_passes_duplicate_name_through_unchanged() {
        let repo = Arc::new(FakeRepository::failing(DomainError::DuplicateName));
        let err = service(&repo)
            .create(create_input("Widget", "5.00", 1))
            .await
            .unwrap_err();
        assert_eq!(err, DomainError::DuplicateName);
    }

    #[tokio::test]
    async fn storage_failures_stay_unclassified() {
        let repo = Arc::new(FakeRepository {
            fail_storage: true,
            ..Default::default()
        });
        let err = service(&repo)
            .create(create_input("Widget", "5.00", 1))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::Storage(_)));
    }

    #[tokio::test]
    async fn list_computes_offset_and_trims_query() {
        let repo = Arc::new(FakeRepository {
            total: 41,
            ..Default::default()
        });
        let page = service(&repo).list(3, 20, "  phone ").await.unwrap();

        assert_eq!(page.total, 41);
        assert_eq!(page.items.len(), 1);
        assert_eq!(
            repo.listed.lock().unwrap().clone().unwrap(),
            ("phone".to_string(), 20, 40)
        );
        assert_eq!(repo.counted.lock().unwrap().clone().unwrap(), "phone");
    }

    #[tokio::test]
    async fn list_rejects_non_positive_pagination() {
        for (page, limit) in [(0, 10), (1, 0), (-1, 10)] {
            let repo = Arc::new(FakeRepository::default());
            let err = service(&repo).list(page, limit, "").await.unwrap_err();
            assert!(matches!(err.as_domain(), Some(DomainError::InvalidInput(_))));
            assert!(repo.calls().is_empty());
        }
    }

    #[tokio::test]
    async fn list_rejects_overflowing_offset() {
        let repo = Arc::new(FakeRepository::default());
        let err = service(&repo).list(i64::MAX, 100, "").await.unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn update_with_no_fields_never_reaches_storage() {
        let repo = Arc::new(FakeRepository::default());
        let err = service(&repo)
            .update(ItemId::new(), UpdateItemInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err.as_domain(), Some(DomainError::InvalidInput(_))));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn update_validates_only_present_fields() {
        let repo = Arc::new(FakeRepository::default());
        let svc = service(&repo);

        let bad = [
            UpdateItemInput { name: Some("  ".into()), ..Default::default() },
            UpdateItemInput { price: Some("0".into()), ..Default::default() },
            UpdateItemInput { price: Some("".into()), ..Default::default() },
            UpdateItemInput { stock: Some(-5), ..Default::default() },
        ];
        for input in bad {
            let err = svc.update(ItemId::new(), input).await.unwrap_err();
            assert!(matches!(err.as_domain(), Some(DomainError::InvalidInput(_))));
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn update_normalises_and_forwards_description_intent() {
        let repo = Arc::new(FakeRepository::default());
        let id = ItemId::new();
        let input = UpdateItemInput {
            name: Some(" New ".into()),
            price: Some(" 2.5 ".into()),
            description_present: true,
            ..Default::default()
        };

        service(&repo).update(id, input).await.unwrap();

        let (seen_id, seen) = repo.updated.lock().unwrap().clone().unwrap();
        assert_eq!(seen_id, id);
        assert_eq!(seen.name.as_deref(), Some("New"));
        assert_eq!(seen.price.as_deref(), Some("2.5"));
        assert!(seen.description_present);
        assert_eq!(seen.description, None);
    }

    #[tokio::test]
    async fn not_found_is_passed_through_for_get_update_delete() {
        let repo = Arc::new(FakeRepository::failing(DomainError::NotFound));
        let svc = service(&repo);
        let id = ItemId::new();

        assert_eq!(svc.get(id).await.unwrap_err(), DomainError::NotFound);
        let update = UpdateItemInput { stock: Some(1), ..Default::default() };
        assert_eq!(svc.update(id, update).await.unwrap_err(), DomainError::NotFound);
        assert_eq!(svc.delete(id).await.unwrap_err(), DomainError::NotFound);
        assert_eq!(repo.calls(), vec!["get_by_id", "update", "delete"]);
    }

    #[tokio::test]
    async fn update_passes_duplicate_name_through() {
        let repo = Arc::new(FakeRepository::failing(DomainError::DuplicateName));
        let update = UpdateItemInput { name: Some("Taken".into()), ..Default::default() };
        let err = service(&repo).update(ItemId::new(), update).await.unwrap_err();
        assert_eq!(err, DomainError::DuplicateName);
    }
}
