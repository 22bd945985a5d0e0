//! Items domain module.
//!
//! Business rules for catalog items: the data model, validation, partial-update
//! resolution and the service that orchestrates them. Storage is reached only
//! through the [`ItemRepository`] trait, so nothing here knows about SQL.

pub mod error;
pub mod item;
pub mod patch;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{CatalogError, CatalogResult};
pub use item::{CreateItemInput, FieldChange, Item, ItemPage, UpdateItemInput};
pub use patch::{KeyPresence, resolve_update};
pub use repository::ItemRepository;
pub use service::CatalogService;
pub use validation::{Price, is_valid_name, is_valid_price, is_valid_stock};
