//! Infrastructure layer: DB, config, item storage adapters.

pub mod config;
pub mod db;
pub mod item_store;

pub use config::{AppConfig, ConfigError};
pub use item_store::{InMemoryItemRepository, PostgresItemRepository};
