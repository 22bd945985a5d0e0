//! `ItemRepository` implementations.
//!
//! - `postgres`: production store over `sqlx::PgPool`
//! - `in_memory`: same observable contract, for tests and local runs
//! - `sql`: statement composition shared by the Postgres store

pub mod in_memory;
pub mod postgres;
pub mod sql;

pub use in_memory::InMemoryItemRepository;
pub use postgres::PostgresItemRepository;
