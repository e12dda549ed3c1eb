//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `traits.rs`: the repository seam handlers and services depend on
//! - `sqlite.rs`: SQLite implementation of that seam

pub mod models;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use models::DbAccount;
pub use schema::SQLITE_INIT;
pub use sqlite::{AccountsStorage, SqlitePool};
pub use traits::AccountRepository;
