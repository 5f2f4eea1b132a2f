//! Database module: the account model and its SQLite storage.
//!
//! Layout:
//! - `models.rs`: `Account` row and the `Role` enumeration
//! - `schema.rs`: SQL DDL for the `users` table
//! - `sqlite.rs`: `UserStore`, one connection per operation

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{Account, Role};
pub use schema::SQLITE_INIT;
pub use sqlite::UserStore;
