//! # Database module: SQLite persistence
//!
//! [`Database`] owns the `sqlx` connection pool. It is opened once at startup
//! ([`Database::connect`] + [`Database::migrate`]), handed to whoever needs it, and
//! closed explicitly at shutdown ([`Database::close`]). Nothing here is a global.
//!
//! [`SqlStore`] implements the `store` crate's `UserStore` and `NoteStore` traits on
//! top of the pool, mapping SQLite constraint failures to `StoreError` variants.
//!
//! The schema lives in `packages/api/migrations/` and is embedded at compile time.

mod pool;
mod sql_store;

pub use pool::Database;
pub use sql_store::SqlStore;
