//! # API crate: authentication and notes services for Jotter
//!
//! Everything the HTTP layer calls lives here, independent of axum.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Password hashing, bearer token issuance/validation, the [`auth::Authenticator`] service and the [`auth::login_required`] guard |
//! | [`notes`] | The append-only note repository ([`notes::Notes`]) |
//! | [`db`] | SQLite pool lifecycle ([`db::Database`]) and the SQL-backed store ([`db::SqlStore`]) |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, `JOTTER_*` environment) |
//! | [`clock`] | Injectable time source |
//! | [`error`] | [`AppError`] / [`AuthError`] |

pub mod auth;
pub mod clock;
pub mod db;
pub mod error;
pub mod notes;
pub mod settings;

pub use error::{AppError, AuthError};
pub use settings::Settings;
pub use store::{Note, User, UserInfo};
