//! # Web crate: HTTP surface of Jotter
//!
//! An axum application over the `api` services:
//!
//! | Route | Guarded | Handler |
//! |-------|---------|---------|
//! | `GET /`, `GET /home` | no | landing pages |
//! | `GET/POST /register` | no | [`handlers::register`] |
//! | `GET/POST /login` | no | [`handlers::login`], sets the `token` cookie |
//! | `GET /logout` | no | [`handlers::logout`], clears the token and the cookie |
//! | `GET/POST /notes` | yes | [`handlers::notes_page`] / [`handlers::create_note`] |
//! | `GET /view-db` | yes | [`handlers::view_db`] |
//!
//! Guarded routes run behind [`guard::require_login`], which resolves the `token`
//! cookie to a user or redirects to `/login`.

mod app;
pub mod cookies;
mod error;
mod flash;
pub mod guard;
pub mod handlers;
pub mod pages;
pub mod state;

pub use app::router;
pub use error::HttpError;
pub use state::AppState;
