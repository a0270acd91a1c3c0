use axum::middleware;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::{SessionManagerLayer, SessionStore};

use crate::guard::require_login;
use crate::handlers;
use crate::state::AppState;

/// Build the application router.
///
/// `/notes` (GET and POST) and `/view-db` sit behind [`require_login`]; the rest is
/// public. `session_store` only backs flash messages.
pub fn router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(state.secure_cookie)
        .with_same_site(SameSite::Lax);

    let protected = Router::new()
        .route("/notes", get(handlers::notes_page).post(handlers::create_note))
        .route("/view-db", get(handlers::view_db))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .route("/", get(handlers::index))
        .route("/home", get(handlers::home))
        .route("/register", get(handlers::register_page).post(handlers::register))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .merge(protected)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
