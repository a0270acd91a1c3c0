use api::auth::{login_required, Access};
use api::User;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::cookies;
use crate::error::HttpError;
use crate::state::AppState;

/// The user resolved from the `token` cookie, available to guarded handlers.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware that only lets requests with a valid token through.
///
/// Anything else is redirected to `/login` before the inner handler runs.
pub async fn require_login(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = cookies::token_from_headers(req.headers());
    let path = req.uri().path().to_string();

    let access = login_required(&state.auth, token.as_deref(), |user| async move {
        req.extensions_mut().insert(CurrentUser(user));
        next.run(req).await
    })
    .await;

    match access {
        Ok(Access::Granted(response)) => response,
        Ok(Access::LoginRequired) => {
            tracing::debug!(path = %path, "Login required");
            Redirect::to("/login").into_response()
        }
        Err(e) => HttpError::from(e).into_response(),
    }
}
