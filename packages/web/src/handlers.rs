//! Request handlers. Every expected failure (bad form input, taken username, wrong
//! password) becomes a flash message and a redirect; only backend failures reach
//! [`HttpError`] and a 500.

use api::auth::Registration;
use api::{AppError, UserInfo};
use axum::extract::{Form, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Extension;
use serde::Deserialize;
use store::UserStore;
use tower_sessions::Session;

use crate::cookies;
use crate::error::HttpError;
use crate::flash;
use crate::guard::CurrentUser;
use crate::pages;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub content: String,
}

/// Turn a user-facing error into a flash + redirect; pass everything else through.
async fn recover(session: &Session, e: AppError, to: &str) -> Result<Response, HttpError> {
    if !e.is_user_facing() {
        return Err(e.into());
    }
    flash::set(session, e.to_string()).await?;
    Ok(Redirect::to(to).into_response())
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
    pages::index(state.now())
}

pub async fn home(State(state): State<AppState>) -> Html<String> {
    pages::home(state.now())
}

pub async fn register_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, HttpError> {
    let message = flash::take(&session).await?;
    Ok(pages::register(message.as_deref(), state.now()))
}

pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Response, HttpError> {
    let registration = Registration {
        username: form.username,
        email: form.email,
        password: form.password,
    };
    match state.auth.register(registration).await {
        Ok(_) => Ok(Redirect::to("/login").into_response()),
        Err(e) => recover(&session, e, "/register").await,
    }
}

pub async fn login_page(
    State(state): State<AppState>,
    session: Session,
) -> Result<Html<String>, HttpError> {
    let message = flash::take(&session).await?;
    Ok(pages::login(message.as_deref(), state.now()))
}

pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, HttpError> {
    match state.auth.login(&form.username, &form.password).await {
        Ok(token) => {
            let cookie = cookies::token_cookie(token.value, state.secure_cookie);
            Ok((
                [(header::SET_COOKIE, cookie.to_string())],
                Redirect::to("/"),
            )
                .into_response())
        }
        Err(e) => recover(&session, e, "/login").await,
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, HttpError> {
    if let Some(token) = cookies::token_from_headers(&headers) {
        state.auth.logout(&token).await?;
    }
    let cookie = cookies::removal_cookie(state.secure_cookie);
    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Redirect::to("/"),
    )
        .into_response())
}

pub async fn notes_page(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    session: Session,
) -> Result<Html<String>, HttpError> {
    let notes = state.notes.list_notes(&user).await?;
    let message = flash::take(&session).await?;
    Ok(pages::notes(&user, &notes, message.as_deref(), state.now()))
}

pub async fn create_note(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    session: Session,
    Form(form): Form<NoteForm>,
) -> Result<Response, HttpError> {
    let created = state
        .notes
        .create_note(&user, &form.title, form.subtitle.as_deref(), &form.content)
        .await;
    match created {
        Ok(_) => Ok(Redirect::to("/notes").into_response()),
        Err(e) => recover(&session, e, "/notes").await,
    }
}

pub async fn view_db(
    State(state): State<AppState>,
    Extension(CurrentUser(_)): Extension<CurrentUser>,
) -> Result<Html<String>, HttpError> {
    let now = state.now();
    let users: Vec<UserInfo> = state
        .auth
        .store()
        .list_users()
        .await
        .map_err(AppError::from)?
        .iter()
        .map(|u| u.to_info(now))
        .collect();
    let notes = state.notes.list_all_notes().await?;
    Ok(pages::view_db(&users, &notes, now))
}
