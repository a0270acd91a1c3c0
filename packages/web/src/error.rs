use api::{AppError, AuthError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};

/// An [`AppError`] that escaped a handler.
#[derive(Debug)]
pub struct HttpError(pub AppError);

impl From<AppError> for HttpError {
    fn from(e: AppError) -> Self {
        Self(e)
    }
}

impl From<tower_sessions::session::Error> for HttpError {
    fn from(e: tower_sessions::session::Error) -> Self {
        Self(AppError::Session(e.to_string()))
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AppError::Auth(AuthError::LoginRequired) => {
                return Redirect::to("/login").into_response();
            }
            AppError::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Password(_)
            | AppError::Token(_)
            | AppError::Session(_)
            | AppError::Store(_) => {
                tracing::error!(error = %self.0, "Request failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
                    .into_response();
            }
        };
        (status, self.0.to_string()).into_response()
    }
}
