//! # Authentication: credentials, bearer tokens and the login guard
//!
//! [`Authenticator`] ties a [`UserStore`] to the two credential mechanisms:
//!
//! - **Passwords** ([`password`]): Argon2id PHC strings, set once at registration.
//! - **Bearer tokens** ([`token`]): 128 random bits, hex-encoded, issued on login with
//!   a fixed lifetime (24 hours by default). Issuing a token overwrites the previous
//!   one, so a user holds at most one token at a time.
//!
//! Per user the token moves through `no token → active → no token`, leaving the
//! active state on logout ([`Authenticator::logout`]) or when its expiration passes.
//! Validation ([`Authenticator::check_token`]) never writes: an expired token stays
//! stored until it is overwritten or cleared, it is simply not accepted.
//!
//! [`login_required`] wraps a handler so it only runs for a resolved user.

mod guard;
pub mod password;
pub mod token;

use std::sync::Arc;

use chrono::TimeDelta;
use store::{AuthToken, NewUser, User, UserStore};

use crate::clock::{Clock, SystemClock};
use crate::error::{AppError, AuthError};

pub use guard::{login_required, Access};
pub use password::{check_password, hash_password, set_password, verify_password};

/// Longest accepted username, in characters.
pub const MAX_USERNAME_LEN: usize = 80;
/// Longest accepted email, in characters.
pub const MAX_EMAIL_LEN: usize = 120;

/// Registration form values as submitted.
#[derive(Clone, Debug, Default)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Registration {
    fn validate(&self) -> Result<(), AppError> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err(AppError::Validation(
                "Username, email and password are required".to_string(),
            ));
        }
        if username.chars().count() > MAX_USERNAME_LEN {
            return Err(AppError::Validation(format!(
                "Username must be at most {MAX_USERNAME_LEN} characters"
            )));
        }
        if email.chars().count() > MAX_EMAIL_LEN {
            return Err(AppError::Validation(format!(
                "Email must be at most {MAX_EMAIL_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Registration, login and token checks over a user store.
#[derive(Clone)]
pub struct Authenticator<S> {
    store: S,
    clock: Arc<dyn Clock>,
    token_ttl: TimeDelta,
}

impl<S: UserStore> Authenticator<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            token_ttl: TimeDelta::hours(token::DEFAULT_TOKEN_TTL_HOURS),
        }
    }

    /// Builder method to replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builder method to set the lifetime of issued tokens.
    pub fn with_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Create a user. Username is checked for conflicts before email.
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        registration.validate()?;
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();

        if self.store.find_user_by_username(&username).await?.is_some() {
            return Err(AppError::Conflict("This username is already taken".to_string()));
        }
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("This email is already registered".to_string()));
        }

        // No `User` exists yet, so hash into the insert payload directly.
        let password_hash =
            hash_password(&registration.password).map_err(AppError::Password)?;
        let user = self
            .store
            .insert_user(NewUser {
                username,
                email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue a new token.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthToken, AppError> {
        let username = username.trim();
        let Some(user) = self.store.find_user_by_username(username).await? else {
            tracing::warn!(username = %username, "Login rejected: unknown user");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !check_password(&user, password) {
            tracing::warn!(user_id = user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self.generate_token(&user).await?;
        tracing::info!(user_id = user.id, expires_at = %token.expires_at, "User logged in");
        Ok(token)
    }

    /// Issue a token for `user`, invalidating any previous one.
    pub async fn generate_token(&self, user: &User) -> Result<AuthToken, AppError> {
        let token = token::issue(self.clock.now(), self.token_ttl)?;
        self.store.set_token(user.id, Some(&token)).await?;
        Ok(token)
    }

    /// Resolve a token to its user. Unknown, empty and expired tokens resolve to `None`.
    pub async fn check_token(&self, token: &str) -> Result<Option<User>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }
        let Some(user) = self.store.find_user_by_token(token).await? else {
            return Ok(None);
        };
        let now = self.clock.now();
        let valid = user.token.as_ref().is_some_and(|t| t.is_valid_at(now));
        if !valid {
            tracing::debug!(user_id = user.id, "Token expired");
            return Ok(None);
        }
        Ok(Some(user))
    }

    /// Remove the user's token.
    pub async fn clear_token(&self, user: &User) -> Result<(), AppError> {
        self.store.set_token(user.id, None).await?;
        Ok(())
    }

    /// Clear the token held by whoever presents `token`, expired or not.
    pub async fn logout(&self, token: &str) -> Result<Option<User>, AppError> {
        if token.is_empty() {
            return Ok(None);
        }
        let Some(user) = self.store.find_user_by_token(token).await? else {
            return Ok(None);
        };
        self.clear_token(&user).await?;
        tracing::info!(user_id = user.id, "User logged out");
        Ok(Some(user))
    }
}
