//! # Domain models for users and notes
//!
//! Defines the records persisted by a [`crate::UserStore`] / [`crate::NoteStore`]
//! backend and the values handed to them on insert.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`User`] | A registered account: unique `username` and `email`, the PHC-format `password_hash`, and the currently issued [`AuthToken`], if any. |
//! | [`AuthToken`] | An opaque bearer token together with its expiration instant. A token never exists without an expiration, so both live in one `Option`. |
//! | [`Note`] | A note owned by exactly one user. Notes are append-only. |
//! | [`NewUser`] / [`NewNote`] | Insert payloads; the backend assigns the identifier. |
//! | [`UserInfo`] | A projection of [`User`] without the password hash or token value, safe to render. |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a [`User`] row.
pub type UserId = i64;

/// Identifier of a [`Note`] row.
pub type NoteId = i64;

/// An issued bearer token and the instant it stops being accepted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    /// Hex-encoded random value, unique across users.
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// A token is accepted strictly before its expiration instant.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Full user record.
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub token: Option<AuthToken>,
}

impl User {
    /// Convert to UserInfo for rendering.
    pub fn to_info(&self, now: DateTime<Utc>) -> UserInfo {
        let token = match &self.token {
            None => TokenStatus::None,
            Some(token) if token.is_valid_at(now) => TokenStatus::Active {
                expires_at: token.expires_at,
            },
            Some(token) => TokenStatus::Expired {
                expired_at: token.expires_at,
            },
        };
        UserInfo {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            token,
        }
    }
}

/// Values needed to create a user.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// A note owned by a single user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Values needed to create a note.
#[derive(Clone, Debug)]
pub struct NewNote {
    pub user_id: UserId,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// State of a user's token as seen at a given instant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TokenStatus {
    None,
    Active { expires_at: DateTime<Utc> },
    Expired { expired_at: DateTime<Utc> },
}

/// User information safe to render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub token: TokenStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn token_expiring_at(expires_at: DateTime<Utc>) -> AuthToken {
        AuthToken {
            value: "00ff".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_token_expiry_boundary() {
        let expires_at = Utc::now();
        let token = token_expiring_at(expires_at);

        assert!(token.is_valid_at(expires_at - TimeDelta::microseconds(1)));
        assert!(!token.is_valid_at(expires_at));
        assert!(!token.is_valid_at(expires_at + TimeDelta::seconds(1)));
    }

    #[test]
    fn test_to_info_hides_secrets() {
        let now = Utc::now();
        let mut user = User {
            id: 7,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            token: None,
        };
        assert_eq!(user.to_info(now).token, TokenStatus::None);

        user.token = Some(token_expiring_at(now + TimeDelta::hours(1)));
        assert!(matches!(user.to_info(now).token, TokenStatus::Active { .. }));

        user.token = Some(token_expiring_at(now));
        assert!(matches!(user.to_info(now).token, TokenStatus::Expired { .. }));

        let info = user.to_info(now);
        assert_eq!(info.username, "alice");
        assert_eq!(info.email, "a@x.com");
    }
}
