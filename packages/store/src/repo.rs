//! # Storage traits
//!
//! Every read and write the application performs goes through [`UserStore`] and
//! [`NoteStore`], so the same services run against the in-memory
//! [`crate::MemoryStore`] (unit tests) or the SQLite store in the `api` crate.
//!
//! ## [`UserStore`]
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`insert_user`](UserStore::insert_user) | Persists a [`NewUser`]; fails with [`StoreError::Conflict`] on a duplicate username or email. |
//! | [`find_user_by_username`](UserStore::find_user_by_username) / [`find_user_by_email`](UserStore::find_user_by_email) | Exact-match lookups. |
//! | [`find_user_by_token`](UserStore::find_user_by_token) | Exact match on the token value, regardless of expiration. |
//! | [`set_token`](UserStore::set_token) | Replaces (or clears, with `None`) the user's token in one write. |
//! | [`list_users`](UserStore::list_users) | Every user ordered by id. |
//!
//! ## [`NoteStore`]
//!
//! | Method | Description |
//! |--------|-------------|
//! | [`insert_note`](NoteStore::insert_note) | Persists a [`NewNote`]; the owner must exist. |
//! | [`list_notes_for`](NoteStore::list_notes_for) | A user's notes, newest first (ties by id, newest first). |
//! | [`list_all_notes`](NoteStore::list_all_notes) | Every note ordered by id. |

use std::future::Future;

use crate::error::StoreError;
use crate::models::{AuthToken, NewNote, NewUser, Note, User, UserId};

/// Async access to user records.
pub trait UserStore: Send + Sync {
    fn insert_user(
        &self,
        user: NewUser,
    ) -> impl Future<Output = Result<User, StoreError>> + Send;
    fn find_user_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;
    fn find_user_by_token(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<User>, StoreError>> + Send;
    fn set_token(
        &self,
        user_id: UserId,
        token: Option<&AuthToken>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, StoreError>> + Send;
}

/// Async access to note records.
pub trait NoteStore: Send + Sync {
    fn insert_note(
        &self,
        note: NewNote,
    ) -> impl Future<Output = Result<Note, StoreError>> + Send;
    fn list_notes_for(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<Note>, StoreError>> + Send;
    fn list_all_notes(&self) -> impl Future<Output = Result<Vec<Note>, StoreError>> + Send;
}
