//! [`UserStore`] / [`NoteStore`] over the `user` and `note` SQLite tables.
//!
//! Timestamps are stored as UTC microseconds (`INTEGER`) so that `ORDER BY
//! created_at` sorts chronologically.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::FromRow;
use store::{
    AuthToken, NewNote, NewUser, Note, NoteStore, StoreError, UniqueField, User, UserId,
    UserStore,
};

const USER_COLUMNS: &str = "id, username, email, password, token, token_expiration";
const NOTE_COLUMNS: &str = "id, title, subtitle, content, created_at, user_id";

/// Database backed user
#[derive(FromRow)]
struct SqlUser {
    id: i64,
    username: String,
    email: String,
    password: String,
    token: Option<String>,
    token_expiration: Option<i64>,
}

impl SqlUser {
    /// Build a user from a sql user
    fn into_user(self) -> Result<User, StoreError> {
        let token = match (self.token, self.token_expiration) {
            (Some(value), Some(expiration)) => Some(AuthToken {
                value,
                expires_at: from_micros(expiration)?,
            }),
            _ => None,
        };
        Ok(User {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password,
            token,
        })
    }
}

/// Database backed note
#[derive(FromRow)]
struct SqlNote {
    id: i64,
    title: String,
    subtitle: Option<String>,
    content: String,
    created_at: i64,
    user_id: i64,
}

impl SqlNote {
    fn into_note(self) -> Result<Note, StoreError> {
        Ok(Note {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            subtitle: self.subtitle,
            content: self.content,
            created_at: from_micros(self.created_at)?,
        })
    }
}

fn from_micros(micros: i64) -> Result<DateTime<Utc>, StoreError> {
    DateTime::from_timestamp_micros(micros)
        .ok_or_else(|| StoreError::Database(format!("timestamp out of range: {micros}")))
}

fn store_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            let message = db.message();
            let field = if message.contains("user.username") {
                Some(UniqueField::Username)
            } else if message.contains("user.email") {
                Some(UniqueField::Email)
            } else if message.contains("user.token") {
                Some(UniqueField::Token)
            } else {
                None
            };
            if let Some(field) = field {
                return StoreError::Conflict(field);
            }
        }
        if db.is_foreign_key_violation() {
            return StoreError::NotFound;
        }
    }
    StoreError::Database(e.to_string())
}

fn into_users(rows: Vec<SqlUser>) -> Result<Vec<User>, StoreError> {
    rows.into_iter().map(SqlUser::into_user).collect()
}

fn into_notes(rows: Vec<SqlNote>) -> Result<Vec<Note>, StoreError> {
    rows.into_iter().map(SqlNote::into_note).collect()
}

/// SQLite implementation of the storage traits.
#[derive(Clone, Debug)]
pub struct SqlStore {
    pool: SqlitePool,
}

impl SqlStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, StoreError> {
        let row: Option<SqlUser> = sqlx::query_as(&format!(
            r#"SELECT {USER_COLUMNS} FROM "user" WHERE {column} = ?"#
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        row.map(SqlUser::into_user).transpose()
    }
}

impl UserStore for SqlStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let row: SqlUser = sqlx::query_as(&format!(
            r#"INSERT INTO "user" (username, email, password) VALUES (?, ?, ?)
            RETURNING {USER_COLUMNS}"#
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        row.into_user()
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.find_user_where("username", username).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_user_where("email", email).await
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        self.find_user_where("token", token).await
    }

    async fn set_token(&self, user_id: UserId, token: Option<&AuthToken>) -> Result<(), StoreError> {
        let result = sqlx::query(r#"UPDATE "user" SET token = ?, token_expiration = ? WHERE id = ?"#)
            .bind(token.map(|t| t.value.as_str()))
            .bind(token.map(|t| t.expires_at.timestamp_micros()))
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<SqlUser> =
            sqlx::query_as(&format!(r#"SELECT {USER_COLUMNS} FROM "user" ORDER BY id"#))
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        into_users(rows)
    }
}

impl NoteStore for SqlStore {
    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError> {
        let row: SqlNote = sqlx::query_as(&format!(
            "INSERT INTO note (title, subtitle, content, created_at, user_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {NOTE_COLUMNS}"
        ))
        .bind(&note.title)
        .bind(&note.subtitle)
        .bind(&note.content)
        .bind(note.created_at.timestamp_micros())
        .bind(note.user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        row.into_note()
    }

    async fn list_notes_for(&self, user_id: UserId) -> Result<Vec<Note>, StoreError> {
        let rows: Vec<SqlNote> = sqlx::query_as(&format!(
            "SELECT {NOTE_COLUMNS} FROM note WHERE user_id = ?
            ORDER BY created_at DESC, id DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;
        into_notes(rows)
    }

    async fn list_all_notes(&self) -> Result<Vec<Note>, StoreError> {
        let rows: Vec<SqlNote> =
            sqlx::query_as(&format!("SELECT {NOTE_COLUMNS} FROM note ORDER BY id"))
                .fetch_all(&self.pool)
                .await
                .map_err(store_error)?;
        into_notes(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::settings;
    use chrono::TimeDelta;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    fn new_note(user_id: UserId, title: &str, created_at: DateTime<Utc>) -> NewNote {
        NewNote {
            user_id,
            title: title.to_string(),
            subtitle: None,
            content: "body".to_string(),
            created_at,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let store = Database::in_memory().await.unwrap().store();

        let alice = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();
        assert_eq!(alice.username, "alice");
        assert!(alice.token.is_none());

        let by_name = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name, alice);
        let by_email = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email, alice);
        assert!(store.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraints() {
        let store = Database::in_memory().await.unwrap().store();
        store.insert_user(new_user("alice", "a@x.com")).await.unwrap();

        let err = store.insert_user(new_user("alice", "b@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Username)));

        let err = store.insert_user(new_user("bob", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Email)));

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_token_roundtrip() {
        let store = Database::in_memory().await.unwrap().store();
        let alice = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "b@x.com")).await.unwrap();

        let expires_at = DateTime::from_timestamp_micros(Utc::now().timestamp_micros()).unwrap()
            + TimeDelta::hours(24);
        let token = AuthToken {
            value: "0123456789abcdef0123456789abcdef".to_string(),
            expires_at,
        };
        store.set_token(alice.id, Some(&token)).await.unwrap();

        let found = store.find_user_by_token(&token.value).await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert_eq!(found.token, Some(token.clone()));

        let err = store.set_token(bob.id, Some(&token)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Token)));

        store.set_token(alice.id, None).await.unwrap();
        assert!(store.find_user_by_token(&token.value).await.unwrap().is_none());
        let alice = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert!(alice.token.is_none());

        let err = store.set_token(999, None).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_notes_newest_first() {
        let store = Database::in_memory().await.unwrap().store();
        let alice = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "b@x.com")).await.unwrap();
        let start = Utc::now();

        store.insert_note(new_note(alice.id, "old", start)).await.unwrap();
        store
            .insert_note(new_note(alice.id, "new", start + TimeDelta::milliseconds(1500)))
            .await
            .unwrap();
        store
            .insert_note(new_note(alice.id, "middle", start + TimeDelta::seconds(1)))
            .await
            .unwrap();
        store.insert_note(new_note(bob.id, "bob's", start)).await.unwrap();

        let notes = store.list_notes_for(alice.id).await.unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["new", "middle", "old"]);
        assert!(notes.iter().all(|n| n.user_id == alice.id));

        assert_eq!(store.list_notes_for(bob.id).await.unwrap().len(), 1);
        assert_eq!(store.list_all_notes().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_note_requires_existing_owner() {
        let store = Database::in_memory().await.unwrap().store();
        let err = store
            .insert_note(new_note(42, "orphan", Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.list_all_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings::Database {
            url: format!("sqlite://{}", dir.path().join("notes.db").display()),
            max_connections: 2,
        };

        let db = Database::connect(&settings).await.unwrap();
        db.migrate().await.unwrap();
        let alice = db.store().insert_user(new_user("alice", "a@x.com")).await.unwrap();
        db.store()
            .insert_note(new_note(alice.id, "kept", Utc::now()))
            .await
            .unwrap();
        db.close().await;

        let db = Database::connect(&settings).await.unwrap();
        db.migrate().await.unwrap();
        let notes = db.store().list_notes_for(alice.id).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "kept");
        db.close().await;
    }
}
