use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{StoreError, UniqueField};
use crate::models::{AuthToken, NewNote, NewUser, Note, User, UserId};
use crate::repo::{NoteStore, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    notes: Vec<Note>,
    next_user_id: UserId,
    next_note_id: i64,
}

/// In-memory store for testing.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Database("memory store lock poisoned".to_string()))
    }
}

impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables()?;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict(UniqueField::Username));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict(UniqueField::Email));
        }
        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            token: None,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_user_by_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .tables()?
            .users
            .iter()
            .find(|u| u.token.as_ref().is_some_and(|t| t.value == token))
            .cloned())
    }

    async fn set_token(&self, user_id: UserId, token: Option<&AuthToken>) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        if let Some(token) = token {
            let taken = tables.users.iter().any(|u| {
                u.id != user_id && u.token.as_ref().is_some_and(|t| t.value == token.value)
            });
            if taken {
                return Err(StoreError::Conflict(UniqueField::Token));
            }
        }
        let user = tables
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(StoreError::NotFound)?;
        user.token = token.cloned();
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.tables()?.users.clone())
    }
}

impl NoteStore for MemoryStore {
    async fn insert_note(&self, note: NewNote) -> Result<Note, StoreError> {
        let mut tables = self.tables()?;
        if !tables.users.iter().any(|u| u.id == note.user_id) {
            return Err(StoreError::NotFound);
        }
        tables.next_note_id += 1;
        let note = Note {
            id: tables.next_note_id,
            user_id: note.user_id,
            title: note.title,
            subtitle: note.subtitle,
            content: note.content,
            created_at: note.created_at,
        };
        tables.notes.push(note.clone());
        Ok(note)
    }

    async fn list_notes_for(&self, user_id: UserId) -> Result<Vec<Note>, StoreError> {
        let mut notes: Vec<Note> = self
            .tables()?
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn list_all_notes(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.tables()?.notes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, Utc};

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let store = MemoryStore::new();

        assert!(store.list_users().await.unwrap().is_empty());

        let alice = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();
        assert_eq!(alice.id, 1);
        assert!(alice.token.is_none());

        let found = store.find_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found, alice);
        let found = store.find_user_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert!(store.find_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let store = MemoryStore::new();
        store.insert_user(new_user("alice", "a@x.com")).await.unwrap();

        let err = store.insert_user(new_user("alice", "other@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Username)));

        let err = store.insert_user(new_user("alicia", "a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Email)));

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_set_and_clear_token() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "b@x.com")).await.unwrap();

        let token = AuthToken {
            value: "abc".to_string(),
            expires_at: Utc::now() + TimeDelta::hours(1),
        };
        store.set_token(alice.id, Some(&token)).await.unwrap();

        let found = store.find_user_by_token("abc").await.unwrap().unwrap();
        assert_eq!(found.id, alice.id);
        assert_eq!(found.token, Some(token.clone()));

        // Token values are unique across users
        let err = store.set_token(bob.id, Some(&token)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(UniqueField::Token)));

        store.set_token(alice.id, None).await.unwrap();
        assert!(store.find_user_by_token("abc").await.unwrap().is_none());

        let err = store.set_token(99, None).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_notes_are_scoped_and_newest_first() {
        let store = MemoryStore::new();
        let alice = store.insert_user(new_user("alice", "a@x.com")).await.unwrap();
        let bob = store.insert_user(new_user("bob", "b@x.com")).await.unwrap();
        let start = Utc::now();

        for (i, title) in ["first", "second", "third"].iter().enumerate() {
            store
                .insert_note(NewNote {
                    user_id: alice.id,
                    title: title.to_string(),
                    subtitle: None,
                    content: "body".to_string(),
                    created_at: start + TimeDelta::seconds(i as i64),
                })
                .await
                .unwrap();
        }

        let notes = store.list_notes_for(alice.id).await.unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, ["third", "second", "first"]);

        assert!(store.list_notes_for(bob.id).await.unwrap().is_empty());
        assert_eq!(store.list_all_notes().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_note_requires_existing_owner() {
        let store = MemoryStore::new();
        let err = store
            .insert_note(NewNote {
                user_id: 42,
                title: "orphan".to_string(),
                subtitle: None,
                content: "body".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        assert!(store.list_all_notes().await.unwrap().is_empty());
    }
}
