//! # Note repository
//!
//! [`Notes`] is the only way the application creates or reads notes. Notes are
//! append-only: there is no update or delete. Every note is created on behalf of a
//! [`User`] already resolved by the login guard, and listing is always scoped to
//! that user.

use std::sync::Arc;

use store::{NewNote, Note, NoteStore, User};

use crate::clock::{Clock, SystemClock};
use crate::error::AppError;

/// Longest accepted title, in characters.
pub const MAX_TITLE_LEN: usize = 100;
/// Longest accepted subtitle, in characters.
pub const MAX_SUBTITLE_LEN: usize = 100;

#[derive(Clone)]
pub struct Notes<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: NoteStore> Notes<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Builder method to replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create a note owned by `user`. Title and content are required.
    pub async fn create_note(
        &self,
        user: &User,
        title: &str,
        subtitle: Option<&str>,
        content: &str,
    ) -> Result<Note, AppError> {
        let title = title.trim();
        if title.is_empty() || content.trim().is_empty() {
            return Err(AppError::Validation(
                "Title and content are required".to_string(),
            ));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(AppError::Validation(format!(
                "Title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        let subtitle = subtitle.map(str::trim).filter(|s| !s.is_empty());
        if subtitle.is_some_and(|s| s.chars().count() > MAX_SUBTITLE_LEN) {
            return Err(AppError::Validation(format!(
                "Subtitle must be at most {MAX_SUBTITLE_LEN} characters"
            )));
        }

        let note = self
            .store
            .insert_note(NewNote {
                user_id: user.id,
                title: title.to_string(),
                subtitle: subtitle.map(str::to_string),
                content: content.to_string(),
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(user_id = user.id, note_id = note.id, "Note created");
        Ok(note)
    }

    /// The user's notes, newest first.
    pub async fn list_notes(&self, user: &User) -> Result<Vec<Note>, AppError> {
        Ok(self.store.list_notes_for(user.id).await?)
    }

    /// Every note in the store.
    pub async fn list_all_notes(&self) -> Result<Vec<Note>, AppError> {
        Ok(self.store.list_all_notes().await?)
    }
}
