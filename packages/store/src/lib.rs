pub mod error;
pub mod models;
pub mod repo;

mod memory;
pub use memory::MemoryStore;

pub use error::{StoreError, UniqueField};
pub use models::{
    AuthToken, NewNote, NewUser, Note, NoteId, TokenStatus, User, UserId, UserInfo,
};
pub use repo::{NoteStore, UserStore};
