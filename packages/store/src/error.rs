use thiserror::Error;

/// Column protected by a uniqueness constraint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Token,
}

impl std::fmt::Display for UniqueField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::Token => "token",
        })
    }
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    Conflict(UniqueField),
    #[error("record not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(String),
}
