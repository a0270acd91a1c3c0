//! One-shot messages shown on the next rendered page.

use tower_sessions::Session;

use crate::error::HttpError;

const FLASH_KEY: &str = "flash";

pub async fn set(session: &Session, message: impl Into<String>) -> Result<(), HttpError> {
    session.insert(FLASH_KEY, message.into()).await?;
    Ok(())
}

pub async fn take(session: &Session) -> Result<Option<String>, HttpError> {
    Ok(session.remove::<String>(FLASH_KEY).await?)
}
