//! Bearer token issuance.

use chrono::{DateTime, TimeDelta, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use store::AuthToken;

use crate::error::AppError;

/// Number of random bytes in a token (128 bits).
pub const TOKEN_BYTES: usize = 16;

/// Default lifetime of an issued token, in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Longest configurable token lifetime, in hours (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Generate a hex-encoded random token value.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issue a fresh token valid for `ttl` from `now`.
///
/// Fails when `ttl` is not positive or the expiration is not representable.
pub fn issue(now: DateTime<Utc>, ttl: TimeDelta) -> Result<AuthToken, AppError> {
    if ttl <= TimeDelta::zero() {
        return Err(AppError::Token(format!("lifetime must be positive, got {ttl}")));
    }
    let expires_at = now
        .checked_add_signed(ttl)
        .ok_or_else(|| AppError::Token(format!("expiration out of range for lifetime {ttl}")))?;
    Ok(AuthToken {
        value: generate_token_value(),
        expires_at,
    })
}
