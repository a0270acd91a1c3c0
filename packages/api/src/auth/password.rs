//! # Password hashing and verification: Argon2id
//!
//! The credential half of a [`User`] record:
//!
//! - [`hash_password`]: generates a random salt via [`OsRng`], hashes the plaintext
//!   password with the default Argon2id parameters, and returns the result as a
//!   PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`). This string is
//!   stored in the `password` column of the `user` table.
//!
//! - [`verify_password`]: parses a PHC-format hash and checks whether the provided
//!   plaintext matches. Returns `Ok(true)` on success, `Ok(false)` on mismatch, or
//!   `Err` if the stored hash is malformed.
//!
//! - [`set_password`] / [`check_password`]: the same two operations phrased against
//!   a [`User`]. `check_password` never fails: a malformed stored hash is logged and
//!   treated as a mismatch.
//!
//! The salt and parameters travel inside the PHC string, and the final comparison
//! is constant time (done by `password-hash`).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use store::User;

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| format!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, String> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| format!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Replace the password hash of an existing user with a fresh hash of `plaintext`.
///
/// This is the reset path for a loaded [`User`]. Registration has no `User` yet
/// and hashes straight into the `NewUser` payload with [`hash_password`].
pub fn set_password(user: &mut User, plaintext: &str) -> Result<(), String> {
    user.password_hash = hash_password(plaintext)?;
    Ok(())
}

/// Check `plaintext` against the user's stored hash.
pub fn check_password(user: &User, plaintext: &str) -> bool {
    match verify_password(plaintext, &user.password_hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::warn!(user_id = user.id, "{}", e);
            false
        }
    }
}
