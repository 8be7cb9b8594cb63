// storefront/src/services/auth_service.rs

//! Password hashing and verification.

use crate::errors::AppError;
use argon2::{
  password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use once_cell::sync::Lazy;
use tracing::{debug, error, instrument};

/// Hash checked when the username is unknown, so both login failures cost one verification.
static DUMMY_HASH: Lazy<Option<String>> =
  Lazy::new(|| hash_password("storefront-dummy-password").ok());

/// Hashes `password` with Argon2 and a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation("Password cannot be empty.".to_string()));
  }

  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing failed: {}", argon_err))
    })
}

/// Checks `provided_password` against a stored Argon2 hash.
///
/// `Ok(false)` means the password does not match; `Err` means the stored hash
/// could not be used at all.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password: &str, provided_password: &str) -> Result<bool, AppError> {
  let parsed_hash = PasswordHash::new(hashed_password).map_err(|parse_err| {
    error!(error = %parse_err, "Stored password hash is malformed.");
    AppError::Internal(format!("Invalid stored password hash: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password mismatch.");
      Ok(false)
    }
    Err(other) => {
      error!(error = %other, "Argon2 password verification failed.");
      Err(AppError::Internal(format!("Password verification failed: {}", other)))
    }
  }
}

/// Verifies against `stored_hash`, or against a fixed dummy hash when there is none.
/// Without a stored hash the result is always `false`.
pub fn verify_password_or_dummy(stored_hash: Option<&str>, provided_password: &str) -> Result<bool, AppError> {
  match stored_hash {
    Some(hash) => verify_password(hash, provided_password),
    None => {
      if let Some(dummy) = DUMMY_HASH.as_deref() {
        let _ = verify_password(dummy, provided_password);
      }
      Ok(false)
    }
  }
}
