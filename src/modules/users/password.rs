use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use crate::shared::error::{AppError, AppResult};

/// Seam for password hashing so handlers never touch the KDF directly.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> AppResult<String>;
    fn verify(&self, stored_hash: &str, password: &str) -> AppResult<bool>;
}

/// Argon2id with default parameters, salted per hash.
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> AppResult<String> {
        if password.is_empty() {
            return Err(AppError::BadRequest("Password cannot be empty".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::InternalServerError(format!("Password hashing failed: {}", e)))
    }

    fn verify(&self, stored_hash: &str, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            AppError::InternalServerError(format!("Invalid stored password hash: {}", e))
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::InternalServerError(format!(
                "Password verification failed: {}",
                e
            ))),
        }
    }
}

/// Random throwaway password for accounts created through an identity
/// provider. The account can only be entered via that provider until the
/// user sets a real password.
pub fn generate_placeholder_password() -> String {
    SaltString::generate(&mut OsRng).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hasher = Argon2Hasher;
        let hash = hasher.hash("pw123456").unwrap();

        assert_ne!(hash, "pw123456");
        assert!(hasher.verify(&hash, "pw123456").unwrap());
        assert!(!hasher.verify(&hash, "wrong").unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let hasher = Argon2Hasher;
        let a = hasher.hash("secret").unwrap();
        let b = hasher.hash("secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn empty_password_is_rejected() {
        let hasher = Argon2Hasher;
        assert!(matches!(
            hasher.hash(""),
            Err(crate::shared::error::AppError::BadRequest(_))
        ));
    }
}
