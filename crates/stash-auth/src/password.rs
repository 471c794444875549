//! Password hashing and verification

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::error::AuthError;

/// Hash a password with Argon2id and a fresh random salt
///
/// Cost parameters are the library defaults, fixed at build time and never
/// derived from user input. The resulting string embeds algorithm, salt,
/// and parameters.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
///
/// Returns `Ok(false)` for a mismatched password; any other failure
/// (malformed hash, parameter error) surfaces as an error.
pub fn verify_password(password: &str, encoded: &str) -> Result<bool, AuthError> {
    let parsed =
        PasswordHash::new(encoded).map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AuthError::PasswordHash(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("super-secret").unwrap();

        assert!(verify_password("super-secret", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_hash_is_salted() {
        let a = hash_password("super-secret").unwrap();
        let b = hash_password("super-secret").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = verify_password("anything", "not-a-valid-hash");
        assert!(matches!(result, Err(AuthError::PasswordHash(_))));
    }
}
