use crate::error::CopydeskError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Salted Argon2id hash in PHC string form.
pub fn hash_password(password: &str) -> Result<String, CopydeskError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// `false` for a wrong password; `Err` only for an unreadable stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, CopydeskError> {
    let parsed = PasswordHash::new(stored_hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original_password() {
        let hash = hash_password("geheim").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("geheim", &hash).unwrap());
        assert!(!verify_password("falsch", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(
            hash_password("geheim").unwrap(),
            hash_password("geheim").unwrap()
        );
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(verify_password("geheim", "plaintext").is_err());
    }
}
