//! Argon2id password hashing.
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`),
//! so the cost parameters travel with each hash and can be raised without
//! invalidating stored credentials.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHashError(String);

impl Display for PasswordHashError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "password hashing failed: {}", self.0)
    }
}

impl Error for PasswordHashError {}

/// Hashes `password` with a fresh random salt and the default Argon2id cost.
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError(err.to_string()))
}

/// Checks `password` against a stored PHC string.
///
/// Unparsable hashes never verify.
pub fn verify_password(password: &str, encoded: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(encoded) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::{hash_password, verify_password};
    use argon2::password_hash::rand_core::OsRng;
    use argon2::password_hash::{PasswordHasher, SaltString};
    use argon2::{Algorithm, Argon2, Params, Version};

    #[test]
    fn hash_verifies_only_the_matching_password() {
        let encoded = hash_password("hunter2").unwrap();
        assert!(encoded.starts_with("$argon2id$"));
        assert!(!encoded.contains("hunter2"));
        assert!(verify_password("hunter2", &encoded));
        assert!(!verify_password("hunter3", &encoded));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let first = hash_password("secret").unwrap();
        let second = hash_password("secret").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_hashes_never_verify() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "plain-text"));
        assert!(!verify_password("x", "$argon2id$v=19$garbage"));
        assert!(!verify_password("x", "pbkdf2-sha256$20000$AAAA$AAAA"));
    }

    #[test]
    fn cost_parameters_are_read_from_the_stored_hash() {
        let params = Params::new(8 * 1024, 1, 1, None).unwrap();
        let cheap = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let encoded = cheap
            .hash_password(b"legacy", &salt)
            .unwrap()
            .to_string();

        assert!(encoded.contains("m=8192,t=1,p=1"));
        assert!(verify_password("legacy", &encoded));
        assert!(!verify_password("legacy2", &encoded));
    }
}
