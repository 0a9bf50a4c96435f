//! Credential hashing and identity tokens.
//!
//! # Responsibility
//! - One-way password hashing for the credential store.
//! - Issue and verify signed, time-bound identity tokens.
//!
//! # Invariants
//! - Plaintext passwords are never stored or logged.
//! - Token verification is pure: no storage access, no side effects.

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordHashError};
pub use token::{generate_secret, TokenError, TokenService, DEFAULT_TOKEN_TTL};
