//! Use-case services.
//!
//! # Responsibility
//! - Enforce ownership and authentication rules on top of repositories.
//! - Keep the HTTP layer free of storage details.

pub mod auth_service;
pub mod record_service;
