//! Repository contracts and SQLite implementations.
//!
//! # Responsibility
//! - Keep SQL inside the persistence boundary.
//! - Provide one generic owner-scoped record repository; per-kind modules
//!   only describe their table shape.
//!
//! # Invariants
//! - No update statement touches `owner_id`.
//! - Read paths reject invalid persisted state instead of masking it.

pub mod goal_repo;
pub mod note_repo;
pub mod record_repo;
pub mod task_repo;
pub mod user_repo;
