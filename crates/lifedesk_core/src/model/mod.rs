//! Domain model for users and owner-scoped records.
//!
//! # Responsibility
//! - Define the user identity shape and the three record kinds.
//! - Define the request shapes (drafts, patches) shared by server and client.
//!
//! # Invariants
//! - Every record carries exactly one owner, fixed at creation.
//! - Validation beyond required fields is limited to the task category enum
//!   and due-date parsing.

pub mod goal;
pub mod note;
pub mod record;
pub mod task;
pub mod user;
