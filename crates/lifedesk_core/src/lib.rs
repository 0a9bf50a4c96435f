//! Core domain logic for LifeDesk.
//! This crate is the single source of truth for ownership and validation rules.

pub mod auth;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::{TokenError, TokenService, DEFAULT_TOKEN_TTL};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::goal::{Goal, GoalDraft, GoalPatch};
pub use model::note::{Note, NoteDraft, NotePatch};
pub use model::record::{
    Completable, OwnedRecord, RecordId, RecordValidationError, UserId,
};
pub use model::task::{Category, Task, TaskDraft, TaskPatch};
pub use model::user::{LoginRequest, RegisterRequest, TokenResponse, User, UserCredentials};
pub use repo::goal_repo::SqliteGoalRepository;
pub use repo::note_repo::SqliteNoteRepository;
pub use repo::record_repo::{
    RecordRepository, RecordTable, RepoError, RepoResult, SqliteRecordRepository,
};
pub use repo::task_repo::SqliteTaskRepository;
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use service::auth_service::{
    AuthService, AuthServiceError, AuthServiceResult, LoginAttempt, PendingRegistration,
};
pub use service::record_service::{RecordService, RecordServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
