//! Command-line facing client for the LifeDesk API.
//!
//! # Responsibility
//! - Talk to the REST API and keep a persisted login session.
//! - Mirror task, note and goal collections in local panels.

pub mod api;
pub mod error;
pub mod panel;
pub mod session;

pub use api::{ApiClient, Health, RemoteRecord, DEFAULT_SERVER_URL};
pub use error::{ClientError, ClientResult};
pub use panel::{
    note_draft, parse_tags, CategoryFilter, GoalProgress, Panel, RecordBackend, SyncPolicy,
};
pub use session::{Session, SessionStore};
