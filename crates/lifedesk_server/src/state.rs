use crate::error::ApiError;
use lifedesk_core::TokenService;
use log::error;
use rusqlite::Connection;
use std::sync::Mutex;

/// Shared handler state.
///
/// The connection is locked for the synchronous duration of one service
/// call and never held across an `.await`.
pub struct AppState {
    db: Mutex<Connection>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(conn: Connection, tokens: TokenService) -> Self {
        Self {
            db: Mutex::new(conn),
            tokens,
        }
    }

    /// Runs `f` with exclusive access to the connection.
    pub fn with_db<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let conn = self.db.lock().map_err(|_| {
            error!("event=db_lock module=server status=error reason=poisoned");
            ApiError::Server("database lock poisoned".to_string())
        })?;
        f(&conn)
    }
}
