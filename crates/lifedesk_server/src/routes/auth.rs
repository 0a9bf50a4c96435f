//! `/auth/*` handlers.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use lifedesk_core::{
    AuthService, AuthServiceError, AuthServiceResult, LoginAttempt, LoginRequest,
    PendingRegistration, RegisterRequest, SqliteUserRepository, TokenResponse, User,
    UserRepository,
};
use log::info;
use std::sync::Arc;

/// Runs password hashing or verification on the blocking pool.
async fn run_blocking<T: Send + 'static>(
    task: impl FnOnce() -> AuthServiceResult<T> + Send + 'static,
) -> Result<T, ApiError> {
    let result = tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ApiError::Server(format!("password task failed: {err}")))?;
    Ok(result?)
}

/// The password is hashed before the database lock is taken.
pub async fn register(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = body?;
    let pending = run_blocking(move || PendingRegistration::prepare(request)).await?;
    let (_, token) = state.with_db(|conn| {
        let auth = AuthService::new(SqliteUserRepository::new(conn), &state.tokens);
        Ok(auth.complete_registration(pending)?)
    })?;
    Ok(Json(TokenResponse { token }))
}

/// Only the lookup holds the database lock; verification runs after it is released.
pub async fn login(
    State(state): State<Arc<AppState>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(request) = body?;
    let attempt = LoginAttempt::parse(request)?;
    let stored =
        state.with_db(|conn| Ok(SqliteUserRepository::new(conn).find_by_email(attempt.email())?))?;
    let user = run_blocking(move || attempt.verify(stored)).await?;
    let token = state.tokens.issue(user.id).map_err(AuthServiceError::Token)?;
    info!("event=auth_login module=server status=ok user_id={}", user.id);
    Ok(Json(TokenResponse { token }))
}

/// A token for a user that no longer exists is treated as unauthenticated.
pub async fn current_user(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<User>, ApiError> {
    let user = state.with_db(|conn| {
        SqliteUserRepository::new(conn)
            .get_user(user_id)
            .map_err(|err| ApiError::Server(err.to_string()))
    })?;
    user.map(Json).ok_or(ApiError::Unauthenticated)
}
