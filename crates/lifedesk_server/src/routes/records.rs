//! Owner-scoped CRUD handlers shared by `/tasks`, `/notes` and `/goals`.

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use lifedesk_core::{RecordId, RecordService, RecordTable, SqliteRecordRepository};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub msg: String,
}

fn service<R: RecordTable>(
    conn: &rusqlite::Connection,
) -> RecordService<R, SqliteRecordRepository<'_, R>> {
    RecordService::new(SqliteRecordRepository::new(conn))
}

/// Unparsable ids cannot name an existing record.
fn parse_id<R: RecordTable>(raw: &str) -> Result<RecordId, ApiError> {
    raw.parse::<RecordId>().map_err(|_| ApiError::NotFound(R::LABEL))
}

pub async fn list_records<R: RecordTable>(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
) -> Result<Json<Vec<R>>, ApiError> {
    let records = state.with_db(|conn| {
        service::<R>(conn)
            .list(owner)
            .map_err(ApiError::from_record::<R>)
    })?;
    Ok(Json(records))
}

pub async fn create_record<R: RecordTable>(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
    body: Result<Json<R::Draft>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let Json(draft) = body?;
    let record = state.with_db(|conn| {
        service::<R>(conn)
            .create(owner, draft)
            .map_err(ApiError::from_record::<R>)
    })?;
    Ok(Json(record))
}

pub async fn update_record<R: RecordTable>(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
    Path(raw_id): Path<String>,
    body: Result<Json<R::Patch>, JsonRejection>,
) -> Result<Json<R>, ApiError> {
    let id = parse_id::<R>(&raw_id)?;
    let Json(patch) = body?;
    let record = state.with_db(|conn| {
        service::<R>(conn)
            .update(id, owner, patch)
            .map_err(ApiError::from_record::<R>)
    })?;
    Ok(Json(record))
}

pub async fn delete_record<R: RecordTable>(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(owner)): Extension<AuthUser>,
    Path(raw_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id::<R>(&raw_id)?;
    state.with_db(|conn| {
        service::<R>(conn)
            .delete(id, owner)
            .map_err(ApiError::from_record::<R>)
    })?;
    Ok(Json(MessageResponse {
        msg: format!("{} removed", R::LABEL),
    }))
}
