//! HTTP API for LifeDesk.
//!
//! # Responsibility
//! - Expose registration, login and owner-scoped record CRUD over REST.
//! - Translate core service errors into `{"msg": ...}` responses.
//!
//! # Invariants
//! - Every record route sits behind [`middleware::require_auth`].
//! - Handlers never hold the connection lock across an `.await`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::routing::{get, post, put};
use axum::Router;
use lifedesk_core::auth::generate_secret;
use lifedesk_core::db::{open_db, DbError};
use lifedesk_core::{Goal, Note, Task, TokenService};
use log::{info, warn};
use routes::records::{create_record, delete_record, list_records, update_record};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::sync::Arc;

pub use config::{ConfigError, ServerConfig};
pub use error::ApiError;
pub use state::AppState;

#[derive(Debug)]
pub enum ServeError {
    Config(ConfigError),
    Db(DbError),
    Bind(std::io::Error),
    Io(std::io::Error),
}

impl Display for ServeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::Db(err) => write!(f, "failed to open database: {err}"),
            Self::Bind(err) => write!(f, "failed to bind listener: {err}"),
            Self::Io(err) => write!(f, "server error: {err}"),
        }
    }
}

impl Error for ServeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Bind(err) | Self::Io(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ServeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<DbError> for ServeError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

/// Builds the full route table over `state`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/auth/user", get(routes::auth::current_user))
        .route(
            "/tasks",
            get(list_records::<Task>).post(create_record::<Task>),
        )
        .route(
            "/tasks/:id",
            put(update_record::<Task>).delete(delete_record::<Task>),
        )
        .route(
            "/notes",
            get(list_records::<Note>).post(create_record::<Note>),
        )
        .route(
            "/notes/:id",
            put(update_record::<Note>).delete(delete_record::<Note>),
        )
        .route(
            "/goals",
            get(list_records::<Goal>).post(create_record::<Goal>),
        )
        .route(
            "/goals/:id",
            put(update_record::<Goal>).delete(delete_record::<Goal>),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .merge(protected)
        .layer(axum::middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Validates `config`, opens the database and builds shared state.
pub fn prepare_state(config: &ServerConfig) -> Result<Arc<AppState>, ServeError> {
    config.validate()?;
    let conn = open_db(&config.db_path)?;
    let secret = match &config.token_secret {
        Some(secret) => secret.clone(),
        None => {
            warn!(
                "event=token_secret module=server status=ephemeral reason=not_configured \
                 note=tokens_invalid_after_restart"
            );
            generate_secret()
        }
    };
    let tokens = TokenService::new(secret, config.token_ttl);
    Ok(Arc::new(AppState::new(conn, tokens)))
}

/// Serves the API until Ctrl-C.
pub async fn run(config: ServerConfig) -> Result<(), ServeError> {
    let addr = config.validate()?;
    let state = prepare_state(&config)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(ServeError::Bind)?;
    info!(
        "event=server_start module=server status=ok addr={addr} db={}",
        config.db_path.display()
    );
    serve(listener, state, shutdown_signal()).await
}

/// Serves requests on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServeError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServeError::Io)?;
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("event=server_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
