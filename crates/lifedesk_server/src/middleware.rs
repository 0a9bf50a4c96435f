use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use lifedesk_core::UserId;
use log::{info, warn};
use std::sync::Arc;
use std::time::Instant;

/// Legacy header sent by older clients.
pub const LEGACY_TOKEN_HEADER: &str = "x-auth-token";

/// Identity of the caller, inserted by [`require_auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub UserId);

/// Extracts the bearer token, preferring `Authorization` over the legacy header.
pub fn token_from_headers(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);
    let legacy = headers
        .get(LEGACY_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);
    bearer.or(legacy).filter(|token| !token.is_empty())
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(token) = token_from_headers(request.headers()) else {
        return Err(ApiError::Unauthenticated);
    };
    let user_id = state.tokens.verify(token).map_err(|err| {
        warn!("event=auth_verify module=server status=error reason={err}");
        ApiError::Unauthenticated
    })?;
    request.extensions_mut().insert(AuthUser(user_id));
    Ok(next.run(request).await)
}

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;
    info!(
        "event=http_request module=server status={} method={method} path={path} elapsed_ms={}",
        response.status().as_u16(),
        started.elapsed().as_millis()
    );
    response
}

#[cfg(test)]
mod tests {
    use super::token_from_headers;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn bearer_header_wins_over_legacy_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-auth-token", HeaderValue::from_static("legacy"));
        assert_eq!(token_from_headers(&headers), Some("legacy"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(token_from_headers(&headers), Some("abc"));
    }

    #[test]
    fn blank_or_non_bearer_values_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(token_from_headers(&headers), None);

        headers.insert("x-auth-token", HeaderValue::from_static("  "));
        assert_eq!(token_from_headers(&headers), None);
    }
}
