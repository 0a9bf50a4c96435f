use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status and a `{"msg"}` body.
    #[error("server returned {status}: {msg}")]
    Http { status: u16, msg: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    /// Rejected locally before any request was sent.
    #[error("{0}")]
    Validation(String),
    #[error("not authenticated")]
    NotAuthenticated,
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether the server rejected the caller's token.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Http { status: 401, .. })
    }
}
