use lifedesk_client::ClientError;
use lifedesk_server::ServeError;
use thiserror::Error;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Serve(#[from] ServeError),
    #[error("logging: {0}")]
    Logging(String),
    #[error("invalid id `{0}`")]
    InvalidId(String),
    #[error("no config directory available; pass --session-file")]
    NoSessionPath,
    #[error("{0}")]
    Io(#[from] std::io::Error),
}
