//! Blocking HTTP client for the LifeDesk API.

use crate::error::{ClientError, ClientResult};
use lifedesk_core::{
    Goal, LoginRequest, Note, OwnedRecord, RecordId, RegisterRequest, Task, TokenResponse, User,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// A record kind reachable under `/<PATH>` on the server.
pub trait RemoteRecord: OwnedRecord {
    const PATH: &'static str;

    /// Local pre-submit check; a failing draft never reaches the server.
    fn check_draft(draft: &Self::Draft) -> ClientResult<()>;
}

fn non_blank(field: &str, value: Option<&str>) -> ClientResult<()> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ClientError::Validation(format!("{field} is required"))),
    }
}

impl RemoteRecord for Task {
    const PATH: &'static str = "tasks";

    fn check_draft(draft: &Self::Draft) -> ClientResult<()> {
        non_blank("title", draft.title.as_deref())
    }
}

impl RemoteRecord for Note {
    const PATH: &'static str = "notes";

    fn check_draft(draft: &Self::Draft) -> ClientResult<()> {
        non_blank("title", draft.title.as_deref())?;
        non_blank("content", draft.content.as_deref())
    }
}

impl RemoteRecord for Goal {
    const PATH: &'static str = "goals";

    fn check_draft(draft: &Self::Draft) -> ClientResult<()> {
        non_blank("title", draft.title.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    msg: String,
}

pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            agent: ureq::Agent::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn health(&self) -> ClientResult<Health> {
        self.send("GET", "health", None::<&()>)
    }

    /// Registers a user and returns the issued token.
    pub fn register(&self, request: &RegisterRequest) -> ClientResult<String> {
        let response: TokenResponse = self.send("POST", "auth/register", Some(request))?;
        Ok(response.token)
    }

    pub fn login(&self, request: &LoginRequest) -> ClientResult<String> {
        let response: TokenResponse = self.send("POST", "auth/login", Some(request))?;
        Ok(response.token)
    }

    pub fn current_user(&self) -> ClientResult<User> {
        self.authed("GET", "auth/user", None::<&()>)
    }

    pub fn list<R: RemoteRecord>(&self) -> ClientResult<Vec<R>> {
        self.authed("GET", R::PATH, None::<&()>)
    }

    pub fn create<R: RemoteRecord>(&self, draft: &R::Draft) -> ClientResult<R> {
        self.authed("POST", R::PATH, Some(draft))
    }

    pub fn update<R: RemoteRecord>(&self, id: RecordId, patch: &R::Patch) -> ClientResult<R> {
        self.authed("PUT", &format!("{}/{id}", R::PATH), Some(patch))
    }

    /// Deletes a record and returns the server's confirmation message.
    pub fn delete<R: RemoteRecord>(&self, id: RecordId) -> ClientResult<String> {
        let body: MessageBody = self.authed("DELETE", &format!("{}/{id}", R::PATH), None::<&()>)?;
        Ok(body.msg)
    }

    fn authed<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: &str,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        if self.token.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        self.send(method, path, body)
    }

    fn send<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: &str,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let url = format!("{}/{path}", self.base_url);
        let mut request = self.agent.request(method, &url);
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Some(body) => request.send_json(body),
            None => request.call(),
        };
        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let msg = response
                    .into_json::<MessageBody>()
                    .map(|body| body.msg)
                    .unwrap_or_else(|_| format!("HTTP {status}"));
                log::warn!(
                    "event=http_call module=client status=error method={method} path={path} http_status={status}"
                );
                return Err(ClientError::Http { status, msg });
            }
            Err(err) => return Err(ClientError::Network(err.to_string())),
        };

        response
            .into_json::<T>()
            .map_err(|err| ClientError::Decode(err.to_string()))
    }
}
