//! Persisted login session.
//!
//! # Invariants
//! - The stored token is removed on logout and whenever the server rejects it.

use crate::api::ApiClient;
use crate::error::{ClientError, ClientResult};
use lifedesk_core::{LoginRequest, RegisterRequest, User};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
}

/// File-backed token storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored token, if any.
    pub fn load(&self) -> ClientResult<Option<String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let file: SessionFile = serde_json::from_str(&raw)?;
        Ok(Some(file.token).filter(|token| !token.is_empty()))
    }

    pub fn save(&self, token: &str) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body = serde_json::to_string(&SessionFile {
            token: token.to_string(),
        })?;
        fs::write(&self.path, body)?;
        Ok(())
    }

    pub fn clear(&self) -> ClientResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Client plus persisted token and the resolved current user.
pub struct Session {
    client: ApiClient,
    store: SessionStore,
    user: Option<User>,
}

impl Session {
    pub fn new(client: ApiClient, store: SessionStore) -> Self {
        Self {
            client,
            store,
            user: None,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Resumes a stored session.
    ///
    /// A stored token the server rejects is discarded and the call fails
    /// with `NotAuthenticated`. Any other failure keeps the stored token.
    pub fn restore(&mut self) -> ClientResult<&User> {
        let Some(token) = self.store.load()? else {
            return Err(ClientError::NotAuthenticated);
        };
        self.client.set_token(Some(token));
        match self.client.current_user() {
            Ok(user) => {
                info!("event=session_restore module=client status=ok user_id={}", user.id);
                Ok(&*self.user.insert(user))
            }
            Err(err) if err.is_unauthenticated() => {
                warn!("event=session_restore module=client status=rejected error={err}");
                self.drop_token()?;
                Err(ClientError::NotAuthenticated)
            }
            Err(err) => {
                warn!("event=session_restore module=client status=error error={err}");
                self.client.set_token(None);
                Err(err)
            }
        }
    }

    pub fn login(&mut self, email: &str, password: &str) -> ClientResult<&User> {
        let token = self.client.login(&LoginRequest {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        })?;
        self.adopt(token)
    }

    pub fn register(&mut self, name: &str, email: &str, password: &str) -> ClientResult<&User> {
        let token = self.client.register(&RegisterRequest {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        })?;
        self.adopt(token)
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.drop_token()?;
        info!("event=session_logout module=client status=ok");
        Ok(())
    }

    fn adopt(&mut self, token: String) -> ClientResult<&User> {
        self.store.save(&token)?;
        self.client.set_token(Some(token));
        match self.client.current_user() {
            Ok(user) => Ok(&*self.user.insert(user)),
            Err(err) => {
                self.drop_token()?;
                Err(err)
            }
        }
    }

    fn drop_token(&mut self) -> ClientResult<()> {
        self.client.set_token(None);
        self.user = None;
        self.store.clear()
    }
}
