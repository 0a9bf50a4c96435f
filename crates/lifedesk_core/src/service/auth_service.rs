//! Registration, login and identity lookup.
//!
//! # Invariants
//! - Unknown email and wrong password both surface as `InvalidCredentials`.
//! - Token problems of any kind surface as `Unauthenticated`.

use crate::auth::password::{hash_password, verify_password, PasswordHashError};
use crate::auth::token::{TokenError, TokenService};
use crate::model::record::{now_ms, UserId};
use crate::model::user::{normalize_email, LoginRequest, RegisterRequest, User, UserCredentials};
use crate::repo::record_repo::RepoError;
use crate::repo::user_repo::UserRepository;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

#[derive(Debug)]
pub enum AuthServiceError {
    /// A required registration/login field was absent or empty.
    MissingField(&'static str),
    DuplicateEmail,
    InvalidCredentials,
    Unauthenticated,
    Hashing(PasswordHashError),
    /// A token could not be issued.
    Token(TokenError),
    Repo(RepoError),
}

impl Display for AuthServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::DuplicateEmail => write!(f, "user already exists"),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::Unauthenticated => write!(f, "not authenticated"),
            Self::Hashing(err) => write!(f, "{err}"),
            Self::Token(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Hashing(err) => Some(err),
            Self::Token(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for AuthServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict("email") => Self::DuplicateEmail,
            other => Self::Repo(other),
        }
    }
}

impl From<PasswordHashError> for AuthServiceError {
    fn from(value: PasswordHashError) -> Self {
        Self::Hashing(value)
    }
}

pub type AuthServiceResult<T> = Result<T, AuthServiceError>;

/// Authentication use-cases over a credential store and a token service.
pub struct AuthService<'t, U: UserRepository> {
    users: U,
    tokens: &'t TokenService,
}

impl<'t, U: UserRepository> AuthService<'t, U> {
    pub fn new(users: U, tokens: &'t TokenService) -> Self {
        Self { users, tokens }
    }

    /// Creates a user and returns it with a fresh token.
    pub fn register(&self, request: RegisterRequest) -> AuthServiceResult<(User, String)> {
        self.complete_registration(PendingRegistration::prepare(request)?)
    }

    /// Stores an already hashed registration and issues its first token.
    pub fn complete_registration(
        &self,
        pending: PendingRegistration,
    ) -> AuthServiceResult<(User, String)> {
        let credentials = pending.credentials;
        if self.users.find_by_email(&credentials.user.email)?.is_some() {
            warn!("event=auth_register module=auth status=error error_code=duplicate_email");
            return Err(AuthServiceError::DuplicateEmail);
        }
        self.users.create_user(&credentials)?;

        let token = self.issue(credentials.user.id)?;
        info!(
            "event=auth_register module=auth status=ok user_id={}",
            credentials.user.id
        );
        Ok((credentials.user, token))
    }

    /// Exchanges email and password for a token.
    pub fn login(&self, request: LoginRequest) -> AuthServiceResult<String> {
        let attempt = LoginAttempt::parse(request)?;
        let stored = self.users.find_by_email(attempt.email())?;
        let user = attempt.verify(stored)?;

        let token = self.issue(user.id)?;
        info!("event=auth_login module=auth status=ok user_id={}", user.id);
        Ok(token)
    }

    /// Verifies a token and returns the identity it carries.
    pub fn authenticate(&self, token: &str) -> AuthServiceResult<UserId> {
        self.tokens.verify(token).map_err(|err| {
            info!("event=auth_verify module=auth status=error reason={err}");
            AuthServiceError::Unauthenticated
        })
    }

    /// Resolves a token to the stored user.
    ///
    /// A valid token for a user that no longer exists is `Unauthenticated`.
    pub fn current_user(&self, token: &str) -> AuthServiceResult<User> {
        let user_id = self.authenticate(token)?;
        self.users
            .get_user(user_id)?
            .ok_or(AuthServiceError::Unauthenticated)
    }

    fn issue(&self, user_id: UserId) -> AuthServiceResult<String> {
        self.tokens.issue(user_id).map_err(AuthServiceError::Token)
    }
}

/// A validated registration with its password already hashed.
///
/// Preparing one touches no store, so the hashing cost can be paid
/// before any database access.
#[derive(Debug)]
pub struct PendingRegistration {
    credentials: UserCredentials,
}

impl PendingRegistration {
    pub fn prepare(request: RegisterRequest) -> AuthServiceResult<Self> {
        let name = required("name", request.name)?;
        let email = normalize_email(&required("email", request.email)?);
        let password = required("password", request.password)?;

        let user = User {
            id: Uuid::new_v4(),
            name,
            email,
            created_at: now_ms(),
        };
        Ok(Self {
            credentials: UserCredentials {
                password_hash: hash_password(&password)?,
                user,
            },
        })
    }

    pub fn email(&self) -> &str {
        &self.credentials.user.email
    }
}

/// Login input with both fields present and the email normalized.
#[derive(Debug)]
pub struct LoginAttempt {
    email: String,
    password: String,
}

impl LoginAttempt {
    pub fn parse(request: LoginRequest) -> AuthServiceResult<Self> {
        let email = normalize_email(&required("email", request.email)?);
        let password = required("password", request.password)?;
        Ok(Self { email, password })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// Checks the password against the credentials stored for `email()`.
    ///
    /// `None` means no such user and fails the same way a wrong password does.
    pub fn verify(&self, stored: Option<UserCredentials>) -> AuthServiceResult<User> {
        match stored {
            Some(credentials) if verify_password(&self.password, &credentials.password_hash) => {
                Ok(credentials.user)
            }
            _ => {
                warn!("event=auth_login module=auth status=error error_code=invalid_credentials");
                Err(AuthServiceError::InvalidCredentials)
            }
        }
    }
}

fn required(field: &'static str, value: Option<String>) -> AuthServiceResult<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AuthServiceError::MissingField(field)),
    }
}
