//! Signed, time-bound identity tokens.
//!
//! Wire form: `v1.<payload>.<signature>` where `payload` is URL-safe base64
//! of the JSON claims and `signature` is URL-safe base64 of
//! HMAC-SHA256(secret, payload).

use crate::model::record::UserId;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_VERSION_V1: &str = "v1";
const MAX_TOKEN_LEN: usize = 1024;

/// Token lifetime used when none is configured (five days).
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(5 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Not three dot-separated parts, bad base64, or oversized.
    Malformed,
    UnsupportedVersion,
    BadSignature,
    /// Signature valid but claims unreadable.
    InvalidClaims,
    Expired,
    /// Claims could not be encoded or signed.
    Encoding(String),
}

impl Display for TokenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "token is malformed"),
            Self::UnsupportedVersion => write!(f, "token version is not supported"),
            Self::BadSignature => write!(f, "token signature mismatch"),
            Self::InvalidClaims => write!(f, "token claims are invalid"),
            Self::Expired => write!(f, "token has expired"),
            Self::Encoding(details) => write!(f, "token encoding failed: {details}"),
        }
    }
}

impl Error for TokenError {}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
struct TokenClaims {
    sub: UserId,
    /// Issued-at, epoch seconds.
    iat: i64,
    /// Expiry, epoch seconds. Tokens are rejected at or after this instant.
    exp: i64,
}

/// Issues and verifies identity tokens with a shared secret.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    /// Issues a token for `user_id` valid for the configured TTL from now.
    pub fn issue(&self, user_id: UserId) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let ttl_secs = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);
        let iat = now.timestamp();
        let claims = TokenClaims {
            sub: user_id,
            iat,
            exp: iat.saturating_add(ttl_secs),
        };
        let claims_bytes =
            serde_json::to_vec(&claims).map_err(|err| TokenError::Encoding(err.to_string()))?;
        let payload_part = URL_SAFE_NO_PAD.encode(claims_bytes);
        let sig_part = URL_SAFE_NO_PAD.encode(self.sign(payload_part.as_bytes())?);
        Ok(format!("{TOKEN_VERSION_V1}.{payload_part}.{sig_part}"))
    }

    /// Verifies `token` and returns the user it identifies.
    pub fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies `token` as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<UserId, TokenError> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(TokenError::Malformed);
        }
        let (payload_part, sig_part) = parse_token_parts(token)?;

        let signature = URL_SAFE_NO_PAD
            .decode(sig_part)
            .map_err(|_| TokenError::Malformed)?;
        let mut mac = self.mac()?;
        mac.update(payload_part.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(payload_part)
            .map_err(|_| TokenError::Malformed)?;
        let claims: TokenClaims =
            serde_json::from_slice(&claims_bytes).map_err(|_| TokenError::InvalidClaims)?;

        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }
        Ok(claims.sub)
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.secret).map_err(|err| TokenError::Encoding(err.to_string()))
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.mac()?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

fn parse_token_parts(token: &str) -> Result<(&str, &str), TokenError> {
    let parts: Vec<&str> = token.split('.').collect();
    match parts.as_slice() {
        [version, payload, sig] if *version == TOKEN_VERSION_V1 => Ok((payload, sig)),
        [_, _, _] => Err(TokenError::UnsupportedVersion),
        _ => Err(TokenError::Malformed),
    }
}

/// Generates a random 64-character hex secret.
pub fn generate_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}
