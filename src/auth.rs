//! Stateless session tokens.
//!
//! A token is an HS256-signed JWT carrying the user id and an expiry
//! timestamp. Nothing is stored server side: there is no refresh and no
//! revocation, and issuing a new token leaves earlier ones valid until they
//! expire.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, TOKEN_TTL_HOURS};

/// Authorization schemes accepted in front of a token.
const SCHEMES: [&str; 2] = ["Token", "Bearer"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("no credentials supplied")]
    Missing,
    #[error("invalid token: it's not even a token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("invalid token: signature verification failed")]
    InvalidSignature,
    #[error("failed to sign token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> TokenError {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_)
            | ErrorKind::MissingRequiredClaim(_) => TokenError::Malformed,
            _ => TokenError::InvalidSignature,
        }
    }
}

/// Token payload: `{"user_id": .., "exp": ..}`.
///
/// The expiry goes out under the registered JWT name `exp` rather than
/// `expires_at`, so generic JWT tooling and the library's own expiry check
/// understand it. Other services reading these tokens must use `exp`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub user_id: i32,
    /// Unix timestamp in seconds.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// Issues and verifies session tokens with a fixed signing secret.
#[derive(Clone)]
pub struct TokenService {
    secret: Vec<u8>,
}

impl TokenService {
    pub fn new(secret: impl Into<Vec<u8>>) -> TokenService {
        TokenService {
            secret: secret.into(),
        }
    }

    pub fn from_config(config: &Config) -> TokenService {
        TokenService::new(config.secret.clone())
    }

    /// Signs a token for `user_id` that expires 72 hours after `now`.
    /// The same inputs always produce the same token.
    pub fn issue(&self, user_id: i32, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims {
            user_id,
            expires_at: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn issue_now(&self, user_id: i32) -> Result<String, TokenError> {
        self.issue(user_id, Utc::now())
    }

    /// Resolves a token to its user id against the wall clock. The library
    /// expiry check and the explicit one both apply.
    pub fn verify(&self, token: &str) -> Result<i32, TokenError> {
        let claims = self.decode(token, true)?;
        check_expiry(&claims, Utc::now())
    }

    /// Resolves a token to its user id as of `now`. Only the signature is
    /// checked by the library; expiry is judged against `now` alone, so a
    /// token issued long ago still verifies at a `now` inside its lifetime.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<i32, TokenError> {
        let claims = self.decode(token, false)?;
        check_expiry(&claims, now)
    }

    fn decode(&self, token: &str, validate_exp: bool) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = validate_exp;

        jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            let error = TokenError::from(e);
            tracing::warn!(%error, "rejected token");
            error
        })
    }

    /// Resolves the value of an `authorization` header to a user id.
    pub fn authenticate(&self, header: Option<&str>) -> Result<i32, TokenError> {
        let token = header
            .and_then(token_from_authorization)
            .ok_or(TokenError::Missing)?;
        self.verify(token)
    }
}

fn check_expiry(claims: &Claims, now: DateTime<Utc>) -> Result<i32, TokenError> {
    if claims.expires_at < now.timestamp() {
        tracing::warn!(user_id = claims.user_id, "rejected expired token");
        return Err(TokenError::Expired);
    }
    Ok(claims.user_id)
}

/// Extracts the token from `Token <jwt>` or `Bearer <jwt>`.
pub fn token_from_authorization(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() || !SCHEMES.iter().any(|s| s.eq_ignore_ascii_case(scheme)) {
        return None;
    }
    Some(token)
}
