//! Bearer token issuing and verification (HS256 JWT).
//!
//! Tokens carry the user's email and issuance time. When a lifetime is
//! configured they also carry `exp` and verification rejects them once it
//! passes; without one they stay valid for as long as the secret does.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims embedded in every issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds); absent when tokens do not expire.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed: {0}")]
    Malformed(String),
    #[error("token could not be signed: {0}")]
    Signing(String),
}

#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Option<Duration>,
}

/// Stateless signer/verifier. Built once at startup and shared.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<Duration>,
}

impl TokenService {
    pub fn new(cfg: TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match cfg.ttl {
            Some(_) => validation.validate_exp = true,
            None => {
                validation.required_spec_claims.clear();
                validation.validate_exp = false;
            }
        }
        Self {
            encoding: EncodingKey::from_secret(cfg.secret.as_bytes()),
            decoding: DecodingKey::from_secret(cfg.secret.as_bytes()),
            validation,
            ttl: cfg.ttl,
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Sign a token for `email`.
    ///
    /// # Examples
    /// ```
    /// use service::auth::token::{TokenConfig, TokenService};
    /// let tokens = TokenService::new(TokenConfig { secret: "secret".into(), ttl: None });
    /// let token = tokens.issue("a@x.com").unwrap();
    /// assert_eq!(tokens.verify(&token).unwrap().email, "a@x.com");
    /// ```
    pub fn issue(&self, email: &str) -> Result<String, TokenError> {
        let iat = Utc::now().timestamp();
        let exp = match self.ttl {
            Some(ttl) => Some(
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| iat.checked_add(secs))
                    .ok_or_else(|| TokenError::Signing(format!("token lifetime of {}s is out of range", ttl.as_secs())))?,
            ),
            None => None,
        };
        let claims = Claims { email: email.to_string(), iat, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check the signature (and expiry, when configured) and decode the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })
    }
}
