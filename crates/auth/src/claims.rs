use std::collections::HashSet;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use marketerp_core::UserId;

use crate::Module;

/// JWT claims carried by session tokens.
///
/// Timestamps are seconds since the Unix epoch, as registered JWT claims are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,
    pub username: String,
    pub modules: Vec<Module>,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(
        sub: UserId,
        username: impl Into<String>,
        modules: Vec<Module>,
        issued_at: DateTime<Utc>,
        ttl: chrono::Duration,
    ) -> Self {
        Self {
            sub,
            username: username.into(),
            modules,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (iat is in the future)")]
    NotYetValid,

    #[error("invalid token time window (exp <= iat)")]
    InvalidTimeWindow,

    #[error("token signature is invalid")]
    BadSignature,

    #[error("malformed token: {0}")]
    Malformed(String),
}

/// Check the claim time window against `now`.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    let now = now.timestamp();
    if claims.exp <= claims.iat {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.iat {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.exp {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

/// HS256 signer/verifier for [`Claims`].
///
/// The library's own `exp` check is disabled so that expiry is decided by
/// [`validate_claims`] against the caller's clock.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = HashSet::new();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
    }

    pub fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenValidationError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    TokenValidationError::BadSignature
                }
                _ => TokenValidationError::Malformed(e.to_string()),
            })?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}
