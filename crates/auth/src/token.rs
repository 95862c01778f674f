//! HS256 token issue/verify.

use core::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flipstock_core::UserId;

use crate::claims::{validate_claims, Claims, TokenValidationError};

/// Default token lifetime.
const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encode(String),

    /// Bad signature, malformed token, or an unparsable subject.
    #[error("invalid token")]
    Invalid,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Issue and verify bearer tokens.
///
/// Object-safe so the HTTP middleware can hold it as `Arc<dyn JwtValidator>`.
pub trait JwtValidator: Send + Sync {
    fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError>;
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

/// Registered-claim wire format (`sub`/`iat`/`exp`).
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// HS256 (shared-secret) implementation of [`JwtValidator`].
pub struct Hs256Jwt {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Hs256Jwt {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }
}

impl JwtValidator for Hs256Jwt {
    fn issue(&self, user_id: UserId, now: DateTime<Utc>) -> Result<String, TokenError> {
        let wire = WireClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &wire, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // Expiry is checked deterministically below against the supplied
        // clock, not the library's system clock.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let data = jsonwebtoken::decode::<WireClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Invalid)?;

        let sub = UserId::from_str(&data.claims.sub).map_err(|_| TokenError::Invalid)?;
        let issued_at =
            DateTime::<Utc>::from_timestamp(data.claims.iat, 0).ok_or(TokenError::Invalid)?;
        let expires_at =
            DateTime::<Utc>::from_timestamp(data.claims.exp, 0).ok_or(TokenError::Invalid)?;

        let claims = Claims {
            sub,
            issued_at,
            expires_at,
        };
        validate_claims(&claims, now)?;
        Ok(claims)
    }
}
