use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use flipstock_core::UserId;

/// Token claims model (transport-agnostic).
///
/// This is the minimal set of claims the API expects once a token has been
/// decoded and its signature verified by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user.
    pub sub: UserId,

    /// Issued-at timestamp.
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate token claims against a supplied clock.
///
/// Signature verification is intentionally outside this function; passing
/// `now` explicitly keeps expiry checks reproducible in tests.
pub fn validate_claims(claims: &Claims, now: DateTime<Utc>) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn claims_at(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Claims {
        Claims {
            sub: UserId::new(),
            issued_at,
            expires_at,
        }
    }

    #[test]
    fn accepts_claims_inside_the_window() {
        let now = Utc::now();
        let claims = claims_at(now - Duration::minutes(5), now + Duration::minutes(5));
        assert!(validate_claims(&claims, now).is_ok());
    }

    #[test]
    fn rejects_expired_claims() {
        let now = Utc::now();
        let claims = claims_at(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, now).unwrap_err(),
            TokenValidationError::Expired
        );
    }

    #[test]
    fn rejects_claims_issued_in_the_future() {
        let now = Utc::now();
        let claims = claims_at(now + Duration::minutes(1), now + Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, now).unwrap_err(),
            TokenValidationError::NotYetValid
        );
    }

    #[test]
    fn rejects_inverted_time_windows() {
        let now = Utc::now();
        let claims = claims_at(now, now - Duration::minutes(1));
        assert_eq!(
            validate_claims(&claims, now).unwrap_err(),
            TokenValidationError::InvalidTimeWindow
        );
    }
}
