//! Login credentials and password hashing.

use flipstock_core::{DomainError, DomainResult, ValueObject};

/// Validated registration/login input.
///
/// Email addresses are trimmed and lowercased so `Jane@Example.com` and
/// `jane@example.com` are the same account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn parse(email: &str, password: &str) -> DomainResult<Self> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("a valid email address is required"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// A bcrypt password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash with the default bcrypt cost.
    pub fn hash(password: &str) -> DomainResult<Self> {
        Self::hash_with_cost(password, bcrypt::DEFAULT_COST)
    }

    /// Hash with an explicit cost. Tests use the minimum cost; production
    /// callers go through [`PasswordHash::hash`].
    pub fn hash_with_cost(password: &str, cost: u32) -> DomainResult<Self> {
        bcrypt::hash(password, cost)
            .map(Self)
            .map_err(|e| DomainError::invariant(format!("password hashing failed: {e}")))
    }

    /// Wrap a hash loaded from storage.
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// Verify a candidate password. Malformed stored hashes verify as false.
    pub fn verify(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.0).unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for PasswordHash {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_email() {
        let creds = Credentials::parse("  Jane@Example.COM ", "hunter2").unwrap();
        assert_eq!(creds.email(), "jane@example.com");
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(Credentials::parse("", "hunter2").is_err());
        assert!(Credentials::parse("not-an-email", "hunter2").is_err());
        assert!(Credentials::parse("jane@example.com", "").is_err());
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = PasswordHash::hash_with_cost("hunter2", 4).unwrap();
        assert!(hash.verify("hunter2"));
        assert!(!hash.verify("wrong"));
    }

    #[test]
    fn malformed_stored_hash_never_verifies() {
        let hash = PasswordHash::from_stored("not-a-bcrypt-hash".to_string());
        assert!(!hash.verify("anything"));
    }
}
