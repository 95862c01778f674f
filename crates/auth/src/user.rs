use chrono::{DateTime, Utc};

use flipstock_core::{DomainResult, Entity, UserId};

use crate::credentials::{Credentials, PasswordHash};

/// An account that owns items and categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: PasswordHash,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Register a new account from validated credentials.
    ///
    /// Email uniqueness is enforced by the user repository.
    pub fn register(credentials: &Credentials, now: DateTime<Utc>) -> DomainResult<Self> {
        Ok(Self {
            id: UserId::new(),
            email: credentials.email().to_string(),
            password_hash: PasswordHash::hash(credentials.password())?,
            created_at: now,
        })
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash.verify(password)
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_verify() {
        // MIN_COST keeps the test fast; production hashing uses the default.
        let creds = Credentials::parse("jane@example.com", "hunter2").unwrap();
        let user = User {
            id: UserId::new(),
            email: creds.email().to_string(),
            password_hash: PasswordHash::hash_with_cost(creds.password(), 4)
                .unwrap(),
            created_at: Utc::now(),
        };

        assert!(user.verify_password("hunter2"));
        assert!(!user.verify_password("wrong"));
        assert_eq!(user.email, "jane@example.com");
    }
}
