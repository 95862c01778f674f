use serde::{Deserialize, Serialize};

use flipstock_core::{CategoryId, DomainError, DomainResult, Entity, UserId};

/// A user-defined grouping of items ("Shoes", "Vintage tees").
///
/// Uniqueness of `(user_id, name)` is enforced by the repository; deleting a
/// category detaches its items rather than deleting them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,
}

impl Category {
    pub fn create(user_id: UserId, name: &str) -> DomainResult<Self> {
        Ok(Self {
            id: CategoryId::new(),
            user_id,
            name: Self::validate_name(name)?,
        })
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = Self::validate_name(name)?;
        Ok(())
    }

    fn validate_name(name: &str) -> DomainResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(name.to_string())
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_trims_name() {
        let c = Category::create(UserId::new(), "  Shoes ").unwrap();
        assert_eq!(c.name, "Shoes");
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = Category::create(UserId::new(), "   ").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rename_validates_too() {
        let mut c = Category::create(UserId::new(), "Shoes").unwrap();
        assert!(c.rename("").is_err());
        c.rename("Sneakers").unwrap();
        assert_eq!(c.name, "Sneakers");
    }
}
