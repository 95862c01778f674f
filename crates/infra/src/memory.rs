use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use flipstock_auth::User;
use flipstock_core::{CategoryId, ItemId, UserId};
use flipstock_inventory::{Barcode, Category, Item};

use crate::error::RepositoryError;
use crate::repository::{CategoryRepository, ItemRepository, RepoResult, UserRepository};

/// In-memory store backing all three repositories.
///
/// Intended for tests/dev. Not optimized for performance; uniqueness checks
/// are linear scans, which is fine at personal-inventory scale.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    categories: RwLock<HashMap<CategoryId, Category>>,
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn barcode_taken(
        items: &HashMap<ItemId, Item>,
        user_id: UserId,
        barcode: &Barcode,
        except: Option<ItemId>,
    ) -> bool {
        items.values().any(|item| {
            item.user_id == user_id
                && item.barcode.as_ref() == Some(barcode)
                && Some(item.id) != except
        })
    }
}

#[async_trait]
impl ItemRepository for InMemoryStore {
    async fn create(&self, item: Item) -> RepoResult<Item> {
        let mut items = self.items.write().unwrap();
        if let Some(barcode) = &item.barcode {
            if Self::barcode_taken(&items, item.user_id, barcode, None) {
                return Err(RepositoryError::Duplicate("barcode"));
            }
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Item> {
        self.items
            .read()
            .unwrap()
            .get(&item_id)
            .filter(|item| item.user_id == user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn update(&self, item: Item) -> RepoResult<Item> {
        let mut items = self.items.write().unwrap();
        let exists = items
            .get(&item.id)
            .is_some_and(|existing| existing.user_id == item.user_id);
        if !exists {
            return Err(RepositoryError::NotFound);
        }
        if let Some(barcode) = &item.barcode {
            if Self::barcode_taken(&items, item.user_id, barcode, Some(item.id)) {
                return Err(RepositoryError::Duplicate("barcode"));
            }
        }
        items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn delete(&self, user_id: UserId, item_id: ItemId) -> RepoResult<()> {
        let mut items = self.items.write().unwrap();
        match items.get(&item_id) {
            Some(item) if item.user_id == user_id => {
                items.remove(&item_id);
                Ok(())
            }
            _ => Err(RepositoryError::NotFound),
        }
    }

    async fn delete_many(&self, user_id: UserId, ids: &[ItemId]) -> RepoResult<usize> {
        let mut items = self.items.write().unwrap();
        let mut deleted = 0;
        for id in ids {
            if items
                .get(id)
                .is_some_and(|item| item.user_id == user_id)
            {
                items.remove(id);
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    async fn find_by_barcode(
        &self,
        user_id: UserId,
        barcode: &Barcode,
    ) -> RepoResult<Option<Item>> {
        Ok(self
            .items
            .read()
            .unwrap()
            .values()
            .find(|item| item.user_id == user_id && item.barcode.as_ref() == Some(barcode))
            .cloned())
    }

    async fn list(&self, user_id: UserId, category: Option<CategoryId>) -> RepoResult<Vec<Item>> {
        let mut result: Vec<Item> = self
            .items
            .read()
            .unwrap()
            .values()
            .filter(|item| item.user_id == user_id)
            .filter(|item| category.is_none() || item.category_id == category)
            .cloned()
            .collect();

        // Newest first; id is time-ordered (UUIDv7) and breaks ties.
        result.sort_by(|a, b| {
            (b.created_at, b.id.as_uuid()).cmp(&(a.created_at, a.id.as_uuid()))
        });
        Ok(result)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn create(&self, category: Category) -> RepoResult<Category> {
        let mut categories = self.categories.write().unwrap();
        let taken = categories
            .values()
            .any(|c| c.user_id == category.user_id && c.name == category.name);
        if taken {
            return Err(RepositoryError::Duplicate("category name"));
        }
        categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get(&self, user_id: UserId, category_id: CategoryId) -> RepoResult<Category> {
        self.categories
            .read()
            .unwrap()
            .get(&category_id)
            .filter(|c| c.user_id == user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_name(&self, user_id: UserId, name: &str) -> RepoResult<Option<Category>> {
        Ok(self
            .categories
            .read()
            .unwrap()
            .values()
            .find(|c| c.user_id == user_id && c.name == name)
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> RepoResult<Vec<Category>> {
        let mut result: Vec<Category> = self
            .categories
            .read()
            .unwrap()
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn delete(&self, user_id: UserId, category_id: CategoryId) -> RepoResult<()> {
        let mut categories = self.categories.write().unwrap();
        let exists = categories
            .get(&category_id)
            .is_some_and(|c| c.user_id == user_id);
        if !exists {
            return Err(RepositoryError::NotFound);
        }

        // Detach items before the category disappears.
        let mut items = self.items.write().unwrap();
        for item in items.values_mut() {
            if item.user_id == user_id && item.category_id == Some(category_id) {
                item.category_id = None;
            }
        }

        categories.remove(&category_id);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> RepoResult<User> {
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Duplicate("email"));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get(&self, user_id: UserId) -> RepoResult<User> {
        self.users
            .read()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}
