//! Repository capabilities.
//!
//! Object-safe async traits so the API can hold `Arc<dyn ItemRepository>`
//! and the domain can be exercised without a database.

use async_trait::async_trait;

use flipstock_auth::User;
use flipstock_core::{CategoryId, ItemId, UserId};
use flipstock_inventory::{Barcode, Category, Item};

use crate::error::RepositoryError;

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Item persistence. Every operation is scoped to the owning user; an item
/// belonging to someone else behaves exactly like a missing one.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a new item. `(user_id, barcode)` must be unique when the
    /// barcode is present.
    async fn create(&self, item: Item) -> RepoResult<Item>;

    async fn get(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Item>;

    /// Persist a modified item (same uniqueness rule as `create`).
    async fn update(&self, item: Item) -> RepoResult<Item>;

    async fn delete(&self, user_id: UserId, item_id: ItemId) -> RepoResult<()>;

    /// Delete several items at once; returns how many were actually removed.
    /// Ids belonging to other users are skipped, not errors.
    async fn delete_many(&self, user_id: UserId, ids: &[ItemId]) -> RepoResult<usize>;

    async fn find_by_barcode(&self, user_id: UserId, barcode: &Barcode)
        -> RepoResult<Option<Item>>;

    /// All of a user's items, newest first, optionally filtered by category.
    async fn list(&self, user_id: UserId, category: Option<CategoryId>) -> RepoResult<Vec<Item>>;
}

/// Category persistence. `(user_id, name)` is unique.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create(&self, category: Category) -> RepoResult<Category>;

    async fn get(&self, user_id: UserId, category_id: CategoryId) -> RepoResult<Category>;

    async fn find_by_name(&self, user_id: UserId, name: &str) -> RepoResult<Option<Category>>;

    /// A user's categories, name ascending.
    async fn list(&self, user_id: UserId) -> RepoResult<Vec<Category>>;

    /// Delete a category, detaching (not deleting) its items first.
    async fn delete(&self, user_id: UserId, category_id: CategoryId) -> RepoResult<()>;
}

/// User account persistence. Emails are unique.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> RepoResult<User>;

    async fn get(&self, user_id: UserId) -> RepoResult<User>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>>;
}
