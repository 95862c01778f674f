//! Postgres-backed repositories.
//!
//! Every query carries `user_id` in its WHERE clause (or the insert row),
//! so cross-user access is impossible at the SQL level. Uniqueness rules
//! live in the schema; violations surface as `RepositoryError::Duplicate`.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use flipstock_auth::{PasswordHash, User};
use flipstock_core::{CategoryId, ItemId, Money, UserId};
use flipstock_inventory::{Barcode, Category, Item};

use crate::error::RepositoryError;
use crate::repository::{CategoryRepository, ItemRepository, RepoResult, UserRepository};

const ITEM_COLUMNS: &str = "id, user_id, category_id, title, brand, size, color, condition, \
     notes, barcode, purchase_source, purchase_price_cents, purchase_date, list_price_cents, \
     photo_path, sold_price_cents, sold_date, created_at, updated_at";

/// Create the tables and indexes if they don't exist yet.
pub async fn ensure_schema(pool: &PgPool) -> RepoResult<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS categories (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            name TEXT NOT NULL,
            UNIQUE (user_id, name)
        )",
        "CREATE TABLE IF NOT EXISTS items (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id),
            category_id UUID REFERENCES categories(id),
            title TEXT NOT NULL,
            brand TEXT,
            size TEXT,
            color TEXT,
            condition TEXT,
            notes TEXT,
            barcode TEXT,
            purchase_source TEXT,
            purchase_price_cents BIGINT NOT NULL DEFAULT 0,
            purchase_date DATE,
            list_price_cents BIGINT,
            photo_path TEXT,
            sold_price_cents BIGINT,
            sold_date DATE,
            created_at TIMESTAMPTZ NOT NULL,
            updated_at TIMESTAMPTZ NOT NULL
        )",
        "CREATE UNIQUE INDEX IF NOT EXISTS items_user_barcode_idx
            ON items (user_id, barcode) WHERE barcode IS NOT NULL",
        "CREATE INDEX IF NOT EXISTS items_user_created_idx
            ON items (user_id, created_at DESC)",
    ];

    for sql in statements {
        sqlx::query(sql).execute(pool).await.map_err(storage)?;
    }
    Ok(())
}

fn storage(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.code().as_deref() == Some("23505"))
}

fn item_from_row(row: &PgRow) -> Result<Item, RepositoryError> {
    let barcode = row
        .try_get::<Option<String>, _>("barcode")
        .map_err(storage)?
        .map(|raw| {
            Barcode::parse(&raw)
                .map_err(|e| RepositoryError::Storage(format!("stored barcode invalid: {e}")))
        })
        .transpose()?;

    Ok(Item {
        id: ItemId::from_uuid(row.try_get("id").map_err(storage)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(storage)?),
        category_id: row
            .try_get::<Option<uuid::Uuid>, _>("category_id")
            .map_err(storage)?
            .map(CategoryId::from_uuid),
        title: row.try_get("title").map_err(storage)?,
        brand: row.try_get("brand").map_err(storage)?,
        size: row.try_get("size").map_err(storage)?,
        color: row.try_get("color").map_err(storage)?,
        condition: row.try_get("condition").map_err(storage)?,
        notes: row.try_get("notes").map_err(storage)?,
        barcode,
        purchase_source: row.try_get("purchase_source").map_err(storage)?,
        purchase_price: Money::from_cents(row.try_get("purchase_price_cents").map_err(storage)?),
        purchase_date: row.try_get("purchase_date").map_err(storage)?,
        list_price: row
            .try_get::<Option<i64>, _>("list_price_cents")
            .map_err(storage)?
            .map(Money::from_cents),
        photo_path: row.try_get("photo_path").map_err(storage)?,
        sold_price: row
            .try_get::<Option<i64>, _>("sold_price_cents")
            .map_err(storage)?
            .map(Money::from_cents),
        sold_date: row.try_get("sold_date").map_err(storage)?,
        created_at: row.try_get("created_at").map_err(storage)?,
        updated_at: row.try_get("updated_at").map_err(storage)?,
    })
}

/// Postgres store backing all three repositories.
///
/// Clones share the underlying `PgPool` (which is itself reference-counted).
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PostgresStore {
    async fn create(&self, item: Item) -> RepoResult<Item> {
        let result = sqlx::query(
            "INSERT INTO items (id, user_id, category_id, title, brand, size, color, condition, \
             notes, barcode, purchase_source, purchase_price_cents, purchase_date, \
             list_price_cents, photo_path, sold_price_cents, sold_date, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, \
             $18, $19)",
        )
        .bind(*item.id.as_uuid())
        .bind(*item.user_id.as_uuid())
        .bind(item.category_id.map(|c| *c.as_uuid()))
        .bind(&item.title)
        .bind(&item.brand)
        .bind(&item.size)
        .bind(&item.color)
        .bind(&item.condition)
        .bind(&item.notes)
        .bind(item.barcode.as_ref().map(|b| b.as_str().to_string()))
        .bind(&item.purchase_source)
        .bind(item.purchase_price.cents())
        .bind(item.purchase_date)
        .bind(item.list_price.map(|p| p.cents()))
        .bind(&item.photo_path)
        .bind(item.sold_price.map(|p| p.cents()))
        .bind(item.sold_date)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(item),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Duplicate("barcode")),
            Err(e) => Err(storage(e)),
        }
    }

    async fn get(&self, user_id: UserId, item_id: ItemId) -> RepoResult<Item> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1 AND user_id = $2");
        let row = sqlx::query(&sql)
            .bind(*item_id.as_uuid())
            .bind(*user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        match row {
            Some(row) => item_from_row(&row),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn update(&self, item: Item) -> RepoResult<Item> {
        let result = sqlx::query(
            "UPDATE items SET category_id = $3, title = $4, brand = $5, size = $6, color = $7, \
             condition = $8, notes = $9, barcode = $10, purchase_source = $11, \
             purchase_price_cents = $12, purchase_date = $13, list_price_cents = $14, \
             photo_path = $15, sold_price_cents = $16, sold_date = $17, updated_at = $18 \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(*item.id.as_uuid())
        .bind(*item.user_id.as_uuid())
        .bind(item.category_id.map(|c| *c.as_uuid()))
        .bind(&item.title)
        .bind(&item.brand)
        .bind(&item.size)
        .bind(&item.color)
        .bind(&item.condition)
        .bind(&item.notes)
        .bind(item.barcode.as_ref().map(|b| b.as_str().to_string()))
        .bind(&item.purchase_source)
        .bind(item.purchase_price.cents())
        .bind(item.purchase_date)
        .bind(item.list_price.map(|p| p.cents()))
        .bind(&item.photo_path)
        .bind(item.sold_price.map(|p| p.cents()))
        .bind(item.sold_date)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => Err(RepositoryError::NotFound),
            Ok(_) => Ok(item),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Duplicate("barcode")),
            Err(e) => Err(storage(e)),
        }
    }

    async fn delete(&self, user_id: UserId, item_id: ItemId) -> RepoResult<()> {
        let done = sqlx::query("DELETE FROM items WHERE id = $1 AND user_id = $2")
            .bind(*item_id.as_uuid())
            .bind(*user_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if done.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn delete_many(&self, user_id: UserId, ids: &[ItemId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let raw_ids: Vec<uuid::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let done = sqlx::query("DELETE FROM items WHERE user_id = $1 AND id = ANY($2)")
            .bind(*user_id.as_uuid())
            .bind(&raw_ids)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        Ok(done.rows_affected() as usize)
    }

    async fn find_by_barcode(
        &self,
        user_id: UserId,
        barcode: &Barcode,
    ) -> RepoResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE user_id = $1 AND barcode = $2");
        let row = sqlx::query(&sql)
            .bind(*user_id.as_uuid())
            .bind(barcode.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?;

        row.map(|row| item_from_row(&row)).transpose()
    }

    async fn list(&self, user_id: UserId, category: Option<CategoryId>) -> RepoResult<Vec<Item>> {
        let rows = match category {
            Some(category_id) => {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items \
                     WHERE user_id = $1 AND category_id = $2 \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query(&sql)
                    .bind(*user_id.as_uuid())
                    .bind(*category_id.as_uuid())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!(
                    "SELECT {ITEM_COLUMNS} FROM items WHERE user_id = $1 \
                     ORDER BY created_at DESC, id DESC"
                );
                sqlx::query(&sql)
                    .bind(*user_id.as_uuid())
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(storage)?;

        rows.iter().map(item_from_row).collect()
    }
}

#[async_trait]
impl CategoryRepository for PostgresStore {
    async fn create(&self, category: Category) -> RepoResult<Category> {
        let result = sqlx::query("INSERT INTO categories (id, user_id, name) VALUES ($1, $2, $3)")
            .bind(*category.id.as_uuid())
            .bind(*category.user_id.as_uuid())
            .bind(&category.name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => Ok(category),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Duplicate("category name")),
            Err(e) => Err(storage(e)),
        }
    }

    async fn get(&self, user_id: UserId, category_id: CategoryId) -> RepoResult<Category> {
        let row =
            sqlx::query("SELECT id, user_id, name FROM categories WHERE id = $1 AND user_id = $2")
                .bind(*category_id.as_uuid())
                .bind(*user_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;

        match row {
            Some(row) => category_from_row(&row),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn find_by_name(&self, user_id: UserId, name: &str) -> RepoResult<Option<Category>> {
        let row =
            sqlx::query("SELECT id, user_id, name FROM categories WHERE user_id = $1 AND name = $2")
                .bind(*user_id.as_uuid())
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage)?;

        row.map(|row| category_from_row(&row)).transpose()
    }

    async fn list(&self, user_id: UserId) -> RepoResult<Vec<Category>> {
        let rows =
            sqlx::query("SELECT id, user_id, name FROM categories WHERE user_id = $1 ORDER BY name ASC")
                .bind(*user_id.as_uuid())
                .fetch_all(&self.pool)
                .await
                .map_err(storage)?;

        rows.iter().map(category_from_row).collect()
    }

    async fn delete(&self, user_id: UserId, category_id: CategoryId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("UPDATE items SET category_id = NULL WHERE user_id = $1 AND category_id = $2")
            .bind(*user_id.as_uuid())
            .bind(*category_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        let done = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(*category_id.as_uuid())
            .bind(*user_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        if done.rows_affected() == 0 {
            // Nothing deleted; leave the detach unapplied as well.
            tx.rollback().await.map_err(storage)?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await.map_err(storage)?;
        Ok(())
    }
}

fn category_from_row(row: &PgRow) -> Result<Category, RepositoryError> {
    Ok(Category {
        id: CategoryId::from_uuid(row.try_get("id").map_err(storage)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(storage)?),
        name: row.try_get("name").map_err(storage)?,
    })
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn create(&self, user: User) -> RepoResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(*user.id.as_uuid())
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(RepositoryError::Duplicate("email")),
            Err(e) => Err(storage(e)),
        }
    }

    async fn get(&self, user_id: UserId) -> RepoResult<User> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(*user_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        match row {
            Some(row) => user_from_row(&row),
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(|row| user_from_row(&row)).transpose()
    }
}

fn user_from_row(row: &PgRow) -> Result<User, RepositoryError> {
    Ok(User {
        id: UserId::from_uuid(row.try_get("id").map_err(storage)?),
        email: row.try_get("email").map_err(storage)?,
        password_hash: PasswordHash::from_stored(row.try_get("password_hash").map_err(storage)?),
        created_at: row.try_get("created_at").map_err(storage)?,
    })
}
