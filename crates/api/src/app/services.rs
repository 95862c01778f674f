use std::sync::Arc;

use sqlx::PgPool;

use flipstock_auth::{Hs256Jwt, JwtValidator};
use flipstock_infra::{
    ensure_schema, CategoryRepository, InMemoryStore, ItemRepository, PostgresStore,
    UserRepository,
};

use crate::config::AppConfig;

/// Repositories and token service behind trait objects, so routes don't
/// care which backend is wired in.
pub struct AppServices {
    pub items: Arc<dyn ItemRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub jwt: Arc<dyn JwtValidator>,
}

impl AppServices {
    /// In-memory backend (dev/tests; nothing survives a restart).
    pub fn in_memory(jwt_secret: &str) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            items: store.clone(),
            categories: store.clone(),
            users: store,
            jwt: Arc::new(Hs256Jwt::new(jwt_secret.as_bytes())),
        }
    }

    /// Postgres backend; bootstraps the schema on startup.
    pub async fn postgres(database_url: &str, jwt_secret: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        ensure_schema(&pool).await?;

        let store = Arc::new(PostgresStore::new(pool));
        Ok(Self {
            items: store.clone(),
            categories: store.clone(),
            users: store,
            jwt: Arc::new(Hs256Jwt::new(jwt_secret.as_bytes())),
        })
    }
}

/// Select the backend from config.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database_url {
        Some(url) => {
            tracing::info!("using postgres stores");
            AppServices::postgres(url, &config.jwt_secret).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            Ok(AppServices::in_memory(&config.jwt_secret))
        }
    }
}
