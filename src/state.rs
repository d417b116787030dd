use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::{
    password::{Argon2Hasher, PasswordHasher},
    repo::{PgUserStore, UserStore},
    services::UserService,
};
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
}

impl AppState {
    pub fn init(config: &AppConfig, db: PgPool) -> anyhow::Result<Self> {
        let store = Arc::new(PgUserStore::new(db)) as Arc<dyn UserStore>;
        let hasher = Arc::new(Argon2Hasher::from_config(&config.hashing)?) as Arc<dyn PasswordHasher>;
        tracing::debug!(
            memory_kib = config.hashing.memory_kib,
            iterations = config.hashing.iterations,
            parallelism = config.hashing.parallelism,
            "argon2 hasher ready"
        );
        Self::from_parts(store, hasher)
    }

    pub fn from_parts(
        store: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            users: Arc::new(UserService::new(store, hasher)?),
        })
    }

    /// In-memory store and cheap hashing; no database needed.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::auth::{password::test_hasher, repo::memory::MemoryUserStore};

        Self::from_parts(Arc::new(MemoryUserStore::default()), Arc::new(test_hasher()))
            .expect("test hasher hashes")
    }
}
