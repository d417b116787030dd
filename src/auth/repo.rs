use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::auth::repo_types::{NewUser, User};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Persistence for user records. Emails passed in are expected to be normalized.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool>;
    /// Insert a new user. A unique violation on email maps to `RepoError::DuplicateEmail`.
    async fn save(&self, user: NewUser) -> Result<User, RepoError>;
    async fn find_all(&self) -> anyhow::Result<Vec<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)"#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .context("check user email")?;
        Ok(exists)
    }

    async fn save(&self, user: NewUser) -> Result<User, RepoError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(u) => Ok(u),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(RepoError::DuplicateEmail),
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn find_all(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(rows)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::{RepoError, UserStore};
    use crate::auth::repo_types::{NewUser, User};

    /// In-process store for tests; counts reads and writes.
    #[derive(Default)]
    pub struct MemoryUserStore {
        users: Mutex<Vec<User>>,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl MemoryUserStore {
        pub fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }

        pub fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        pub fn stored(&self) -> Vec<User> {
            self.users.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let users = self.users.lock().unwrap();
            Ok(users.iter().find(|u| u.email == email).cloned())
        }

        async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let users = self.users.lock().unwrap();
            Ok(users.iter().any(|u| u.email == email))
        }

        async fn save(&self, user: NewUser) -> Result<User, RepoError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(RepoError::DuplicateEmail);
            }
            let saved = User {
                id: users.len() as i64 + 1,
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
                created_at: OffsetDateTime::now_utc(),
            };
            users.push(saved.clone());
            Ok(saved)
        }

        async fn find_all(&self) -> anyhow::Result<Vec<User>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.users.lock().unwrap().clone())
        }
    }

    #[tokio::test]
    async fn save_assigns_sequential_ids_and_rejects_duplicates() {
        let store = MemoryUserStore::default();
        let first = store
            .save(NewUser {
                name: "Ann".into(),
                email: "ann@example.com".into(),
                password_hash: "h1".into(),
            })
            .await
            .unwrap();
        let second = store
            .save(NewUser {
                name: "Bob".into(),
                email: "bob@example.com".into(),
                password_hash: "h2".into(),
            })
            .await
            .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let dup = store
            .save(NewUser {
                name: "Ann again".into(),
                email: "ann@example.com".into(),
                password_hash: "h3".into(),
            })
            .await;
        assert!(matches!(dup, Err(RepoError::DuplicateEmail)));
        assert_eq!(store.stored().len(), 2);
    }
}
