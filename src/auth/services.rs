use std::sync::Arc;

use anyhow::Context;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::task;
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::UserResponse,
    error::AuthError,
    password::PasswordHasher,
    repo::UserStore,
    repo_types::NewUser,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Uniqueness key for users: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashed once per service so unknown emails cost the same verify as known ones.
const DUMMY_PASSWORD: &str = "login-portal-timing-equalizer";

/// Registration, authentication and listing of users.
pub struct UserService {
    store: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    dummy_hash: String,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> anyhow::Result<Self> {
        let dummy_hash = hasher.hash(DUMMY_PASSWORD).context("hash dummy password")?;
        Ok(Self {
            store,
            hasher,
            dummy_hash,
        })
    }

    /// Argon2 is CPU bound; keep it off the async workers.
    async fn hash(&self, raw_password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let raw_password = raw_password.to_owned();
        let hash = task::spawn_blocking(move || hasher.hash(&raw_password))
            .await
            .context("hash task")??;
        Ok(hash)
    }

    async fn verify(&self, raw_password: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let raw_password = raw_password.to_owned();
        let hash = hash.to_owned();
        let ok = task::spawn_blocking(move || hasher.verify(&raw_password, &hash))
            .await
            .context("verify task")??;
        Ok(ok)
    }

    #[instrument(skip(self, name, raw_password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        raw_password: &str,
    ) -> Result<UserResponse, AuthError> {
        let email = normalize_email(email);

        if self.store.exists_by_email(&email).await? {
            warn!(%email, "email already registered");
            return Err(AuthError::DuplicateEmail);
        }

        let password_hash = self.hash(raw_password).await?;

        // a concurrent registration can still win the race; save reports it as DuplicateEmail
        let user = self
            .store
            .save(NewUser {
                name: name.trim().to_string(),
                email,
                password_hash,
            })
            .await
            .map_err(|e| {
                let e = AuthError::from(e);
                if matches!(e, AuthError::DuplicateEmail) {
                    warn!("email registered concurrently");
                }
                e
            })?;

        info!(user_id = user.id, email = %user.email, "user registered");
        Ok(user.into())
    }

    #[instrument(skip(self, raw_password))]
    pub async fn authenticate(
        &self,
        email: &str,
        raw_password: &str,
    ) -> Result<UserResponse, AuthError> {
        let email = normalize_email(email);

        let Some(user) = self.store.find_by_email(&email).await? else {
            // result ignored: only the time spent matters
            self.verify(raw_password, &self.dummy_hash).await?;
            warn!(%email, "login unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !self.verify(raw_password, &user.password_hash).await? {
            warn!(%email, user_id = user.id, "login invalid password");
            return Err(AuthError::InvalidCredentials);
        }

        info!(user_id = user.id, %email, "user logged in");
        Ok(user.into())
    }

    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AuthError> {
        let users = self.store.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }
}
