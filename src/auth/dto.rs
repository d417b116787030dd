use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::{
    error::AuthError,
    extractors::Validate,
    repo_types::User,
    services::is_valid_email,
};

pub const NAME_LEN: std::ops::RangeInclusive<usize> = 3..=50;
pub const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=100;
pub const EMAIL_MAX_LEN: usize = 150;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(alias = "username")]
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
        }
    }
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
    pub message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResponse {
    pub message: &'static str,
    pub token_invalidated: String,
}

fn check_email(email: &str) -> Result<(), AuthError> {
    let email = email.trim();
    if email.len() > EMAIL_MAX_LEN || !is_valid_email(email) {
        return Err(AuthError::Validation("Email must be valid".into()));
    }
    Ok(())
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), AuthError> {
        let name_len = self.name.trim().chars().count();
        if !NAME_LEN.contains(&name_len) {
            return Err(AuthError::Validation(format!(
                "Name must be between {} and {} characters",
                NAME_LEN.start(),
                NAME_LEN.end()
            )));
        }
        check_email(&self.email)?;
        if is_blank(&self.password) || !PASSWORD_LEN.contains(&self.password.chars().count()) {
            return Err(AuthError::Validation(format!(
                "Password must be between {} and {} characters",
                PASSWORD_LEN.start(),
                PASSWORD_LEN.end()
            )));
        }
        Ok(())
    }
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), AuthError> {
        check_email(&self.email)?;
        // No minimum here: a short password is just a wrong password.
        if is_blank(&self.password) {
            return Err(AuthError::Validation("Password must not be blank".into()));
        }
        if self.password.chars().count() > *PASSWORD_LEN.end() {
            return Err(AuthError::Validation(format!(
                "Password must be at most {} characters",
                PASSWORD_LEN.end()
            )));
        }
        Ok(())
    }
}
