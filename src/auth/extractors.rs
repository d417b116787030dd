use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use super::error::AuthError;

/// Field-level checks run before a request reaches the service.
pub trait Validate {
    fn validate(&self) -> Result<(), AuthError>;
}

/// JSON body that has been deserialized and validated.
/// Rejections become `AuthError::Validation` so they share the 400 error shape.
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            warn!(reason = %rejection.body_text(), "malformed json body");
            AuthError::Validation(rejection.body_text())
        })?;

        if let Err(e) = value.validate() {
            warn!(error = %e, "request validation failed");
            return Err(e);
        }
        Ok(ValidJson(value))
    }
}
