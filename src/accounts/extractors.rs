use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::accounts::{
    dto::Validate,
    error::{AccountError, FieldError},
};

/// JSON body that has been deserialized and passed [`Validate`]. Any body
/// axum cannot decode is reported as a 400 validation failure.
pub struct ValidatedJson<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AccountError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            warn!(error = %e, "request body rejected");
            AccountError::ValidationFailed(vec![FieldError::new("body", e.body_text())])
        })?;

        let valid = value.validate().inspect_err(|e| warn!(error = %e, "request rejected"))?;
        Ok(ValidatedJson(valid))
    }
}
