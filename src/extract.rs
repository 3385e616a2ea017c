use crate::errors::ApiError;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

/// JSON body extractor that rejects malformed or invalid payloads with a 400
/// carrying per-field messages instead of axum's default rejection.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::field("body", e.body_text()))?;

        value
            .validate()
            .map_err(|e| ApiError::Validation(e.into()))?;

        Ok(ValidatedJson(value))
    }
}

/// Uuid path segment extractor; malformed ids are a validation failure,
/// not a routing miss.
pub struct PathId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<Uuid>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::field("id", "must be a valid UUID"))?;

        Ok(PathId(id))
    }
}
