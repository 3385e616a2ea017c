use crate::{domain::User, errors::ApiError};
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// User resolved from the request's session by [`AuthResolutionLayer`].
///
/// Extracting it in a handler is what makes the endpoint require
/// authentication; anonymous requests are rejected with 401.
///
/// [`AuthResolutionLayer`]: super::AuthResolutionLayer
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<CurrentUser>().cloned().ok_or_else(|| {
            tracing::info!("No authenticated user on the request");
            ApiError::Auth
        })
    }
}
