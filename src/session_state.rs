use anyhow::{Context, Error};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use tower_sessions::Session;
use uuid::Uuid;

pub struct TypedSession(Session);

impl TypedSession {
    const USER_ID_KEY: &'static str = "user_id";
    const AUTHENTICATED_KEY: &'static str = "authenticated";

    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Marks the session as belonging to `user_id`.
    ///
    /// The session id is rotated first so a cookie captured before login
    /// cannot be replayed afterwards.
    pub async fn log_in(&self, user_id: Uuid) -> Result<(), Error> {
        self.0
            .cycle_id()
            .await
            .context("Failed to cycle session id")?;
        self.0
            .insert(Self::USER_ID_KEY, user_id)
            .await
            .context("Failed to insert user id into session")?;
        self.0
            .insert(Self::AUTHENTICATED_KEY, true)
            .await
            .context("Failed to insert authentication flag into session")
    }

    pub async fn log_out(&self) -> Result<(), Error> {
        self.0.flush().await.context("Failed to flush session")
    }

    pub async fn authenticated_user_id(&self) -> Result<Option<Uuid>, Error> {
        let authenticated = self
            .0
            .get::<bool>(Self::AUTHENTICATED_KEY)
            .await
            .context("Failed to retrieve authentication flag from session")?
            .unwrap_or(false);
        if !authenticated {
            return Ok(None);
        }
        self.0
            .get(Self::USER_ID_KEY)
            .await
            .context("Failed to retrieve user id from session")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for TypedSession
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(req: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(req, state).await?;
        Ok(TypedSession(session))
    }
}
