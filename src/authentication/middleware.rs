use super::extract::CurrentUser;
use crate::{domain::User, session_state::TypedSession, storage::Store};
use anyhow::anyhow;
use axum::http::{Request, Response, StatusCode};
use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};
use tower::{Layer, Service};
use tower_sessions::Session;
use tracing::Instrument;

/// Resolves the session's user once per request and stashes it as a
/// [`CurrentUser`] extension.
///
/// Requests without a valid session pass through as anonymous; whether
/// that is acceptable is decided by each handler's extractors.
#[derive(Clone)]
pub struct AuthResolutionLayer {
    store: Arc<dyn Store>,
}

impl AuthResolutionLayer {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }
}

impl<S> Layer<S> for AuthResolutionLayer {
    type Service = AuthResolution<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthResolution {
            inner,
            store: self.store.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthResolution<S> {
    inner: S,
    store: Arc<dyn Store>,
}

impl<S> AuthResolution<S> {
    fn internal_server_error<ResBody>(error: anyhow::Error) -> Response<ResBody>
    where
        ResBody: Default,
    {
        tracing::error!("{:#?}", error);
        let mut res = Response::default();
        *res.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        res
    }
}

impl<ReqBody, ResBody, S> Service<Request<ReqBody>> for AuthResolution<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let span = tracing::info_span!("resolve_session_user");
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let store = self.store.clone();

        Box::pin(
            async move {
                let Some(session) = req
                    .extensions()
                    .get::<Session>()
                    .cloned()
                    .map(TypedSession::new)
                else {
                    return Ok(Self::internal_server_error(anyhow!("Session not found")));
                };

                match resolve_user(&session, store.as_ref()).await {
                    Ok(Some(user)) => {
                        tracing::info!("User `{}` resolved from session", user.email.as_ref());
                        req.extensions_mut().insert(CurrentUser(user));
                    }
                    Ok(None) => {
                        tracing::debug!("Request carries no authenticated session");
                    }
                    Err(e) => return Ok(Self::internal_server_error(e)),
                };

                inner.call(req).await
            }
            .instrument(span),
        )
    }
}

async fn resolve_user(
    session: &TypedSession,
    store: &dyn Store,
) -> Result<Option<User>, anyhow::Error> {
    let Some(user_id) = session.authenticated_user_id().await? else {
        return Ok(None);
    };
    match store.user_by_id(user_id).await {
        Ok(Some(user)) => Ok(Some(user)),
        Ok(None) => {
            // The account is gone; a lingering cookie must not keep looking
            // authenticated.
            tracing::warn!("User `{user_id}` from session no longer exists");
            flush_best_effort(session).await;
            Ok(None)
        }
        Err(e) => {
            // Fail open to logged-out rather than surfacing a 500 here;
            // protected handlers answer 401 and public ones keep working.
            tracing::warn!("Failed to look up session user `{user_id}`: {e:?}");
            flush_best_effort(session).await;
            Ok(None)
        }
    }
}

async fn flush_best_effort(session: &TypedSession) {
    if let Err(e) = session.log_out().await {
        tracing::warn!("Failed to flush session: {e:?}");
    }
}
