use crate::{
    app_state::AppState,
    authentication::CurrentUser,
    domain::{User, UserEmail, UserName},
    errors::ApiError,
    extract::ValidatedJson,
    session_state::TypedSession,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

const PLACEHOLDER_NAME: &str = "User";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

/// Email-based login. The user row is created on first sight; afterwards
/// the stored name wins over whatever the payload carries.
#[tracing::instrument(
    name = "Log in a user",
    skip(app_state, session, payload),
    fields(email = tracing::field::Empty, user_id = tracing::field::Empty)
)]
async fn login(
    State(app_state): State<AppState>,
    session: TypedSession,
    ValidatedJson(payload): ValidatedJson<LoginPayload>,
) -> Result<Json<SessionUser>, ApiError> {
    tracing::Span::current().record("email", tracing::field::display(&payload.email));

    let email = UserEmail::parse(payload.email).map_err(|e| ApiError::field("email", e))?;
    let name = payload.name.unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
    let name = UserName::parse(name).map_err(|e| ApiError::field("name", e))?;

    let user = match app_state.store.user_by_email(&email).await? {
        Some(user) => user,
        None => app_state.store.create_user(&email, &name).await?,
    };

    tracing::Span::current().record("user_id", tracing::field::display(user.id));

    session.log_in(user.id).await.map_err(ApiError::Session)?;

    Ok(Json(SessionUser {
        user,
        authenticated: true,
    }))
}

#[tracing::instrument(name = "Log out a user", skip(session))]
async fn logout(session: TypedSession) -> Result<Json<LogoutResponse>, ApiError> {
    session.log_out().await.map_err(ApiError::Session)?;

    Ok(Json(LogoutResponse {
        message: "Logged out successfully",
        authenticated: false,
    }))
}

#[tracing::instrument(name = "Get the current user", skip(user), fields(user_id = %user.id))]
async fn me(CurrentUser(user): CurrentUser) -> Json<SessionUser> {
    Json(SessionUser {
        user,
        authenticated: true,
    })
}

#[derive(Debug, Deserialize, Validate)]
struct LoginPayload {
    #[validate(email(message = "must be a valid email address"))]
    email: String,
    #[validate(custom = "crate::domain::user_name::validate_user_name")]
    name: Option<String>,
}

#[derive(Serialize)]
struct SessionUser {
    user: User,
    authenticated: bool,
}

#[derive(Serialize)]
struct LogoutResponse {
    message: &'static str,
    authenticated: bool,
}
