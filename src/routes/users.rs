use crate::{
    app_state::AppState, authentication::CurrentUser, domain::LaunchStats, errors::ApiError,
};
use axum::{extract::State, routing::get, Json, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/users/launch-stats", get(launch_stats))
}

#[tracing::instrument(name = "Get launch stats", skip(app_state, user), fields(user_id = %user.id))]
async fn launch_stats(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<LaunchStats>>, ApiError> {
    let stats = app_state.scoped_store(&user.email).launch_stats().await?;
    Ok(Json(stats))
}
