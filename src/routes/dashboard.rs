use crate::{
    app_state::AppState,
    authentication::CurrentUser,
    errors::ApiError,
    insights::{self, DashboardSummary},
};
use axum::{extract::State, routing::get, Json, Router};
use time::OffsetDateTime;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/dashboard/summary", get(summary))
}

#[tracing::instrument(name = "Get dashboard summary", skip(app_state, user), fields(user_id = %user.id))]
async fn summary(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DashboardSummary>, ApiError> {
    let subscriptions = app_state.scoped_store(&user.email).subscriptions().await?;
    let today = OffsetDateTime::now_utc().date();

    Ok(Json(insights::dashboard_summary(&subscriptions, today)))
}
