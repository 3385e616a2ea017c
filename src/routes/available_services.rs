use crate::{app_state::AppState, domain::AvailableService, errors::ApiError, extract::PathId};
use axum::{extract::State, routing::get, Json, Router};

/// Catalog reads are public; subscribing to a service is handled by the
/// authenticated subscription routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/available-services", get(list))
        .route("/api/available-services/:id", get(get_by_id))
}

#[tracing::instrument(name = "List available services", skip(app_state))]
async fn list(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<AvailableService>>, ApiError> {
    Ok(Json(app_state.store.available_services().await?))
}

#[tracing::instrument(name = "Get an available service", skip(app_state), fields(service_id = %id))]
async fn get_by_id(
    State(app_state): State<AppState>,
    PathId(id): PathId,
) -> Result<Json<AvailableService>, ApiError> {
    app_state
        .store
        .available_service(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound("Service"))
}
