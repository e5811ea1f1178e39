use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::debug;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{CreateTripRequest, Trip},
    routes::request_id,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trips", post(create_trip))
        .route("/trips/", post(create_trip))
        .route("/trips/:id", get(get_trip))
}

async fn create_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreateTripRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Trip>), AppError> {
    let Json(request) = body.map_err(|rejection| {
        debug!(error = %rejection.body_text(), "rejected trip body");
        AppError::BadRequest("invalid request body".into())
    })?;

    // Requests that skip the request-id middleware still get a correlation id.
    let correlation_id = request_id(&headers)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let trip = state.trips.create_trip(request, &correlation_id).await?;
    Ok((StatusCode::CREATED, Json(trip)))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Trip>, AppError> {
    let id = Uuid::parse_str(&raw_id)
        .map_err(|_| AppError::BadRequest("invalid trip id format".into()))?;
    let trip = state.trips.get_trip(id).await?;
    Ok(Json(trip))
}
