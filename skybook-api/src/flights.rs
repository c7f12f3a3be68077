use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use skybook_core::search::FlightFilter;
use skybook_core::CoreError;
use skybook_shared::views::{FlightDetailView, FlightListView};
use skybook_shared::NewFlight;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::{AdminUser, AuthUser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights", get(list_flights).post(create_flight))
        .route("/flights/{id}", get(get_flight))
}

/// GET /api/airport/flights?departure_time=&arrival_time=&airplane=
async fn list_flights(
    _user: AuthUser,
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<FlightFilter>,
) -> Result<Json<Vec<FlightListView>>, AppError> {
    let flights = state.catalog.list_flights(&filter).await?;
    Ok(Json(flights.iter().map(FlightListView::from).collect()))
}

/// GET /api/airport/flights/{id}
async fn get_flight(
    _user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<FlightDetailView>, AppError> {
    let flight = state
        .catalog
        .get_flight(id)
        .await?
        .ok_or_else(|| CoreError::not_found("flight", id))?;
    Ok(Json(FlightDetailView::from(&flight)))
}

/// POST /api/airport/flights
async fn create_flight(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewFlight>,
) -> Result<(StatusCode, Json<FlightDetailView>), AppError> {
    let flight = state.catalog.create_flight(&payload).await?;
    Ok((StatusCode::CREATED, Json(FlightDetailView::from(&flight))))
}
