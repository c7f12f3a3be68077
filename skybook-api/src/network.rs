use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use skybook_core::CoreError;
use skybook_shared::views::{RouteDetailView, RouteListView};
use skybook_shared::{Airport, NewAirport, NewRoute};

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::middleware::{AdminUser, AuthUser};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/airports", get(list_airports).post(create_airport))
        .route("/routes", get(list_routes).post(create_route))
        .route("/routes/{id}", get(get_route))
}

// ============================================================================
// Airports
// ============================================================================

/// GET /api/airport/airports
async fn list_airports(_user: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<Airport>>, AppError> {
    Ok(Json(state.catalog.list_airports().await?))
}

/// POST /api/airport/airports
async fn create_airport(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewAirport>,
) -> Result<(StatusCode, Json<Airport>), AppError> {
    let airport = state.catalog.create_airport(&payload).await?;
    Ok((StatusCode::CREATED, Json(airport)))
}

// ============================================================================
// Routes
// ============================================================================

/// GET /api/airport/routes
async fn list_routes(_user: AuthUser, State(state): State<AppState>) -> Result<Json<Vec<RouteListView>>, AppError> {
    let routes = state.catalog.list_routes().await?;
    Ok(Json(routes.iter().map(RouteListView::from).collect()))
}

/// GET /api/airport/routes/{id}
async fn get_route(
    _user: AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<RouteDetailView>, AppError> {
    let route = state
        .catalog
        .get_route(id)
        .await?
        .ok_or_else(|| CoreError::not_found("route", id))?;
    Ok(Json(RouteDetailView::from(&route)))
}

/// POST /api/airport/routes
async fn create_route(
    _admin: AdminUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewRoute>,
) -> Result<(StatusCode, Json<RouteDetailView>), AppError> {
    let route = state.catalog.create_route(&payload).await?;
    Ok((StatusCode::CREATED, Json(RouteDetailView::from(&route))))
}
