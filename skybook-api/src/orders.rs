use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use skybook_core::search::{Page, PageRequest};
use skybook_shared::views::{TicketDetailView, TicketListView};
use skybook_shared::{NewOrder, Order};

use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::middleware::AuthUser;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/tickets", get(list_tickets))
        .route("/tickets/{id}", get(get_ticket))
}

// ============================================================================
// Orders
// ============================================================================

/// GET /api/airport/orders?page=&page_size=
async fn list_orders(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    AppQuery(params): AppQuery<PageParams>,
) -> Result<Json<Page<Order>>, AppError> {
    let page = PageRequest::new(
        params.page,
        params.page_size,
        state.pagination.default_page_size,
        state.pagination.max_page_size,
    );
    Ok(Json(state.bookings.list_orders(identity.user_id, page).await?))
}

/// POST /api/airport/orders
///
/// All tickets are written or none are.
async fn create_order(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewOrder>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.bookings.place_order(identity.user_id, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// ============================================================================
// Tickets
// ============================================================================

/// GET /api/airport/tickets
async fn list_tickets(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<TicketListView>>, AppError> {
    let tickets = state.bookings.list_tickets(identity.user_id, identity.is_admin()).await?;
    Ok(Json(tickets.iter().map(TicketListView::from).collect()))
}

/// GET /api/airport/tickets/{id}
async fn get_ticket(
    AuthUser(identity): AuthUser,
    State(state): State<AppState>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<TicketDetailView>, AppError> {
    let ticket = state.bookings.get_ticket(identity.user_id, identity.is_admin(), id).await?;
    Ok(Json(TicketDetailView::from(&ticket)))
}
