use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod extract;
pub mod fleet;
pub mod flights;
pub mod middleware;
pub mod network;
pub mod orders;
pub mod state;

pub use state::AppState;

pub const API_PREFIX: &str = "/api/airport";

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    let api = Router::new()
        .merge(network::routes())
        .merge(fleet::routes())
        .merge(flights::routes())
        .merge(orders::routes())
        .route_layer(axum::middleware::from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .nest(API_PREFIX, api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
