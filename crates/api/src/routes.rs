use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub fn create_api_routes(state: AppState) -> Router {
    Router::new()
        .route("/routes", get(handlers::list_routes))
        .route("/routes", post(handlers::create_route))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
