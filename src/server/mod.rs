pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::store::PropertyStore;

/// Build the application router with shared store state.
pub fn router(store: Arc<PropertyStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/api/properties", get(routes::list_properties))
        .route("/api/properties/search", get(routes::search_properties))
        .route("/api/scrape-railey", post(routes::scrape_railey))
        .route("/api/scraper-status", get(routes::scraper_status))
        .route("/health", get(routes::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}
