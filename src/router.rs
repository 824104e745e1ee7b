use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

/// Build the application router with all routes
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        // Registry routes
        .route(
            "/elements",
            get(handlers::elements::list_elements)
                .post(handlers::elements::upload_elements)
                .delete(handlers::elements::clear_elements),
        )
        .route("/element", post(handlers::elements::create_element))
        .route(
            "/element/:id",
            get(handlers::elements::get_element)
                .put(handlers::elements::update_element)
                .delete(handlers::elements::delete_element),
        )
        // Visualization
        .route("/image", get(handlers::image::get_image))
        // Topology generation
        .route("/topology/generate", post(handlers::topology::generate_topology))
        .route("/health", get(handlers::healthcheck))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
