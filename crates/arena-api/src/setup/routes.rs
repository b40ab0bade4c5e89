//! Route configuration

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

pub fn setup_routes(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route(
            "/challenges/{id}/submissions",
            post(handlers::submission_upload::upload_submission),
        )
        .route(
            "/submissions/{id}/download",
            get(handlers::submission_download::download_submission),
        );

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest(API_PREFIX, api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
}
