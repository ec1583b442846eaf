use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::*;
use crate::config::ExecutorConfig;
use crate::query::QueryExecutor;

pub fn create_router(config: ExecutorConfig) -> Router {
    let state = AppState {
        executor: Arc::new(QueryExecutor::new(config)),
    };

    Router::new()
        // Query routes
        .route("/execute/", post(execute_query))
        .route("/execute", post(execute_query))
        // Dataset routes
        .route("/schema", get(describe_dataset))
        .route("/health", get(health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
