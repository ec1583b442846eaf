use axum::{
    extract::{rejection::JsonRejection, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::{
    dataset::ColumnDescriptor,
    error::QueryError,
    query::{QueryExecutor, ResultSet},
};

#[derive(Clone)]
pub struct AppState {
    pub executor: Arc<QueryExecutor>,
}

// ==================== Structs ====================

#[derive(Debug, Deserialize)]
pub struct ExecuteQueryRequest {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct SchemaResponse {
    pub relation: String,
    pub columns: Vec<ColumnDescriptor>,
}

// ==================== Handlers ====================

/// POST /execute/ - run one SQL query against the bound dataset
///
/// Every failure, including a malformed body, is answered with
/// `400 {"detail": "<message>"}`.
pub async fn execute_query(
    State(state): State<AppState>,
    payload: Result<Json<ExecuteQueryRequest>, JsonRejection>,
) -> Result<Json<ResultSet>, QueryError> {
    let Json(req) = payload.map_err(|rejection| QueryError::Validation(rejection.body_text()))?;

    match state.executor.execute(&req.query).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::warn!(kind = e.kind(), "Query failed: {}", e);
            Err(e)
        }
    }
}

/// GET /schema - columns of the bound relation
pub async fn describe_dataset(
    State(state): State<AppState>,
) -> Result<Json<SchemaResponse>, QueryError> {
    let binder = state.executor.binder();
    let columns = binder.describe().await.inspect_err(|e| {
        tracing::warn!(kind = e.kind(), "Describe failed: {}", e);
    })?;

    Ok(Json(SchemaResponse {
        relation: binder.relation().to_string(),
        columns,
    }))
}

pub async fn health_check() -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "askadb-query-engine",
    }))
}
