use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use datafusion::arrow::error::ArrowError;
use datafusion::error::DataFusionError;
use thiserror::Error;

/// Failure of a single query request.
///
/// The `Display` form is the bare message, which is what clients see in
/// the `detail` field. The variant is kept for logging and tests.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Malformed or empty request. The engine is never invoked.
    #[error("{0}")]
    Validation(String),

    /// Dataset file missing, unreadable or not valid Parquet.
    #[error("{0}")]
    Binding(String),

    /// Planning or execution failure reported by the engine.
    #[error("{0}")]
    Execution(String),

    /// Query exceeded the configured execution timeout and was cancelled.
    #[error("{0}")]
    Timeout(String),
}

pub type QueryResult<T> = Result<T, QueryError>;

impl QueryError {
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Validation(_) => "validation",
            QueryError::Binding(_) => "binding",
            QueryError::Execution(_) => "execution",
            QueryError::Timeout(_) => "timeout",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            QueryError::Validation(msg)
            | QueryError::Binding(msg)
            | QueryError::Execution(msg)
            | QueryError::Timeout(msg) => msg,
        }
    }
}

impl serde::Serialize for QueryError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl From<DataFusionError> for QueryError {
    fn from(err: DataFusionError) -> Self {
        QueryError::Execution(err.to_string())
    }
}

impl From<ArrowError> for QueryError {
    fn from(err: ArrowError) -> Self {
        QueryError::Execution(err.to_string())
    }
}

impl IntoResponse for QueryError {
    fn into_response(self) -> Response {
        // Every kind is a client error; the kind only matters for logs.
        let body = serde_json::json!({ "detail": self.message() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}
