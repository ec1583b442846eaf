use std::sync::Arc;
use std::time::{Duration, Instant};

use datafusion::arrow::record_batch::RecordBatch;
use datafusion::execution::context::SQLOptions;
use datafusion::prelude::SessionContext;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use super::shaper::{shape, ResultSet};
use crate::config::ExecutorConfig;
use crate::dataset::DatasetBinder;
use crate::error::{QueryError, QueryResult};

/// Queries taking longer than this are logged at warn level
const SLOW_QUERY_THRESHOLD_MS: u128 = 1000;

/// Runs one query per call against the configured dataset.
///
/// Every call gets its own engine session with the dataset freshly bound.
/// Nothing is pooled or shared between calls, so a failing query cannot
/// leave state behind for the next one.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    binder: Arc<DatasetBinder>,
    query_timeout: Duration,
}

impl QueryExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self {
            binder: Arc::new(DatasetBinder::new(config.source)),
            query_timeout: config.query_timeout,
        }
    }

    pub fn binder(&self) -> &DatasetBinder {
        &self.binder
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    pub async fn execute(&self, query: &str) -> QueryResult<ResultSet> {
        validate_query(query)?;

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("query", %request_id, relation = self.binder.relation());
        self.execute_validated(query).instrument(span).await
    }

    async fn execute_validated(&self, query: &str) -> QueryResult<ResultSet> {
        tracing::debug!("Executing query: {}", query);
        let start = Instant::now();

        // Run on its own task so a long scan never holds the request task.
        // The guard aborts it on timeout and when this future is dropped.
        let mut task = AbortOnDrop(tokio::spawn(
            run_in_session(self.binder.clone(), query.to_owned()).in_current_span(),
        ));

        let (columns, batches) = match tokio::time::timeout(self.query_timeout, &mut task.0).await {
            Ok(joined) => joined
                .map_err(|e| QueryError::Execution(format!("Query task failed: {}", e)))??,
            Err(_) => {
                return Err(QueryError::Timeout(format!(
                    "Query execution timeout: exceeded {} ms",
                    self.query_timeout.as_millis()
                )));
            }
        };

        let result = shape(columns, &batches)?;
        let elapsed_ms = start.elapsed().as_millis();
        if elapsed_ms >= SLOW_QUERY_THRESHOLD_MS {
            tracing::warn!("Slow query ({} ms): {}", elapsed_ms, query);
        }
        tracing::info!("Query returned {} rows in {} ms", result.row_count(), elapsed_ms);

        Ok(result)
    }
}

/// Owns the engine task. Aborting drops the task's DataFusion streams,
/// which stops execution.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Empty and whitespace-only queries never reach the engine.
fn validate_query(query: &str) -> QueryResult<()> {
    if query.trim().is_empty() {
        return Err(QueryError::Validation("Query must not be empty".to_string()));
    }
    Ok(())
}

/// The dataset is read-only: DDL, DML (including COPY) and session
/// statements are rejected at planning time.
fn read_only_options() -> SQLOptions {
    SQLOptions::new()
        .with_allow_ddl(false)
        .with_allow_dml(false)
        .with_allow_statements(false)
}

async fn run_in_session(
    binder: Arc<DatasetBinder>,
    query: String,
) -> QueryResult<(Vec<String>, Vec<RecordBatch>)> {
    let ctx = SessionContext::new();
    binder.bind(&ctx).await?;

    let df = ctx.sql_with_options(&query, read_only_options()).await?;
    // Taken from the plan so empty results still report their projection.
    let columns = df
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .collect();
    let batches = df.collect().await?;

    Ok((columns, batches))
}
