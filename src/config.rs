use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{QueryError, QueryResult};

pub const DEFAULT_RELATION: &str = "vendas";
pub const DEFAULT_DATASET_PATH: &str = "data/vendas.parquet";

/// Default query execution timeout (30 seconds)
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// A Parquet file and the relation name queries use to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    path: PathBuf,
    relation: String,
}

impl DatasetSource {
    pub fn new(path: impl Into<PathBuf>, relation: impl Into<String>) -> QueryResult<Self> {
        let relation = relation.into();
        validate_relation_name(&relation)?;
        Ok(Self {
            path: path.into(),
            relation,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub source: DatasetSource,
    pub query_timeout: Duration,
}

impl ExecutorConfig {
    pub fn new(source: DatasetSource) -> Self {
        Self {
            source,
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
        }
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}

/// Relation names must survive SQL identifier normalization unquoted,
/// so only lowercase ASCII, digits and underscores are accepted.
fn validate_relation_name(name: &str) -> QueryResult<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_lowercase() || first == '_')
                && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(QueryError::Validation(format!(
            "Invalid relation name '{}': use lowercase letters, digits and underscores",
            name
        )))
    }
}
