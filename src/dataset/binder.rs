use std::io::ErrorKind;

use datafusion::prelude::{ParquetReadOptions, SessionContext};
use serde::Serialize;

use crate::config::DatasetSource;
use crate::error::{QueryError, QueryResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
}

/// Makes the configured Parquet file visible as a named relation inside an
/// engine session. Registration only reads the file footer.
#[derive(Debug, Clone)]
pub struct DatasetBinder {
    source: DatasetSource,
}

impl DatasetBinder {
    pub fn new(source: DatasetSource) -> Self {
        Self { source }
    }

    pub fn relation(&self) -> &str {
        self.source.relation()
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    /// Register the dataset in `ctx` under the relation name.
    pub async fn bind(&self, ctx: &SessionContext) -> QueryResult<()> {
        let path = self.source.path();

        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => {
                QueryError::Binding(format!("Dataset file '{}' not found", path.display()))
            }
            _ => QueryError::Binding(format!(
                "Dataset file '{}' is not readable: {}",
                path.display(),
                e
            )),
        })?;
        if !metadata.is_file() {
            return Err(QueryError::Binding(format!(
                "Dataset path '{}' is not a file",
                path.display()
            )));
        }

        let location = path.to_str().ok_or_else(|| {
            QueryError::Binding(format!(
                "Dataset path '{}' is not valid UTF-8",
                path.display()
            ))
        })?;

        // Listing filters on extension, so match whatever the file actually uses.
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();
        let options = ParquetReadOptions {
            file_extension: &extension,
            ..Default::default()
        };

        ctx.register_parquet(self.relation(), location, options)
            .await
            .map_err(|e| {
                QueryError::Binding(format!(
                    "Failed to bind dataset '{}' as '{}': {}",
                    path.display(),
                    self.relation(),
                    e
                ))
            })?;

        tracing::debug!("Bound {} as relation '{}'", path.display(), self.relation());
        Ok(())
    }

    /// Column names and types of the bound relation, read through a
    /// throwaway session.
    pub async fn describe(&self) -> QueryResult<Vec<ColumnDescriptor>> {
        let ctx = SessionContext::new();
        self.bind(&ctx).await?;

        let table = ctx
            .table(self.relation())
            .await
            .map_err(|e| QueryError::Binding(e.to_string()))?;

        Ok(table
            .schema()
            .fields()
            .iter()
            .map(|field| ColumnDescriptor {
                name: field.name().clone(),
                data_type: field.data_type().to_string(),
            })
            .collect())
    }
}
