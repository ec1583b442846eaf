pub mod config;
pub mod dataset;
pub mod error;
pub mod query;
pub mod server;

pub use config::{DatasetSource, ExecutorConfig};
pub use dataset::{DatasetBinder, write_sample_dataset};
pub use error::{QueryError, QueryResult};
pub use query::{QueryExecutor, ResultSet, Row};
pub use server::create_router;
