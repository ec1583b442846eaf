use askadb_engine::config::{
    DEFAULT_DATASET_PATH, DEFAULT_QUERY_TIMEOUT_SECS, DEFAULT_RELATION,
};
use askadb_engine::{create_router, DatasetSource, ExecutorConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "askadb-engine")]
#[command(about = "askadb - SQL query engine over a Parquet dataset", long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "ASKADB_PORT", default_value_t = 8002)]
    port: u16,

    /// Address to bind
    #[arg(long, env = "ASKADB_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Parquet file exposed to queries
    #[arg(long, env = "ASKADB_DATASET", default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Relation name queries use to reach the dataset
    #[arg(long, env = "ASKADB_RELATION", default_value = DEFAULT_RELATION)]
    relation: String,

    /// Per-query execution timeout in seconds
    #[arg(long, env = "ASKADB_QUERY_TIMEOUT_SECS", default_value_t = DEFAULT_QUERY_TIMEOUT_SECS)]
    query_timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askadb_engine=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve the dataset once; requests never see a different path.
    let dataset = match args.dataset.canonicalize() {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(
                "Dataset {} is not available ({}); queries will fail until it exists",
                args.dataset.display(),
                e
            );
            args.dataset.clone()
        }
    };

    let source = DatasetSource::new(dataset, args.relation)?;
    tracing::info!(
        "Serving {} as relation '{}'",
        source.path().display(),
        source.relation()
    );

    let config = ExecutorConfig::new(source)
        .with_query_timeout(Duration::from_secs(args.query_timeout_secs));
    let app = create_router(config);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Query engine listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
