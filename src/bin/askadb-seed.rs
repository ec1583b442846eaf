use askadb_engine::config::DEFAULT_DATASET_PATH;
use askadb_engine::write_sample_dataset;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "askadb-seed")]
#[command(about = "Write the sample vendas dataset as Parquet", long_about = None)]
struct Args {
    /// Output file
    #[arg(short, long, default_value = DEFAULT_DATASET_PATH)]
    output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askadb_engine=info".into()),
        )
        .init();

    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists, pass --force to overwrite",
            args.output.display()
        );
    }

    let rows = write_sample_dataset(&args.output)?;
    println!("Wrote {} rows to {}", rows, args.output.display());
    Ok(())
}
