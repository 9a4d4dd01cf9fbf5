//! ingest-documents — load `.txt`/`.md` files from a folder into `documents`.
//!
//! Pipeline flow: folder → clean_text → INSERT INTO documents

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use ragchunk_core::config::{load_dotenv, Config};
use ragchunk_ingest::ingest_folder;
use ragchunk_ingest::store::postgres::{connect, run_migrations};

// ── CLI ─────────────────────────────────────────────────────────────

/// Load text documents from a folder into PostgreSQL.
#[derive(Parser, Debug)]
#[command(name = "ingest-documents", version, about)]
struct Cli {
    /// Folder holding the .txt/.md files (not searched recursively).
    #[arg(env = "RAGCHUNK_DATA_DIR", default_value = "./data")]
    dir: PathBuf,

    /// Apply the bundled schema migrations before inserting.
    #[arg(long)]
    migrate: bool,
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();

    let pool = connect(&config.postgres).await?;
    let result = async {
        if cli.migrate {
            run_migrations(&pool).await?;
        }
        ingest_folder(&pool, &cli.dir).await
    }
    .await;
    pool.close().await;

    let inserted = result?;
    for (id, source) in &inserted {
        info!(id, source = %source, "inserted document");
    }
    info!(count = inserted.len(), "ingest-documents finished");
    Ok(())
}
