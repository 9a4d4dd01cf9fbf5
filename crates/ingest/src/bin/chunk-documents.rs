//! chunk-documents — split every stored document into overlapping chunks.
//!
//! Pipeline flow: documents (server-side cursor, 50 per fetch) → chunk_text →
//! INSERT INTO chunks, committed per document.

use clap::Parser;
use tracing::{info, warn};

use ragchunk_core::config::{load_dotenv, Config};
use ragchunk_ingest::chunk_all_documents;

/// Chunk all documents currently in storage.
///
/// Window and batch sizes come from the environment (CHUNK_SIZE,
/// CHUNK_OVERLAP, CHUNK_FETCH_SIZE, CHUNK_INSERT_ROWS); defaults are
/// 1000 / 200 / 50 / 1000.
#[derive(Parser, Debug)]
#[command(name = "chunk-documents", version, about)]
struct Cli {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    load_dotenv();
    let _cli = Cli::parse();
    let config = Config::from_env();
    config.log_summary();
    if !config.postgres.is_configured() {
        warn!("PG_USER not set, relying on libpq defaults for the database user");
    }

    let report = chunk_all_documents(&config).await?;
    info!(
        documents = report.documents,
        chunks = report.chunks,
        "chunk-documents finished"
    );
    Ok(())
}
