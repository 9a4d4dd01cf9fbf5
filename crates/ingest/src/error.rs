use ragchunk_core::ChunkConfigError;
use thiserror::Error;

use crate::document::LoadError;
use crate::store::StoreError;

/// Everything that can stop an ingestion or chunking run.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Config(#[from] ChunkConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
