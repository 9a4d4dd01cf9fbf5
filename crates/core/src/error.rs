use thiserror::Error;

/// Rejected chunking parameters. Raised before any storage I/O happens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChunkConfigError {
    #[error(
        "invalid configuration: overlap ({overlap}) must be less than chunk_size ({chunk_size})"
    )]
    InvalidConfiguration { chunk_size: usize, overlap: isize },

    #[error("invalid configuration: {0} must be greater than zero")]
    ZeroBatchSize(&'static str),
}
