//! Storage seams for the chunking driver.
//!
//! The driver holds one [`DocumentReader`] and one [`ChunkWriter`] for a run,
//! each backed by its own connection so a long-lived read cursor never waits
//! on a write transaction. Both are closed by the driver on every exit path.

pub mod postgres;

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

use async_trait::async_trait;
use ragchunk_core::{ChunkRow, Document, DocumentId};
use thiserror::Error;

pub use postgres::{insert_documents, PgChunkWriter, PgDocumentReader};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("storage read failed: {0}")]
    Read(#[source] sqlx::Error),

    #[error("storage write failed for document {document_id}: {source}")]
    Write {
        document_id: DocumentId,
        #[source]
        source: sqlx::Error,
    },

    #[error("document insert failed: {0}")]
    InsertDocuments(#[source] sqlx::Error),
}

/// Streams stored documents a page at a time, in storage order.
#[async_trait]
pub trait DocumentReader: Send {
    /// Next page of documents. An empty page means the stream is exhausted.
    async fn next_page(&mut self) -> Result<Vec<Document>, StoreError>;

    /// Release the underlying connection. Safe to call more than once.
    async fn close(&mut self);
}

/// Persists chunk rows, one committed unit per document.
#[async_trait]
pub trait ChunkWriter: Send {
    /// Insert all rows of a single document and commit them together.
    /// A failure leaves earlier commits untouched.
    async fn insert_chunks(&mut self, document_id: DocumentId, rows: &[ChunkRow]) -> Result<(), StoreError>;

    /// Release the underlying connection. Safe to call more than once.
    async fn close(&mut self);
}
