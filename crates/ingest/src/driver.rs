//! Batch drivers. [`ingest_folder`] loads a folder of text files into
//! `documents`; [`create_chunks_for_all_documents`] streams every stored
//! document, chunks it, and writes its chunks back with one commit per
//! document.
//!
//! Failure semantics are fail-fast. A read error or a write error stops the
//! run; documents committed before the failure keep their chunks and the
//! failing document is not retried.

use std::path::Path;

use ragchunk_core::{ChunkRow, ChunkingConfig, Config, DocumentId};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::chunker::chunk_with;
use crate::document::load_text_files_from_folder;
use crate::error::IngestError;
use crate::store::{insert_documents, ChunkWriter, DocumentReader, PgChunkWriter, PgDocumentReader};

/// Totals for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
    pub documents: usize,
    pub chunks: usize,
}

/// Chunk every document `reader` yields and persist the rows via `writer`.
///
/// Both handles are closed before this returns, whether the run succeeded
/// or not. The chunk window is validated before the first read.
pub async fn create_chunks_for_all_documents<R, W>(
    reader: &mut R,
    writer: &mut W,
    config: &ChunkingConfig,
) -> Result<RunReport, IngestError>
where
    R: DocumentReader + ?Sized,
    W: ChunkWriter + ?Sized,
{
    let result = run(reader, writer, config).await;
    reader.close().await;
    writer.close().await;
    result
}

async fn run<R, W>(reader: &mut R, writer: &mut W, config: &ChunkingConfig) -> Result<RunReport, IngestError>
where
    R: DocumentReader + ?Sized,
    W: ChunkWriter + ?Sized,
{
    config.validate()?;
    let mut report = RunReport::default();

    loop {
        let page = reader.next_page().await?;
        if page.is_empty() {
            break;
        }
        let page_len = page.len();

        for doc in page {
            let chunks = chunk_with(config, &doc.content)?;
            debug!(
                document_id = doc.id,
                source = %doc.source,
                chunks = chunks.len(),
                "chunking document"
            );
            let rows = ChunkRow::for_document(doc.id, chunks);
            writer.insert_chunks(doc.id, &rows).await?;
            report.chunks += rows.len();
        }

        report.documents += page_len;
        info!(
            documents = report.documents,
            chunks = report.chunks,
            "Processed {} documents...",
            report.documents
        );
    }

    Ok(report)
}

/// Load every `.txt`/`.md` file in `dir` and insert it as a document.
/// Returns the assigned `(id, source)` pairs in insertion order.
pub async fn ingest_folder(pool: &PgPool, dir: &Path) -> Result<Vec<(DocumentId, String)>, IngestError> {
    let docs = load_text_files_from_folder(dir)?;
    let inserted = insert_documents(pool, &docs).await?;
    info!(dir = %dir.display(), count = inserted.len(), "Inserted docs");
    Ok(inserted)
}

/// Open a read and a write connection from `config` and run the driver.
///
/// Configuration is checked before either connection is opened. If the
/// write connection cannot be opened the read connection is closed again.
pub async fn chunk_all_documents(config: &Config) -> Result<RunReport, IngestError> {
    config.chunking.validate()?;

    let mut reader = PgDocumentReader::connect(&config.postgres, config.chunking.fetch_size).await?;
    let mut writer = match PgChunkWriter::connect(&config.postgres, config.chunking.insert_rows).await {
        Ok(writer) => writer,
        Err(e) => {
            reader.close().await;
            return Err(e.into());
        }
    };

    create_chunks_for_all_documents(&mut reader, &mut writer, &config.chunking).await
}
