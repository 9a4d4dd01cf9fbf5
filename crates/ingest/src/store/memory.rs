//! In-memory store for exercising the driver without PostgreSQL.
//!
//! Supports failure injection on a given read page or a given document's
//! write, and records how handles were used so tests can assert paging,
//! commit granularity and cleanup.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ragchunk_core::{ChunkRow, Document, DocumentId, NewDocument};

use super::{ChunkWriter, DocumentReader, StoreError};

#[derive(Default)]
struct State {
    documents: Vec<Document>,
    chunks: Vec<ChunkRow>,
    next_id: DocumentId,
    fail_read_at_page: Option<usize>,
    fail_write_for: Option<DocumentId>,
    pages_served: Vec<usize>,
    commits: usize,
    readers_closed: usize,
    writers_closed: usize,
}

/// Shared handle; clones see the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign ids starting at 1, in insertion order.
    pub fn insert_documents(&self, docs: &[NewDocument]) -> Vec<(DocumentId, String)> {
        let mut state = self.state.lock().unwrap();
        docs.iter()
            .map(|doc| {
                state.next_id += 1;
                let id = state.next_id;
                state.documents.push(Document {
                    id,
                    source: doc.source.clone(),
                    content: doc.content.clone(),
                });
                (id, doc.source.clone())
            })
            .collect()
    }

    pub fn chunks(&self) -> Vec<ChunkRow> {
        self.state.lock().unwrap().chunks.clone()
    }

    pub fn chunks_for(&self, document_id: DocumentId) -> Vec<ChunkRow> {
        self.chunks()
            .into_iter()
            .filter(|row| row.document_id == document_id)
            .collect()
    }

    /// Make the `page`-th fetch (0-based) fail.
    pub fn fail_reads_at_page(&self, page: usize) {
        self.state.lock().unwrap().fail_read_at_page = Some(page);
    }

    /// Make every chunk insert for `document_id` fail.
    pub fn fail_writes_for(&self, document_id: DocumentId) {
        self.state.lock().unwrap().fail_write_for = Some(document_id);
    }

    /// Sizes of the pages handed out so far, including the final empty one.
    pub fn pages_served(&self) -> Vec<usize> {
        self.state.lock().unwrap().pages_served.clone()
    }

    /// Successful per-document commits.
    pub fn commits(&self) -> usize {
        self.state.lock().unwrap().commits
    }

    /// `(readers, writers)` that have been closed.
    pub fn closed_handles(&self) -> (usize, usize) {
        let state = self.state.lock().unwrap();
        (state.readers_closed, state.writers_closed)
    }

    pub fn reader(&self, page_size: usize) -> MemoryDocumentReader {
        MemoryDocumentReader {
            store: self.clone(),
            page_size: page_size.max(1),
            offset: 0,
            closed: false,
        }
    }

    pub fn writer(&self) -> MemoryChunkWriter {
        MemoryChunkWriter {
            store: self.clone(),
            closed: false,
        }
    }
}

pub struct MemoryDocumentReader {
    store: MemoryStore,
    page_size: usize,
    offset: usize,
    closed: bool,
}

#[async_trait]
impl DocumentReader for MemoryDocumentReader {
    async fn next_page(&mut self) -> Result<Vec<Document>, StoreError> {
        let mut state = self.store.state.lock().unwrap();
        if state.fail_read_at_page == Some(state.pages_served.len()) {
            return Err(StoreError::Read(sqlx::Error::Protocol(
                "injected read failure".to_string(),
            )));
        }
        let end = (self.offset + self.page_size).min(state.documents.len());
        let page = state.documents[self.offset.min(end)..end].to_vec();
        self.offset = end;
        state.pages_served.push(page.len());
        Ok(page)
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.store.state.lock().unwrap().readers_closed += 1;
        }
    }
}

pub struct MemoryChunkWriter {
    store: MemoryStore,
    closed: bool,
}

#[async_trait]
impl ChunkWriter for MemoryChunkWriter {
    async fn insert_chunks(&mut self, document_id: DocumentId, rows: &[ChunkRow]) -> Result<(), StoreError> {
        let mut state = self.store.state.lock().unwrap();
        if state.fail_write_for == Some(document_id) {
            return Err(StoreError::Write {
                document_id,
                source: sqlx::Error::Protocol("injected write failure".to_string()),
            });
        }
        state.chunks.extend_from_slice(rows);
        state.commits += 1;
        Ok(())
    }

    async fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.store.state.lock().unwrap().writers_closed += 1;
        }
    }
}
