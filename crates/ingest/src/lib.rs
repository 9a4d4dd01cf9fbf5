//! Document ingestion and fixed-window chunking backed by PostgreSQL.
//!
//! Pipeline flow: text files → [`document::clean_text`] → `documents` table →
//! cursor pages → [`chunker::chunk_text`] → `chunks` table.

pub mod chunker;
pub mod document;
pub mod driver;
pub mod error;
pub mod store;

pub use chunker::chunk_text;
pub use document::{clean_text, load_text_files_from_folder, LoadError};
pub use driver::{chunk_all_documents, create_chunks_for_all_documents, ingest_folder, RunReport};
pub use error::IngestError;
pub use store::{ChunkWriter, DocumentReader, StoreError};
