use serde::{Deserialize, Serialize};

/// Storage-assigned document identifier (`documents.id`, a `BIGSERIAL`).
pub type DocumentId = i64;

/// A document as stored in the `documents` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// File name or logical name the text came from.
    pub source: String,
    pub content: String,
}

/// A document that has not been inserted yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDocument {
    pub source: String,
    pub content: String,
}

impl NewDocument {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }
}

/// One row of the `chunks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkRow {
    pub document_id: DocumentId,
    /// 0-based, contiguous within the document.
    pub chunk_index: i32,
    pub text: String,
}

impl ChunkRow {
    /// Number the chunks of one document in order, starting at 0.
    pub fn for_document(document_id: DocumentId, chunks: Vec<String>) -> Vec<ChunkRow> {
        chunks
            .into_iter()
            .enumerate()
            .map(|(idx, text)| ChunkRow {
                document_id,
                chunk_index: idx as i32,
                text,
            })
            .collect()
    }
}
