//! Fixed-window chunking with overlap.
//!
//! Windows are measured in characters (Unicode scalar values), never bytes:
//!
//! ```text
//! chunk_size = 10, overlap = 5, step = 5
//!
//! text:    "abcdefghijklmno"
//! chunk 0: "abcdefghij"   [0..10]
//! chunk 1: "fghijklmno"   [5..15]
//! chunk 2: "klmno"        [10..15]  final window may be shorter
//! ```
//!
//! Each window is trimmed on its own after slicing, so the visible overlap
//! between neighbours can be shorter than `overlap` when the shared region
//! starts or ends with whitespace.

use ragchunk_core::config::window_step;
use ragchunk_core::{ChunkConfigError, ChunkingConfig};

use crate::document::strip;

/// Split `text` into overlapping windows of `chunk_size` characters.
///
/// The input is trimmed first. Text no longer than `chunk_size` comes back
/// as a single chunk, so empty input yields `[""]`. Windows start every
/// `chunk_size - overlap` characters until the start passes the end of the
/// text. A negative `overlap` leaves gaps between windows.
///
/// Fails with [`ChunkConfigError::InvalidConfiguration`] whenever
/// `overlap >= chunk_size`, whatever the input.
pub fn chunk_text(
    text: &str,
    chunk_size: usize,
    overlap: isize,
) -> Result<Vec<String>, ChunkConfigError> {
    let step = window_step(chunk_size, overlap)?;
    let text = strip(text);

    let n = text.chars().count();
    if n <= chunk_size {
        return Ok(vec![text.to_string()]);
    }

    let mut chunks = Vec::with_capacity(n.div_ceil(step));
    let mut start = 0usize;
    let mut start_byte = 0usize;
    while start < n {
        let rest = &text[start_byte..];
        let end_byte = byte_offset(rest, chunk_size);
        chunks.push(strip(&rest[..end_byte]).to_string());

        start = start.saturating_add(step);
        start_byte += byte_offset(rest, step);
    }
    Ok(chunks)
}

/// Byte offset of the `chars`-th character of `s`, or `s.len()` past the end.
fn byte_offset(s: &str, chars: usize) -> usize {
    s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i)
}

/// [`chunk_text`] with the window taken from a [`ChunkingConfig`].
pub fn chunk_with(config: &ChunkingConfig, text: &str) -> Result<Vec<String>, ChunkConfigError> {
    chunk_text(text, config.chunk_size, config.overlap)
}
