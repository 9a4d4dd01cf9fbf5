//! Loading raw text files into [`NewDocument`]s ready for insertion.

mod normalize;
mod txt;

use std::path::{Path, PathBuf};

use ragchunk_core::NewDocument;
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

pub use normalize::{clean_text, strip};

/// File name suffixes picked up by the folder loader.
const TEXT_SUFFIXES: &[&str] = &[".txt", ".md"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot list {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// True for names ending in one of [`TEXT_SUFFIXES`] (case-sensitive).
pub fn is_text_file(name: &str) -> bool {
    TEXT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Read every `.txt`/`.md` file directly inside `dir` (no recursion), clean
/// its text, and label it with its file name. Results are sorted by name.
pub fn load_text_files_from_folder(dir: impl AsRef<Path>) -> Result<Vec<NewDocument>, LoadError> {
    let dir = dir.as_ref();
    let mut docs = Vec::new();

    let entries = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in entries {
        let entry = entry.map_err(|source| LoadError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !is_text_file(&name) || !entry.file_type().is_file() {
            continue;
        }

        let bytes = std::fs::read(entry.path()).map_err(|source| LoadError::Io {
            path: entry.path().to_path_buf(),
            source,
        })?;
        let text = txt::decode_text(bytes, &name);
        debug!(source = %name, chars = text.chars().count(), "loaded text file");
        docs.push(NewDocument::new(name, clean_text(&text)));
    }

    info!(dir = %dir.display(), count = docs.len(), "loaded text documents");
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_filter() {
        assert!(is_text_file("notes.txt"));
        assert!(is_text_file("README.md"));
        assert!(!is_text_file("paper.pdf"));
        assert!(!is_text_file("notes.txt.bak"));
        assert!(!is_text_file("NOTES.TXT"));
    }
}
