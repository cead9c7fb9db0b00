//! Loading Brainfuck source from disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File extension a source file must carry.
pub const SOURCE_EXTENSION: &str = ".bf";

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("File {} is not a brainfuck file: expected file ending in .bf", .path.display())]
    NotBrainfuckFile { path: PathBuf },

    #[error("File {} could not be loaded: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Keep only Brainfuck instruction characters; everything else is a comment.
pub fn filter_source(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']'))
        .collect()
}

/// Read a `.bf` file and return its instruction characters.
///
/// The file is read as raw bytes so comments need not be valid UTF-8.
pub fn load_source(path: &Path) -> Result<String, SourceError> {
    let is_bf = path
        .file_name()
        .map(|name| name.to_string_lossy().ends_with(SOURCE_EXTENSION))
        .unwrap_or(false);
    if !is_bf {
        return Err(SourceError::NotBrainfuckFile { path: path.to_path_buf() });
    }

    let bytes = fs::read(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(filter_source(&String::from_utf8_lossy(&bytes)))
}
