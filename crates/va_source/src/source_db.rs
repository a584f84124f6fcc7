//! Registry of every source file loaded during a compilation session.

use std::io;
use std::path::Path;

use crate::{FileId, ResolvedSpan, SourceFile, Span};

/// Owns every [`SourceFile`] loaded during a compilation, indexable by
/// [`FileId`]. Used to resolve spans to printable locations and to fetch
/// snippets for diagnostics.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Reads a file from disk and registers it, returning its new [`FileId`].
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<FileId, io::Error> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(self.add_source(path.to_path_buf(), content))
    }

    /// Registers source text directly (tests, the disciplines preamble,
    /// or any other in-memory source), returning its new [`FileId`].
    pub fn add_source(&mut self, path: impl Into<std::path::PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path.into(), content));
        id
    }

    /// Looks up a previously registered file.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Resolves a span's start/end byte offsets into line/column positions.
    pub fn resolve_span(&self, span: &Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end);
        ResolvedSpan {
            file_path: file.path().to_path_buf(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the source text covered by a span.
    pub fn snippet(&self, span: &Span) -> &str {
        let file = self.get_file(span.file);
        file.snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}
