//! A single loaded source file and its line-start index.

use std::path::PathBuf;

use crate::FileId;

/// A loaded source file: its path, content, and a precomputed line-start
/// table used to translate byte offsets into 1-based line/column pairs.
pub struct SourceFile {
    id: FileId,
    path: PathBuf,
    content: String,
    line_starts: Vec<u32>,
}

impl SourceFile {
    /// Builds a new source file record, computing its line-start table.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        Self {
            id,
            path,
            content,
            line_starts,
        }
    }

    /// The id this file was registered under.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// The file's path (may be synthetic, e.g. `"<preamble>"`).
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// The full source text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Translates a byte offset into a 1-based `(line, column)` pair via
    /// binary search over the line-start table.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_index = match self.line_starts.binary_search(&byte_offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = byte_offset - line_start + 1;
        (line_index as u32 + 1, column)
    }

    /// Returns the source text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, b) in content.bytes().enumerate() {
        if b == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(content: &str) -> SourceFile {
        SourceFile::new(FileId::from_raw(0), PathBuf::from("test.va"), content.to_string())
    }

    #[test]
    fn single_line() {
        let f = file("module m();");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(7), (1, 8));
    }

    #[test]
    fn multi_line() {
        let f = file("line one\nline two\nline three");
        // "line one\n" is 9 bytes, so offset 9 is the start of line two.
        assert_eq!(f.line_col(9), (2, 1));
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(18), (3, 1));
    }

    #[test]
    fn snippet_extraction() {
        let f = file("analog x = 3.5;");
        assert_eq!(f.snippet(8, 9), "x");
    }
}
