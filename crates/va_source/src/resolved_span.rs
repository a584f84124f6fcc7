//! A span resolved to human-readable file/line/column positions.

use std::fmt;
use std::path::PathBuf;

/// A [`crate::Span`] resolved against a [`crate::SourceDb`] into a
/// printable location, independent of the `FileId`/byte-offset
/// representation used internally.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Path of the file the span is within.
    pub file_path: PathBuf,
    /// 1-based starting line.
    pub start_line: u32,
    /// 1-based starting column.
    pub start_col: u32,
    /// 1-based ending line.
    pub end_line: u32,
    /// 1-based ending column.
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file_path.display(),
            self.start_line,
            self.start_col
        )
    }
}
