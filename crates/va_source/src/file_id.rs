//! Opaque handles identifying a loaded source file.

use serde::{Deserialize, Serialize};

/// An opaque handle to a loaded source file, indexing into a [`crate::SourceDb`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// A placeholder file id used for spans with no real source location
    /// (synthesized HIR, built-ins).
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Constructs a `FileId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dummy_is_distinct() {
        assert_ne!(FileId::DUMMY, FileId::from_raw(0));
    }

    #[test]
    fn raw_roundtrip() {
        let f = FileId::from_raw(3);
        assert_eq!(f.as_raw(), 3);
    }
}
