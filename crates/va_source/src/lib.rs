//! Source file management and span tracking for diagnostics.
//!
//! Spans here carry an *origin chain*, not just a single location: macro
//! expansion and `` `include `` both push a frame onto a token's origin so
//! that a diagnostic can be unwound back through every expansion/inclusion
//! site that produced it, matching the informational-only origin model
//! described by the data model.

#![warn(missing_docs)]

pub mod file_id;
pub mod resolved_span;
pub mod source_db;
pub mod source_file;
pub mod span;

pub use file_id::FileId;
pub use resolved_span::ResolvedSpan;
pub use source_db::SourceDb;
pub use source_file::SourceFile;
pub use span::{OriginFrame, Span};
