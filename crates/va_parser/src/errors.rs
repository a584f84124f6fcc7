//! Parser error taxonomy (§7 "Parse").

use va_diagnostics::{code::Category, Diagnostic, DiagnosticCode};
use va_source::Span;

/// Errors the parser can raise. Parsing does not recover: the first error
/// aborts the current source file (§4.3).
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A token appeared where no grammar rule accepts it.
    #[error("unexpected token")]
    UnexpectedToken {
        /// Where it occurred.
        span: Span,
    },
    /// A specific token kind was required but a different one was found.
    #[error("expected {expected}, found {found}")]
    ExpectedButGot {
        /// Description of what was expected.
        expected: String,
        /// Description of what was actually present.
        found: String,
        /// Where the mismatch occurred.
        span: Span,
    },
    /// A bracketed or delimited construct ran off the end of input.
    #[error("unterminated {what}")]
    UnterminatedConstruct {
        /// What kind of construct (e.g. `"module"`, `"case"`).
        what: String,
        /// Where the construct began.
        span: Span,
    },
}

impl ParseError {
    /// Converts this error into a renderable [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::UnexpectedToken { span } => {
                Diagnostic::error(DiagnosticCode::new(Category::Parse, 1), self.to_string(), span.clone())
            }
            ParseError::ExpectedButGot { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Parse, 2), self.to_string(), span.clone())
            }
            ParseError::UnterminatedConstruct { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Parse, 3), self.to_string(), span.clone())
            }
        }
    }
}
