//! Lowering (semantic) error taxonomy (§7 "Lowering (semantic)").

use va_diagnostics::{code::Category, Diagnostic, DiagnosticCode};
use va_source::Span;

/// Errors lowering can raise.
#[derive(Debug, thiserror::Error)]
pub enum LowerError {
    /// An identifier did not resolve in any enclosing scope.
    #[error("undefined identifier '{name}'")]
    UndefinedIdentifier {
        /// The identifier text.
        name: String,
        /// Where it was referenced.
        span: Span,
    },
    /// The same name was declared twice in one scope.
    #[error("'{name}' is already declared in this scope")]
    DuplicateIdentifier {
        /// The identifier text.
        name: String,
        /// Where the duplicate declaration occurred.
        span: Span,
    },
    /// Two operand types cannot be reconciled, even with coercion
    /// (e.g. a string operand in arithmetic).
    #[error("type mismatch: {message}")]
    TypeMismatch {
        /// Description of the mismatch.
        message: String,
        /// Where it occurred.
        span: Span,
    },
    /// A call's argument count did not match the callee's arity.
    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        /// The callee name.
        name: String,
        /// Expected argument count.
        expected: usize,
        /// Actual argument count.
        got: usize,
        /// Where the call occurred.
        span: Span,
    },
    /// An accessor was applied to nets whose disciplines don't support it.
    #[error("accessor '{accessor}' is not valid here")]
    IncompatibleDiscipline {
        /// The accessor identifier.
        accessor: String,
        /// Where it occurred.
        span: Span,
    },
    /// An assignment's lvalue resolved to something other than a
    /// (non-parameter) variable.
    #[error("'{name}' is not an assignable variable")]
    LvalueNotVariable {
        /// The offending identifier.
        name: String,
        /// Where it occurred.
        span: Span,
    },
    /// A syntactically valid construct has no HIR representation in
    /// this core (`case`, `for`; §9.1).
    #[error("{what} is not supported by this core")]
    UnsupportedConstruct {
        /// Description of the construct.
        what: String,
        /// Where it occurred.
        span: Span,
    },
}

impl LowerError {
    /// Converts this error into a renderable [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LowerError::UndefinedIdentifier { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 1), self.to_string(), span.clone())
            }
            LowerError::DuplicateIdentifier { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 2), self.to_string(), span.clone())
            }
            LowerError::TypeMismatch { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 3), self.to_string(), span.clone())
            }
            LowerError::ArityMismatch { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 4), self.to_string(), span.clone())
            }
            LowerError::IncompatibleDiscipline { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 5), self.to_string(), span.clone())
            }
            LowerError::LvalueNotVariable { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 6), self.to_string(), span.clone())
            }
            LowerError::UnsupportedConstruct { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lower, 7), self.to_string(), span.clone())
            }
        }
    }
}
