//! Lexer and preprocessor error taxonomy (§7).

use va_diagnostics::{code::Category, Diagnostic, DiagnosticCode};
use va_source::Span;

/// Errors the lexer can raise (§7 "Lex").
#[derive(Debug, thiserror::Error)]
pub enum LexError {
    /// A byte did not begin any recognized token.
    #[error("unexpected character {ch:?}")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
        /// Where it occurred.
        span: Span,
    },
    /// A `"..."` string literal was not closed before end of line/input.
    #[error("unterminated string literal")]
    UnterminatedString {
        /// Where the string literal started.
        span: Span,
    },
    /// A `/* ... */` comment was not closed before end of input.
    #[error("unterminated block comment")]
    UnterminatedBlockComment {
        /// Where the comment started.
        span: Span,
    },
    /// A numeric literal's lexical shape was recognized but its text did
    /// not parse as a number (should not normally happen given the
    /// governing regex, but guarded against malformed SI-suffixed reals).
    #[error("malformed numeric literal {text:?}")]
    MalformedNumericLiteral {
        /// The offending literal text.
        text: String,
        /// Where it occurred.
        span: Span,
    },
}

impl LexError {
    /// Converts this error into a renderable [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LexError::UnexpectedCharacter { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lex, 1), self.to_string(), span.clone())
            }
            LexError::UnterminatedString { span } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lex, 2), self.to_string(), span.clone())
            }
            LexError::UnterminatedBlockComment { span } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lex, 3), self.to_string(), span.clone())
            }
            LexError::MalformedNumericLiteral { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Lex, 4), self.to_string(), span.clone())
            }
        }
    }
}

/// Errors the preprocessor can raise (§7 "Preprocess").
#[derive(Debug, thiserror::Error)]
pub enum PreprocessError {
    /// A `` `name `` was not a directive keyword and not a defined macro.
    #[error("undefined macro '{name}'")]
    UndefinedMacro {
        /// The macro name.
        name: String,
        /// Where it was referenced.
        span: Span,
    },
    /// A function-like macro was called with the wrong number of arguments.
    #[error("macro '{name}' expects {expected} argument(s), got {got}")]
    WrongMacroArity {
        /// The macro name.
        name: String,
        /// Number of parameters the macro was defined with.
        expected: usize,
        /// Number of arguments supplied at the call site.
        got: usize,
        /// Where the call occurred.
        span: Span,
    },
    /// `` `else `` or `` `endif `` appeared with no matching `` `ifdef ``.
    #[error("stray '`{directive}' with no matching `ifdef")]
    StrayDirective {
        /// `"else"` or `"endif"`.
        directive: String,
        /// Where it occurred.
        span: Span,
    },
    /// An `` `ifdef `` was never closed by a matching `` `endif ``.
    #[error("unterminated `ifdef")]
    UnterminatedIfdef {
        /// Where the `` `ifdef `` began.
        span: Span,
    },
    /// An `` `include `` file could not be found on the current directory
    /// or the configured search path.
    #[error("include file not found: {filename}")]
    IncludeNotFound {
        /// The requested filename.
        filename: String,
        /// Where the `` `include `` occurred.
        span: Span,
    },
    /// A function-like macro call's argument list ran off the end of the
    /// token stream before its closing `)`.
    #[error("unterminated macro argument list for '{name}'")]
    UnterminatedMacroArgs {
        /// The macro name.
        name: String,
        /// Where the call began.
        span: Span,
    },
    /// The underlying lexer failed while processing an included file.
    #[error(transparent)]
    Lex(#[from] LexError),
}

impl PreprocessError {
    /// Converts this error into a renderable [`Diagnostic`].
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            PreprocessError::UndefinedMacro { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Preprocess, 1), self.to_string(), span.clone())
            }
            PreprocessError::WrongMacroArity { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Preprocess, 2), self.to_string(), span.clone())
            }
            PreprocessError::StrayDirective { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Preprocess, 3), self.to_string(), span.clone())
            }
            PreprocessError::UnterminatedIfdef { span } => {
                Diagnostic::error(DiagnosticCode::new(Category::Preprocess, 4), self.to_string(), span.clone())
            }
            PreprocessError::IncludeNotFound { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Preprocess, 5), self.to_string(), span.clone())
            }
            PreprocessError::UnterminatedMacroArgs { span, .. } => {
                Diagnostic::error(DiagnosticCode::new(Category::Preprocess, 6), self.to_string(), span.clone())
            }
            PreprocessError::Lex(inner) => inner.to_diagnostic(),
        }
    }
}
