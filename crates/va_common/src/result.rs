//! Common result and error types for internal (non-user-facing) failures.

/// The standard result type for fallible internal operations that are not
/// themselves reported as compiler diagnostics.
///
/// `Err` indicates a bug in this compiler, not a problem with the user's
/// Verilog-A source. User-facing errors are reported through
/// `va_diagnostics::DiagnosticSink` instead, and the surrounding stage still
/// returns `Ok` with its best-effort partial result.
pub type VaResult<T> = Result<T, InternalError>;

/// An internal compiler error indicating a bug, not a user input problem.
#[derive(Debug, thiserror::Error)]
#[error("internal compiler error: {message}")]
pub struct InternalError {
    /// Description of the internal error.
    pub message: String,
}

impl InternalError {
    /// Creates a new internal error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for InternalError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let err = InternalError::new("codegen saw an unresolved branch");
        assert_eq!(
            format!("{err}"),
            "internal compiler error: codegen saw an unresolved branch"
        );
    }

    #[test]
    fn ok_path() {
        let r: VaResult<i32> = Ok(42);
        assert_eq!(r.ok(), Some(42));
    }

    #[test]
    fn err_path() {
        let r: VaResult<i32> = Err(InternalError::new("boom"));
        assert!(r.is_err());
    }

    #[test]
    fn from_string() {
        let err: InternalError = "from string".to_string().into();
        assert_eq!(err.message, "from string");
    }
}
