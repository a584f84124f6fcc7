//! Errors raised by the reference execution engine and the facade it backs.

use va_codegen::EngineError;

/// Errors surfaced while building or driving a [`crate::facade::CompiledModule`].
#[derive(Debug, thiserror::Error)]
pub enum JitError {
    /// The underlying execution engine failed to compile or run the module.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// A facade accessor named a global the compiled module doesn't have.
    #[error("no such global '{name}' in this module")]
    NoSuchGlobal {
        /// The requested global's name.
        name: String,
    },
    /// A facade accessor read or wrote a global with the wrong logical type
    /// (e.g. reading an integer parameter through `net_potential`).
    #[error("global '{name}' is not a {expected}")]
    TypeMismatch {
        /// The global's name.
        name: String,
        /// The type the caller expected.
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = JitError::NoSuchGlobal {
            name: "vout".to_string(),
        };
        assert_eq!(e.to_string(), "no such global 'vout' in this module");
    }
}
