//! Code-generation and execution-engine errors (§7).
//!
//! Unlike the front-end stages, codegen and the execution engine operate
//! on HIR/IR, which carries no source span — these are internal-style
//! errors reported the same way as [`va_common::InternalError`], not
//! `Diagnostic`s anchored to user source text.

/// Errors the code generator can raise while turning an `HirModule` into
/// an `IrModule`.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// A `string`-typed HIR node was reached outside a plain declaration
    /// (strings have no runtime representation in this core, §9).
    #[error("strings are not supported by code generation: {context}")]
    UnsupportedType {
        /// What was being generated when the unsupported type was found.
        context: String,
    },
    /// An HIR operator has no codegen lowering (kept for forward
    /// compatibility with HIR node kinds this core doesn't yet emit).
    #[error("operator not supported by code generation: {operator}")]
    UnsupportedOperator {
        /// The operator's canonical name.
        operator: String,
    },
}

/// Errors an [`crate::engine::ExecutionEngine`] can raise.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The IR module failed a structural sanity check before compilation
    /// (e.g. an instruction referenced a global that doesn't exist).
    #[error("IR verification failed: {message}")]
    Verification {
        /// Description of the failed check.
        message: String,
    },
    /// A named global or function was not found in the compiled artifact.
    #[error("symbol not found: {name}")]
    SymbolNotFound {
        /// The symbol's name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let e = CodegenError::UnsupportedType {
            context: "variable 's'".to_string(),
        };
        assert!(e.to_string().contains("strings are not supported"));

        let e = EngineError::SymbolNotFound {
            name: "x".to_string(),
        };
        assert_eq!(e.to_string(), "symbol not found: x");
    }
}
