#![warn(missing_docs)]
//! HIR → IR code generation and the `ExecutionEngine` boundary (§4.5, §4.6).

pub mod engine;
pub mod errors;
pub mod generator;
pub mod ir;

pub use engine::{CompiledArtifact, ExecutionEngine};
pub use errors::{CodegenError, EngineError};
pub use generator::generate;
pub use ir::{IrConst, IrExpr, IrFunction, IrGlobal, IrGlobalId, IrModule, IrStmt, IrType};

#[cfg(test)]
mod tests {
    use va_diagnostics::DiagnosticSink;
    use va_lexer::{lex, preprocessor::preprocess};
    use va_lower::lower_source_file;
    use va_parser::parse;
    use va_source::SourceDb;

    #[test]
    fn full_pipeline_generates_ir_for_a_resistor() {
        let src = format!(
            "{}\nmodule res(a,b); inout electrical a,b; parameter real r = 1.0; \
             analog I(a,b) <+ V(a,b) / r; endmodule",
            va_hir::preamble::DISCIPLINES_VAMS
        );
        let mut db = SourceDb::new();
        let id = db.add_source("t.va", src.clone());
        let tokens = lex(&src, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        let file = parse(tokens).unwrap();
        let sink = DiagnosticSink::new();
        let (modules, _, _) = lower_source_file(&file, &sink).unwrap();

        let ir = crate::generate(&modules[0]).unwrap();
        assert!(ir.global_by_name("__branch_potential_a,b").is_some());
        assert!(ir.global_by_name("__branch_flow_a,b").is_some());
        assert!(ir.global_by_name("r").is_some());
    }
}
