//! A typed façade over a compiled module (§4.6), modeled on the original
//! implementation's `compile_module` result: named accessors for
//! variables, parameters, net potentials/flows, and branch
//! potentials/flows, plus a callable entry point.

use va_codegen::{CompiledArtifact, ExecutionEngine, IrModule, IrType};

use crate::errors::JitError;

/// A compiled module ready to run, with typed access to its global slots.
pub struct CompiledModule {
    artifact: Box<dyn CompiledArtifact>,
    ir: IrModule,
}

impl CompiledModule {
    /// Compiles `ir` with `engine` and wraps the result.
    pub fn compile(engine: &dyn ExecutionEngine, ir: IrModule) -> Result<Self, JitError> {
        let artifact = engine.compile(&ir)?;
        Ok(Self { artifact, ir })
    }

    /// Runs the module's `run_analog` entry point once.
    pub fn run_analog(&mut self) -> Result<(), JitError> {
        self.artifact.call(IrModule::ENTRY_POINT)?;
        Ok(())
    }

    /// Reads a real-typed global by name.
    pub fn real(&self, name: &str) -> Result<f64, JitError> {
        let ty = self.type_of(name)?;
        if ty != IrType::Real {
            return Err(JitError::TypeMismatch {
                name: name.to_string(),
                expected: "real",
            });
        }
        let ptr = self.address(name)?;
        Ok(unsafe { f64::from_bits(std::ptr::read(ptr as *const u64)) })
    }

    /// Writes a real-typed global by name.
    pub fn set_real(&mut self, name: &str, value: f64) -> Result<(), JitError> {
        let ty = self.type_of(name)?;
        if ty != IrType::Real {
            return Err(JitError::TypeMismatch {
                name: name.to_string(),
                expected: "real",
            });
        }
        let ptr = self.address(name)?;
        unsafe { std::ptr::write(ptr as *mut u64, value.to_bits()) };
        Ok(())
    }

    /// Reads an integer-typed global by name.
    pub fn integer(&self, name: &str) -> Result<i32, JitError> {
        let ty = self.type_of(name)?;
        if ty != IrType::Integer {
            return Err(JitError::TypeMismatch {
                name: name.to_string(),
                expected: "integer",
            });
        }
        let ptr = self.address(name)?;
        let raw = unsafe { std::ptr::read(ptr as *const u64) };
        Ok((raw as i64) as i32)
    }

    /// Writes an integer-typed global by name.
    pub fn set_integer(&mut self, name: &str, value: i32) -> Result<(), JitError> {
        let ty = self.type_of(name)?;
        if ty != IrType::Integer {
            return Err(JitError::TypeMismatch {
                name: name.to_string(),
                expected: "integer",
            });
        }
        let ptr = self.address(name)?;
        unsafe { std::ptr::write(ptr as *mut u64, (value as i64) as u64) };
        Ok(())
    }

    /// The potential accumulated on net `name` after the last `run_analog`.
    pub fn net_potential(&self, name: &str) -> Result<f64, JitError> {
        self.real(&format!("__net_potential_{name}"))
    }

    /// Writes the potential the host observes on net `name`.
    pub fn set_net_potential(&mut self, name: &str, value: f64) -> Result<(), JitError> {
        self.set_real(&format!("__net_potential_{name}"), value)
    }

    /// The flow accumulated on net `name` after the last `run_analog`.
    pub fn net_flow(&self, name: &str) -> Result<f64, JitError> {
        self.real(&format!("__net_flow_{name}"))
    }

    /// Writes net `name`'s flow slot directly.
    pub fn set_net_flow(&mut self, name: &str, value: f64) -> Result<(), JitError> {
        self.set_real(&format!("__net_flow_{name}"), value)
    }

    /// The potential contributed to branch `(net1, net2)` after the last
    /// `run_analog`.
    pub fn branch_potential(&self, net1: &str, net2: Option<&str>) -> Result<f64, JitError> {
        self.real(&format!("__branch_potential_{}", branch_suffix(net1, net2)))
    }

    /// Writes branch `(net1, net2)`'s potential slot directly.
    pub fn set_branch_potential(&mut self, net1: &str, net2: Option<&str>, value: f64) -> Result<(), JitError> {
        self.set_real(&format!("__branch_potential_{}", branch_suffix(net1, net2)), value)
    }

    /// The flow contributed to branch `(net1, net2)` after the last
    /// `run_analog`.
    pub fn branch_flow(&self, net1: &str, net2: Option<&str>) -> Result<f64, JitError> {
        self.real(&format!("__branch_flow_{}", branch_suffix(net1, net2)))
    }

    /// Writes the flow the host observes on branch `(net1, net2)`.
    pub fn set_branch_flow(&mut self, net1: &str, net2: Option<&str>, value: f64) -> Result<(), JitError> {
        self.set_real(&format!("__branch_flow_{}", branch_suffix(net1, net2)), value)
    }

    /// The `(net1, net2)` key of every branch this module declares (§6
    /// "branches: iterable of branch keys present"), derived from the
    /// `__branch_potential_*` global names every branch is guaranteed to
    /// have (§4.5).
    pub fn branches(&self) -> Vec<(String, Option<String>)> {
        self.ir
            .globals
            .iter()
            .filter_map(|g| g.name.strip_prefix("__branch_potential_"))
            .map(|suffix| match suffix.split_once(',') {
                Some((n1, n2)) => (n1.to_string(), Some(n2.to_string())),
                None => (suffix.to_string(), None),
            })
            .collect()
    }

    fn type_of(&self, name: &str) -> Result<IrType, JitError> {
        self.ir
            .global_by_name(name)
            .map(|g| g.ty)
            .ok_or_else(|| JitError::NoSuchGlobal { name: name.to_string() })
    }

    fn address(&self, name: &str) -> Result<*mut u8, JitError> {
        self.artifact
            .global_address(name)
            .ok_or_else(|| JitError::NoSuchGlobal { name: name.to_string() })
    }
}

fn branch_suffix(net1: &str, net2: Option<&str>) -> String {
    match net2 {
        Some(n2) => format!("{net1},{n2}"),
        None => net1.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::InterpEngine;
    use va_codegen::generate;
    use va_diagnostics::DiagnosticSink;
    use va_lexer::{lex, preprocessor::preprocess};
    use va_lower::lower_source_file;
    use va_parser::parse;
    use va_source::SourceDb;

    fn compile_resistor() -> CompiledModule {
        let src = format!(
            "{}\nmodule res(a,b); inout electrical a,b; parameter real r = 1.0; \
             analog V(a,b) <+ I(a,b) * r; endmodule",
            va_hir::preamble::DISCIPLINES_VAMS
        );
        let mut db = SourceDb::new();
        let id = db.add_source("t.va", src.clone());
        let tokens = lex(&src, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        let file = parse(tokens).unwrap();
        let sink = DiagnosticSink::new();
        let (modules, _, _) = lower_source_file(&file, &sink).unwrap();
        let ir = generate(&modules[0]).unwrap();
        CompiledModule::compile(&InterpEngine::new(), ir).unwrap()
    }

    #[test]
    fn unknown_global_is_reported() {
        let m = compile_resistor();
        assert!(matches!(m.real("nope"), Err(JitError::NoSuchGlobal { .. })));
    }

    #[test]
    fn parameter_round_trips() {
        // Parameter globals are zero-initialized at the codegen level
        // (§4.5) — the host is responsible for writing the declared
        // default before the first `run_analog` call.
        let mut m = compile_resistor();
        assert_eq!(m.real("r").unwrap(), 0.0);
        m.set_real("r", 2.0).unwrap();
        assert_eq!(m.real("r").unwrap(), 2.0);
    }

    #[test]
    fn type_mismatch_is_reported() {
        let m = compile_resistor();
        assert!(matches!(m.integer("r"), Err(JitError::TypeMismatch { .. })));
    }

    #[test]
    fn net_and_branch_setters_round_trip() {
        let mut m = compile_resistor();
        m.set_net_potential("a", 1.5).unwrap();
        assert_eq!(m.net_potential("a").unwrap(), 1.5);
        m.set_net_flow("a", -2.0).unwrap();
        assert_eq!(m.net_flow("a").unwrap(), -2.0);
        m.set_branch_potential("a", Some("b"), 4.0).unwrap();
        assert_eq!(m.branch_potential("a", Some("b")).unwrap(), 4.0);
        m.set_branch_flow("a", Some("b"), 0.25).unwrap();
        assert_eq!(m.branch_flow("a", Some("b")).unwrap(), 0.25);
    }

    #[test]
    fn branches_lists_declared_branch_keys() {
        let m = compile_resistor();
        assert_eq!(
            m.branches(),
            vec![("a".to_string(), Some("b".to_string()))]
        );
    }
}
