//! A tree-walking reference [`ExecutionEngine`] (§4.6).
//!
//! `InterpEngine` never produces native code; it "compiles" an
//! [`IrModule`] by copying its globals into per-instance storage and
//! walking `IrStmt`/`IrExpr` directly on every `call`. It exists so the
//! core can be exercised end to end without a real native backend, and
//! so `va_cli --run` has something to drive.

use std::cell::UnsafeCell;
use std::collections::HashMap;

use va_codegen::{CompiledArtifact, EngineError, ExecutionEngine, IrConst, IrExpr, IrFunction, IrModule, IrStmt, IrType};
use va_hir::builtins;

/// A reference execution engine backed by a tree-walking interpreter.
#[derive(Default)]
pub struct InterpEngine;

impl InterpEngine {
    /// Creates a new interpreter engine. Stateless: every `compile` call
    /// produces an independent [`InterpArtifact`].
    pub fn new() -> Self {
        Self
    }
}

impl ExecutionEngine for InterpEngine {
    fn compile(&self, module: &IrModule) -> Result<Box<dyn CompiledArtifact>, EngineError> {
        verify(module)?;
        Ok(Box::new(InterpArtifact::new(module)))
    }
}

fn verify(module: &IrModule) -> Result<(), EngineError> {
    let entry = module.functions.iter().find(|f| f.name == IrModule::ENTRY_POINT);
    if entry.is_none() {
        return Err(EngineError::Verification {
            message: format!("module '{}' has no {} function", module.name, IrModule::ENTRY_POINT),
        });
    }
    Ok(())
}

/// A slot's value as the interpreter works with it, independent of its
/// raw storage encoding.
#[derive(Clone, Copy, Debug)]
enum RtValue {
    Int(i32),
    Real(f64),
}

impl RtValue {
    fn as_real(self) -> f64 {
        match self {
            RtValue::Int(v) => v as f64,
            RtValue::Real(v) => v,
        }
    }

    fn is_truthy(self) -> bool {
        match self {
            RtValue::Int(v) => v != 0,
            RtValue::Real(v) => v != 0.0,
        }
    }
}

/// Every global lives in one 8-byte slot: a `Real` slot holds the bit
/// pattern of an `f64`; an `Integer` slot holds its value sign-extended
/// to `i64`. This is the contract `CompiledArtifact::global_address`
/// documents.
fn encode(ty: IrType, value: RtValue) -> u64 {
    match (ty, value) {
        (IrType::Real, v) => v.as_real().to_bits(),
        (IrType::Integer, RtValue::Int(v)) => (v as i64) as u64,
        (IrType::Integer, RtValue::Real(v)) => (v as i32 as i64) as u64,
    }
}

fn decode(ty: IrType, raw: u64) -> RtValue {
    match ty {
        IrType::Real => RtValue::Real(f64::from_bits(raw)),
        IrType::Integer => RtValue::Int((raw as i64) as i32),
    }
}

/// An [`IrModule`] compiled for interpretation: one 8-byte slot per
/// global, indexed by [`va_codegen::IrGlobalId`].
pub struct InterpArtifact {
    types: Vec<IrType>,
    names: HashMap<String, usize>,
    storage: UnsafeCell<Vec<u64>>,
    functions: HashMap<String, IrFunction>,
}

impl InterpArtifact {
    fn new(module: &IrModule) -> Self {
        let mut types = Vec::with_capacity(module.globals.len());
        let mut names = HashMap::with_capacity(module.globals.len());
        let mut storage = Vec::with_capacity(module.globals.len());
        for global in &module.globals {
            names.insert(global.name.clone(), global.id.as_raw() as usize);
            types.push(global.ty);
            storage.push(encode(global.ty, const_to_rt(global.initial)));
        }
        let functions = module.functions.iter().map(|f| (f.name.clone(), f.clone())).collect();
        Self {
            types,
            names,
            storage: UnsafeCell::new(storage),
            functions,
        }
    }

    fn get(&self, index: usize) -> RtValue {
        // SAFETY: `call` takes `&mut self`, so no interpreter evaluation
        // runs concurrently with this read; `global_address` callers are
        // bound by the same single-threaded, non-reentrant contract.
        let raw = unsafe { (*self.storage.get())[index] };
        decode(self.types[index], raw)
    }

    fn set(&self, index: usize, value: RtValue) {
        let raw = encode(self.types[index], value);
        // SAFETY: see `get`.
        unsafe { (*self.storage.get())[index] = raw };
    }

    fn eval_expr(&self, expr: &IrExpr) -> RtValue {
        match expr {
            IrExpr::Const(c) => const_to_rt(*c),
            IrExpr::GlobalRef(id) => self.get(id.as_raw() as usize),
            IrExpr::Call { function, arguments, .. } => {
                let args: Vec<RtValue> = arguments.iter().map(|a| self.eval_expr(a)).collect();
                self.eval_call(function, &args)
            }
        }
    }

    fn eval_call(&self, function: &str, args: &[RtValue]) -> RtValue {
        match function {
            f if f == builtins::CAST_INT_TO_REAL => RtValue::Real(args[0].as_real()),
            f if f == builtins::CAST_REAL_TO_INT => RtValue::Int(args[0].as_real() as i32),
            f if f == builtins::INTEGER_ADDITION => RtValue::Int(int(args[0]).wrapping_add(int(args[1]))),
            f if f == builtins::INTEGER_SUBTRACTION => RtValue::Int(int(args[0]).wrapping_sub(int(args[1]))),
            f if f == builtins::INTEGER_PRODUCT => RtValue::Int(int(args[0]).wrapping_mul(int(args[1]))),
            f if f == builtins::INTEGER_DIVISION => RtValue::Int(int(args[0]).wrapping_div(int(args[1]))),
            f if f == builtins::INTEGER_EQUALITY => RtValue::Int((int(args[0]) == int(args[1])) as i32),
            f if f == builtins::INTEGER_INEQUALITY => RtValue::Int((int(args[0]) != int(args[1])) as i32),
            f if f == builtins::REAL_ADDITION => RtValue::Real(args[0].as_real() + args[1].as_real()),
            f if f == builtins::REAL_SUBTRACTION => RtValue::Real(args[0].as_real() - args[1].as_real()),
            f if f == builtins::REAL_PRODUCT => RtValue::Real(args[0].as_real() * args[1].as_real()),
            f if f == builtins::REAL_DIVISION => RtValue::Real(args[0].as_real() / args[1].as_real()),
            f if f == builtins::REAL_EQUALITY => RtValue::Real((args[0].as_real() == args[1].as_real()) as i32 as f64),
            f if f == builtins::REAL_INEQUALITY => RtValue::Real((args[0].as_real() != args[1].as_real()) as i32 as f64),
            f if builtins::is_unary_math_intrinsic(f) => RtValue::Real(unary_intrinsic(f, args[0].as_real())),
            f if builtins::is_binary_math_intrinsic(f) => {
                RtValue::Real(binary_intrinsic(f, args[0].as_real(), args[1].as_real()))
            }
            other => panic!("interpreter has no implementation for builtin '{other}'"),
        }
    }

    fn exec_stmt(&self, stmt: &IrStmt) {
        match stmt {
            IrStmt::Store { target, value } => {
                let v = self.eval_expr(value);
                self.set(target.as_raw() as usize, v);
            }
            IrStmt::Block(stmts) => {
                for s in stmts {
                    self.exec_stmt(s);
                }
            }
            IrStmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition).is_truthy() {
                    self.exec_stmt(then_branch);
                } else if let Some(e) = else_branch {
                    self.exec_stmt(e);
                }
            }
            IrStmt::Accumulate { target, value } => {
                let index = target.as_raw() as usize;
                let delta = self.eval_expr(value);
                let current = self.get(index);
                let sum = match (current, delta) {
                    (RtValue::Int(a), _) => RtValue::Int(a.wrapping_add(int(delta))),
                    (RtValue::Real(a), _) => RtValue::Real(a + delta.as_real()),
                };
                self.set(index, sum);
            }
        }
    }
}

fn const_to_rt(c: IrConst) -> RtValue {
    match c {
        IrConst::Integer(v) => RtValue::Int(v),
        IrConst::Real(v) => RtValue::Real(v),
    }
}

fn int(v: RtValue) -> i32 {
    match v {
        RtValue::Int(v) => v,
        RtValue::Real(v) => v as i32,
    }
}

fn unary_intrinsic(name: &str, x: f64) -> f64 {
    match name {
        "ln" => x.ln(),
        "log" => x.log10(),
        "exp" => x.exp(),
        "sqrt" => x.sqrt(),
        "abs" => x.abs(),
        "floor" => x.floor(),
        "ceil" => x.ceil(),
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "asin" => x.asin(),
        "acos" => x.acos(),
        "atan" => x.atan(),
        "sinh" => x.sinh(),
        "cosh" => x.cosh(),
        "tanh" => x.tanh(),
        "asinh" => x.asinh(),
        "acosh" => x.acosh(),
        "atanh" => x.atanh(),
        _ => unreachable!("guarded by is_unary_math_intrinsic"),
    }
}

fn binary_intrinsic(name: &str, x: f64, y: f64) -> f64 {
    match name {
        "pow" => x.powf(y),
        "min" => x.min(y),
        "max" => x.max(y),
        "atan2" => x.atan2(y),
        "hypot" => x.hypot(y),
        _ => unreachable!("guarded by is_binary_math_intrinsic"),
    }
}

impl CompiledArtifact for InterpArtifact {
    fn global_address(&self, name: &str) -> Option<*mut u8> {
        let index = *self.names.get(name)?;
        // SAFETY: caller must not hold this pointer across a `call`, and
        // must not use it from more than one thread at a time (see the
        // trait's documented contract).
        let ptr = unsafe { (*self.storage.get()).as_mut_ptr().add(index) as *mut u8 };
        Some(ptr)
    }

    fn call(&mut self, function: &str) -> Result<(), EngineError> {
        let f = self.functions.get(function).ok_or_else(|| EngineError::SymbolNotFound {
            name: function.to_string(),
        })?;
        let body = f.body.clone().ok_or_else(|| EngineError::SymbolNotFound {
            name: format!("{function} (external declaration has no body)"),
        })?;
        for stmt in &body {
            self.exec_stmt(stmt);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_codegen::{IrFunction, IrGlobal, IrGlobalId};

    fn real_global(name: &str, initial: f64) -> IrGlobal {
        IrGlobal {
            id: IrGlobalId::from_raw(0),
            name: name.to_string(),
            ty: IrType::Real,
            initial: IrConst::Real(initial),
        }
    }

    #[test]
    fn stores_and_reads_back_a_global() {
        let mut g = real_global("x", 0.0);
        g.id = IrGlobalId::from_raw(0);
        let module = IrModule {
            name: "m".to_string(),
            globals: vec![g],
            functions: vec![IrFunction {
                name: IrModule::ENTRY_POINT.to_string(),
                params: vec![],
                ret: IrType::Integer,
                body: Some(vec![IrStmt::Store {
                    target: IrGlobalId::from_raw(0),
                    value: IrExpr::Const(IrConst::Real(2.5)),
                }]),
            }],
        };
        let engine = InterpEngine::new();
        let mut artifact = engine.compile(&module).unwrap();
        artifact.call(IrModule::ENTRY_POINT).unwrap();
        let ptr = artifact.global_address("x").unwrap();
        let v = unsafe { f64::from_bits(std::ptr::read(ptr as *const u64)) };
        assert_eq!(v, 2.5);
    }

    #[test]
    fn accumulate_adds_to_existing_value() {
        let mut g = real_global("acc", 1.0);
        g.id = IrGlobalId::from_raw(0);
        let module = IrModule {
            name: "m".to_string(),
            globals: vec![g],
            functions: vec![IrFunction {
                name: IrModule::ENTRY_POINT.to_string(),
                params: vec![],
                ret: IrType::Integer,
                body: Some(vec![IrStmt::Accumulate {
                    target: IrGlobalId::from_raw(0),
                    value: IrExpr::Const(IrConst::Real(4.0)),
                }]),
            }],
        };
        let engine = InterpEngine::new();
        let mut artifact = engine.compile(&module).unwrap();
        artifact.call(IrModule::ENTRY_POINT).unwrap();
        let ptr = artifact.global_address("acc").unwrap();
        let v = unsafe { f64::from_bits(std::ptr::read(ptr as *const u64)) };
        assert_eq!(v, 5.0);
    }

    #[test]
    fn missing_entry_point_fails_verification() {
        let module = IrModule {
            name: "m".to_string(),
            globals: vec![],
            functions: vec![],
        };
        let engine = InterpEngine::new();
        assert!(matches!(engine.compile(&module), Err(EngineError::Verification { .. })));
    }
}
