//! The target IR (§4.5): a flat module of global slots plus function
//! bodies, the unit an [`crate::engine::ExecutionEngine`] compiles.
//!
//! This is deliberately a tree-of-expressions IR rather than a
//! register-allocated SSA form — the spec's Non-goals exclude IR
//! optimization, and a straight-line evaluator over expression trees is
//! enough to give an `ExecutionEngine` everything it needs to compile or
//! interpret a module (§4.5, §4.6).

use serde::{Deserialize, Serialize};

/// Opaque, copyable identity for a global slot within an [`IrModule`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct IrGlobalId(u32);

impl IrGlobalId {
    /// Creates an id from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// This id's raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// The scalar type of an IR value.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum IrType {
    /// A 32-bit signed integer.
    Integer,
    /// A 64-bit IEEE-754 double.
    Real,
}

/// A compile-time constant.
///
/// Integer arithmetic in this core is two's-complement 32-bit (§8), so
/// integer constants and slots are `i32`, not the parser's wider `i64`
/// literal representation; [`crate::generator::generate`] truncates.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub enum IrConst {
    /// An integer constant.
    Integer(i32),
    /// A real constant.
    Real(f64),
}

impl IrConst {
    /// This constant's type.
    pub fn ty(self) -> IrType {
        match self {
            IrConst::Integer(_) => IrType::Integer,
            IrConst::Real(_) => IrType::Real,
        }
    }
}

/// A mutable global scalar slot: one per variable, parameter,
/// net-potential, net-flow, branch-potential, and branch-flow (§4.5).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IrGlobal {
    /// This global's identity.
    pub id: IrGlobalId,
    /// The global's name, used by `global_address` lookups and for
    /// debugging (`__net_flow_a`, `__branch_potential_a,b`, ...).
    pub name: String,
    /// The global's type.
    pub ty: IrType,
    /// The value the global holds before `run_analog` ever runs, and the
    /// value output globals are reset to at the start of every call.
    pub initial: IrConst,
}

/// An IR expression: the same shape as `HirExpr`, but variable references
/// are resolved to a global slot instead of a `SymbolId`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum IrExpr {
    /// A constant value.
    Const(IrConst),
    /// A read of a global slot.
    GlobalRef(IrGlobalId),
    /// A call to a named function (an arithmetic primitive, a cast, an
    /// accessor probe, or a declared math intrinsic).
    Call {
        /// The callee's name.
        function: String,
        /// Already-typed arguments.
        arguments: Vec<IrExpr>,
        /// This call's result type.
        ty: IrType,
    },
}

impl IrExpr {
    /// This expression's type, resolving `GlobalRef`s against `globals`.
    ///
    /// # Panics
    ///
    /// Panics if a `GlobalRef` names an id not present in `globals` — the
    /// generator never emits a dangling reference.
    pub fn ty(&self, globals: &[IrGlobal]) -> IrType {
        match self {
            IrExpr::Const(c) => c.ty(),
            IrExpr::GlobalRef(id) => globals
                .iter()
                .find(|g| g.id == *id)
                .map(|g| g.ty)
                .expect("generator never emits a dangling global reference"),
            IrExpr::Call { ty, .. } => *ty,
        }
    }
}

/// An IR statement.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum IrStmt {
    /// Stores `value` into the global slot `target`.
    Store {
        /// The assigned global.
        target: IrGlobalId,
        /// The value to store.
        value: IrExpr,
    },
    /// A sequence of statements.
    Block(Vec<IrStmt>),
    /// `if (condition) then [else else_branch]`.
    If {
        /// The branch condition (nonzero is truthy).
        condition: IrExpr,
        /// The taken branch.
        then_branch: Box<IrStmt>,
        /// The else branch, if present.
        else_branch: Option<Box<IrStmt>>,
    },
    /// Adds `value` to the global slot `target` (used for additive
    /// analog contributions, §4.4 step 6, §4.5).
    Accumulate {
        /// The accumulated-into global.
        target: IrGlobalId,
        /// The value to add.
        value: IrExpr,
    },
}

/// A function declaration: either a body to execute (`run_analog`) or an
/// external declaration for a referenced math intrinsic with no body
/// (§4.5, §4.7 "symbols not referenced ... never materialized").
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IrFunction {
    /// The function's name.
    pub name: String,
    /// Parameter types, in order.
    pub params: Vec<IrType>,
    /// Return type.
    pub ret: IrType,
    /// The function body, or `None` for an external declaration.
    pub body: Option<Vec<IrStmt>>,
}

/// A complete lowered module, ready for an `ExecutionEngine` to compile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IrModule {
    /// The originating HIR module's name.
    pub name: String,
    /// Every global slot, in a stable declaration order matching their
    /// `IrGlobalId` indices.
    pub globals: Vec<IrGlobal>,
    /// Every function: `run_analog` plus any referenced math intrinsic
    /// declarations.
    pub functions: Vec<IrFunction>,
}

impl IrModule {
    /// The entry point function's name (§4.5, §4.6).
    pub const ENTRY_POINT: &'static str = "run_analog";

    /// Looks up a global by name.
    pub fn global_by_name(&self, name: &str) -> Option<&IrGlobal> {
        self.globals.iter().find(|g| g.name == name)
    }

    /// Looks up a global's value type by id.
    pub fn global_type(&self, id: IrGlobalId) -> Option<IrType> {
        self.globals.iter().find(|g| g.id == id).map(|g| g.ty)
    }
}
