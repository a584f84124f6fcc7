//! HIR expressions (§3).
//!
//! Every expression is well-typed by construction: coercions are
//! explicit `FunctionCall`s (`cast_int_to_real`, `cast_real_to_int`)
//! wrapping their operand, never implicit.

use serde::{Deserialize, Serialize};
use crate::ids::SymbolId;
use crate::types::HirType;

/// A literal value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    /// An integer literal value.
    Integer(i64),
    /// A real literal value.
    Real(f64),
    /// A string literal value.
    String(String),
}

/// An HIR expression. Every variant carries (or can compute) a
/// [`HirType`] via [`HirExpr::ty`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum HirExpr {
    /// A literal value with its type.
    Literal {
        /// The literal's value.
        value: LiteralValue,
        /// The literal's type.
        ty: HirType,
    },
    /// A reference to a variable or parameter symbol.
    Variable {
        /// The referenced symbol's identity.
        symbol: SymbolId,
        /// The referenced symbol's name (for codegen/diagnostics).
        name: String,
        /// The referenced symbol's type.
        ty: HirType,
    },
    /// A call to a canonical built-in or user function. Arguments'
    /// types match the function's signature exactly; any needed
    /// coercion was already inserted as a nested `FunctionCall`.
    FunctionCall {
        /// The canonical function name (see `va_hir::builtins`).
        function: String,
        /// Already-coerced arguments.
        arguments: Vec<HirExpr>,
        /// This call's result type.
        ty: HirType,
    },
}

impl HirExpr {
    /// This expression's type.
    pub fn ty(&self) -> HirType {
        match self {
            HirExpr::Literal { ty, .. } => *ty,
            HirExpr::Variable { ty, .. } => *ty,
            HirExpr::FunctionCall { ty, .. } => *ty,
        }
    }
}
