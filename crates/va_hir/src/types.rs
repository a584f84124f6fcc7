//! Scalar types carried by every HIR expression (§3).

use serde::{Deserialize, Serialize};
use std::fmt;

/// The scalar type of an HIR expression, variable, or parameter.
///
/// Every HIR expression is well-typed by construction: lowering never
/// emits a node whose `ty()` would be ambiguous or whose children's
/// types don't match the node's own typing rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum HirType {
    /// A 32-bit signed integer (`integer`).
    Integer,
    /// A 64-bit IEEE-754 double (`real`).
    Real,
    /// A string (`string`); has no code-generator support (§9).
    String,
}

impl fmt::Display for HirType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HirType::Integer => write!(f, "integer"),
            HirType::Real => write!(f, "real"),
            HirType::String => write!(f, "string"),
        }
    }
}
