//! Variables and parameters (§3).

use serde::{Deserialize, Serialize};
use crate::ids::SymbolId;
use crate::types::HirType;

/// A module- or block-scoped variable, or a module-scoped parameter.
///
/// A parameter is a variable with `is_parameter = true`: it is
/// externally writable at runtime but read-only from within
/// `run_analog` (lowering rejects assignments whose lvalue resolves to
/// a parameter, §4.4 step 5).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VarSymbol {
    /// This variable's identity key, used by the code generator.
    pub id: SymbolId,
    /// The variable's name.
    pub name: String,
    /// The variable's scalar type.
    pub ty: HirType,
    /// Whether this is a parameter rather than an ordinary variable.
    pub is_parameter: bool,
}
