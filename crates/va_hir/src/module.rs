//! The lowered module (§3).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::branch::{Branch, BranchKey};
use crate::net::Net;
use crate::stmt::HirStmt;
use crate::var::VarSymbol;

/// A fully lowered module: the unit the code generator consumes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HirModule {
    /// The module's name.
    pub name: String,
    /// Port names, in header order.
    pub ports: Vec<String>,
    /// Every net declared or induced by this module, in declaration order.
    pub nets: Vec<Net>,
    /// The module's branch table, keyed by `(net1, net2_or_none)`.
    pub branches: HashMap<BranchKey, Branch>,
    /// Module-scoped parameters, in declaration order.
    pub parameters: Vec<VarSymbol>,
    /// Module- and block-scoped variables, in declaration order.
    pub variables: Vec<VarSymbol>,
    /// The module's top-level statements (the `analog` block bodies, in
    /// declaration order).
    pub statements: Vec<HirStmt>,
}
