//! HIR statements (§3).

use serde::{Deserialize, Serialize};
use crate::branch::BranchKey;
use crate::expr::HirExpr;
use crate::ids::SymbolId;

/// Which slot an analog contribution targets.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum ContributionKind {
    /// `I(...) <+ expr` — a flow contribution.
    Flow,
    /// `V(...) <+ expr` — a potential contribution.
    Potential,
}

/// An HIR statement.
///
/// Only these four kinds are supported by this core (§3); `case` and
/// `for` are accepted by the parser's grammar (§4.3) but rejected by
/// lowering with `LowerError::UnsupportedConstruct` (§9.1) since this
/// HIR has no loop or multi-way-branch representation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum HirStmt {
    /// `lvalue = value;` — `value`'s type equals the lvalue's type.
    Assignment {
        /// The assigned variable's identity.
        target: SymbolId,
        /// The assigned variable's name (for codegen/diagnostics).
        target_name: String,
        /// The (already type-matched) right-hand side.
        value: HirExpr,
    },
    /// `begin stmt* end`
    Block(Vec<HirStmt>),
    /// `if (condition) then [else else_branch]`; condition is integer or
    /// real, nonzero is truthy.
    If {
        /// The branch condition.
        condition: HirExpr,
        /// The taken branch.
        then_branch: Box<HirStmt>,
        /// The else branch, if present.
        else_branch: Option<Box<HirStmt>>,
    },
    /// `accessor(...) <+ value;` — `value` is real.
    AnalogContribution {
        /// The target branch's identity.
        branch: SymbolId,
        /// The target branch's table key (for codegen).
        branch_key: BranchKey,
        /// Flow or potential.
        kind: ContributionKind,
        /// The contributed value.
        value: HirExpr,
    },
}
