//! Parse-tree node types for the Verilog-A analog subset (§4.3).
//!
//! The parse tree carries no type or symbol information — that is the
//! job of lowering (`va_lower`). Every node carries a [`Span`] for
//! diagnostics.

use serde::{Deserialize, Serialize};
use va_source::Span;

/// A complete source file: zero or more top-level declarations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// Top-level items, in source order.
    pub items: Vec<Item>,
}

/// A top-level declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Item {
    /// `nature NAME ... endnature`
    Nature(NatureDecl),
    /// `discipline NAME ... enddiscipline`
    Discipline(DisciplineDecl),
    /// `module NAME(...) ... endmodule`
    Module(ModuleDecl),
}

/// A `nature` block: a flat list of `attribute = expr;` assignments,
/// resolved against the nature/discipline semantics during lowering
/// (§4.4 step 1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NatureDecl {
    /// The nature's name.
    pub name: String,
    /// `attribute = expr` pairs, in source order (`units`, `abstol`,
    /// `access`, `idt_nature`, `ddt_nature`, ...). `access`/`idt_nature`/
    /// `ddt_nature` values are bare identifiers, parsed here as
    /// single-identifier expressions and interpreted during lowering.
    pub attributes: Vec<(String, Expr)>,
    /// Full span of the block.
    pub span: Span,
}

/// A `discipline` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisciplineDecl {
    /// The discipline's name.
    pub name: String,
    /// `domain discrete|continuous;`, if present.
    pub domain: Option<String>,
    /// `potential NAME;`, if present.
    pub potential: Option<String>,
    /// `flow NAME;`, if present.
    pub flow: Option<String>,
    /// Full span of the block.
    pub span: Span,
}

/// A `module` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDecl {
    /// The module's name.
    pub name: String,
    /// Port names as listed in the module header `module m(a, b, c);`.
    pub port_names: Vec<String>,
    /// Declarations and statements inside the module body.
    pub items: Vec<ModuleItem>,
    /// Full span of the block.
    pub span: Span,
}

/// Port direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

/// Declared scalar type of a variable or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    /// `integer`
    Integer,
    /// `real`
    Real,
    /// `string`
    String,
}

/// A parameter range constraint (§4.3); parsed and retained, not enforced
/// by this core (§9 open questions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ParamRange {
    /// `from [lo:hi]`
    From {
        /// Lower bound expression.
        lo: Expr,
        /// Upper bound expression.
        hi: Expr,
    },
    /// `exclude value`
    Exclude(Expr),
}

/// An item inside a module body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModuleItem {
    /// `inout|input|output [discipline] name, ... ;`
    PortDecl {
        /// Port direction.
        direction: Direction,
        /// Discipline name, if given on the declaration.
        discipline: Option<String>,
        /// Port (and induced net) names.
        names: Vec<String>,
        /// Span of the declaration.
        span: Span,
    },
    /// `discipline_name name, ... ;` — a bare net declaration, where
    /// `discipline` names a previously declared discipline. The parser
    /// cannot distinguish this from a port-direction-less form at parse
    /// time beyond syntactic shape; lowering resolves `discipline`
    /// against known discipline names.
    NetDecl {
        /// The discipline name used as this declaration's "type".
        discipline: String,
        /// Net names.
        names: Vec<String>,
        /// Span of the declaration.
        span: Span,
    },
    /// `real|integer|string name [= expr], ... ;`
    VariableDecl {
        /// The declared scalar type.
        ty: ScalarType,
        /// Each declared name with its optional initializer.
        names: Vec<(String, Option<Expr>)>,
        /// Span of the declaration.
        span: Span,
    },
    /// `parameter type name = expr [range...] ;`
    ParameterDecl {
        /// The declared scalar type.
        ty: ScalarType,
        /// The parameter's name.
        name: String,
        /// The mandatory initializer.
        init: Expr,
        /// Any `from`/`exclude` range constraints.
        ranges: Vec<ParamRange>,
        /// Span of the declaration.
        span: Span,
    },
    /// `branch (n1 [, n2]) name;`
    BranchDecl {
        /// The optional user-given branch name.
        name: Option<String>,
        /// First endpoint net name.
        net1: String,
        /// Second endpoint net name, if given (otherwise implicit ground).
        net2: Option<String>,
        /// Span of the declaration.
        span: Span,
    },
    /// `analog stmt`
    Analog(Stmt),
    /// `(* name [= expr], ... *)` — parsed and discarded (§4.3).
    AttributeInstance(Span),
}

/// A statement (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Stmt {
    /// `lvalue = expr;`
    Assignment {
        /// The assigned variable's name.
        lvalue: String,
        /// The right-hand side.
        value: Expr,
        /// Span of the statement.
        span: Span,
    },
    /// `begin stmt* end`, optionally with local declarations.
    Block {
        /// Local variable declarations scoped to this block.
        locals: Vec<ModuleItem>,
        /// The block's statements, in order.
        statements: Vec<Stmt>,
        /// Span of the block.
        span: Span,
    },
    /// `if (cond) then [else else_branch]`
    If {
        /// The branch condition.
        condition: Expr,
        /// The taken branch.
        then_branch: Box<Stmt>,
        /// The else branch, if present.
        else_branch: Option<Box<Stmt>>,
        /// Span of the statement.
        span: Span,
    },
    /// `case (selector) (values: body)* [default: body] endcase`
    Case {
        /// The case selector expression.
        selector: Expr,
        /// Non-default arms.
        arms: Vec<CaseArm>,
        /// The `default:` arm, if present.
        default: Option<Box<Stmt>>,
        /// Span of the statement.
        span: Span,
    },
    /// `for (init; cond; step) body`
    For {
        /// Loop initializer.
        init: Box<Stmt>,
        /// Loop condition.
        condition: Expr,
        /// Loop step statement.
        step: Box<Stmt>,
        /// Loop body.
        body: Box<Stmt>,
        /// Span of the statement.
        span: Span,
    },
    /// `accessor(net1 [, net2]) <+ expr;`
    Contribution {
        /// The accessor identifier (e.g. `V`, `I`).
        accessor: String,
        /// First endpoint net name.
        net1: String,
        /// Second endpoint net name, if given.
        net2: Option<String>,
        /// The contributed value.
        value: Expr,
        /// Span of the statement.
        span: Span,
    },
    /// `$name(args...);`
    SystemTaskCall {
        /// The system task name, including the leading `$`.
        name: String,
        /// Call arguments.
        args: Vec<Expr>,
        /// Span of the statement.
        span: Span,
    },
}

/// One non-default arm of a `case` statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseArm {
    /// The comma-separated match values.
    pub values: Vec<Expr>,
    /// The arm's body statement.
    pub body: Stmt,
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    /// `+x` (elided during lowering).
    Plus,
    /// `-x`
    Neg,
    /// `!x` (logical not)
    Not,
    /// `~x` (bitwise not)
    BitNot,
}

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `**`, left-associative in this implementation (§4.3, §9 deviation).
    Pow,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `&`
    BitAnd,
    /// `^`
    BitXor,
    /// `^~` / `~^`
    BitXnor,
    /// `|`
    BitOr,
    /// `&&`
    LogAnd,
    /// `||`
    LogOr,
}

/// An expression (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expr {
    /// An integer literal.
    IntLiteral(i64, Span),
    /// A real literal.
    RealLiteral(f64, Span),
    /// A string literal.
    StringLiteral(String, Span),
    /// A bare identifier reference.
    Identifier(String, Span),
    /// A `$name` system identifier reference.
    SystemIdentifier(String, Span),
    /// A unary operator application.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// A binary operator application.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `cond ? then_expr : else_expr`
    Ternary {
        /// The condition.
        condition: Box<Expr>,
        /// Value if the condition is truthy.
        then_expr: Box<Expr>,
        /// Value if the condition is falsy.
        else_expr: Box<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
    /// `callee(args...)` — a function call, accessor probe, or built-in
    /// math intrinsic invocation; disambiguated during lowering.
    Call {
        /// The callee name.
        callee: String,
        /// Call arguments.
        args: Vec<Expr>,
        /// Span of the whole expression.
        span: Span,
    },
}

impl Expr {
    /// The span covering this expression.
    pub fn span(&self) -> Span {
        match self {
            Expr::IntLiteral(_, s)
            | Expr::RealLiteral(_, s)
            | Expr::StringLiteral(_, s)
            | Expr::Identifier(_, s)
            | Expr::SystemIdentifier(_, s) => s.clone(),
            Expr::Unary { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Call { span, .. } => span.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use va_lexer::{lex, preprocessor::preprocess};
    use va_source::SourceDb;

    #[test]
    fn source_file_round_trips_through_json() {
        let src = "module res(a,b); inout electrical a,b; parameter real r = 1.0; \
                   analog I(a,b) <+ V(a,b) / r; endmodule";
        let mut db = SourceDb::new();
        let id = db.add_source("t.va", src.to_string());
        let tokens = lex(src, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        let file = parse(tokens).unwrap();

        let json = serde_json::to_string(&file).unwrap();
        let back: SourceFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.items.len(), file.items.len());
        match &back.items[0] {
            Item::Module(m) => assert_eq!(m.name, "res"),
            _ => panic!("expected a module item"),
        }
    }
}
