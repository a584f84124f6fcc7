//! HIR → IR code generation (§4.5).
//!
//! Emits one mutable global per variable and parameter, two globals per
//! net (`__net_potential_*`, an input the host drives; `__net_flow_*`,
//! an output this core accumulates), and two globals per branch
//! (`__branch_potential_*`, an output this core stores into;
//! `__branch_flow_*`, an input the host drives), plus an external
//! declaration for every referenced math intrinsic.
//!
//! `run_analog`'s body first zeroes only the *output* globals
//! (net-flow, branch-potential) so per-call contributions are additive
//! from zero, then lowers the HIR statements in order. A potential probe
//! `V(n1[,n2])` reads `net_potential[n1] [- net_potential[n2]]`; a flow
//! probe `I(n1,n2)` reads that branch's own `__branch_flow_*` slot. A
//! potential contribution overwrites its branch's `__branch_potential_*`
//! slot; a flow contribution accumulates into each endpoint's
//! `__net_flow_*` slot, with sign flipped on the second endpoint.

use std::collections::{HashMap, HashSet};

use va_hir::{builtins, BranchKey, ContributionKind, HirExpr, HirModule, HirStmt, HirType, LiteralValue, SymbolId};

use crate::errors::CodegenError;
use crate::ir::{IrConst, IrExpr, IrFunction, IrGlobal, IrGlobalId, IrModule, IrStmt, IrType};

fn hir_type_to_ir(ty: HirType, context: &str) -> Result<IrType, CodegenError> {
    match ty {
        HirType::Integer => Ok(IrType::Integer),
        HirType::Real => Ok(IrType::Real),
        HirType::String => Err(CodegenError::UnsupportedType {
            context: context.to_string(),
        }),
    }
}

fn zero_for(ty: IrType) -> IrConst {
    match ty {
        IrType::Integer => IrConst::Integer(0),
        IrType::Real => IrConst::Real(0.0),
    }
}

/// Truncates a parser-width `i64` literal to this core's 32-bit integer
/// representation (§8 "two's-complement 32-bit semantics").
fn truncate_to_i32(v: i64) -> i32 {
    v as i32
}

fn branch_key_suffix(key: &BranchKey) -> String {
    match &key.1 {
        Some(n2) => format!("{},{n2}", key.0),
        None => key.0.clone(),
    }
}

struct Generator {
    globals: Vec<IrGlobal>,
    variable_slots: HashMap<SymbolId, IrGlobalId>,
    /// Per net: `(potential, flow)` — potential is host-driven input,
    /// flow is this core's accumulated output.
    net_slots: HashMap<String, (IrGlobalId, IrGlobalId)>,
    /// Per branch: `(potential, flow)` — potential is this core's
    /// stored output, flow is host-driven input.
    branch_slots: HashMap<BranchKey, (IrGlobalId, IrGlobalId)>,
    branch_key_by_id: HashMap<SymbolId, BranchKey>,
    intrinsics: HashSet<String>,
}

impl Generator {
    fn new() -> Self {
        Self {
            globals: Vec::new(),
            variable_slots: HashMap::new(),
            net_slots: HashMap::new(),
            branch_slots: HashMap::new(),
            branch_key_by_id: HashMap::new(),
            intrinsics: HashSet::new(),
        }
    }

    fn push_global(&mut self, name: String, ty: IrType) -> IrGlobalId {
        let id = IrGlobalId::from_raw(self.globals.len() as u32);
        self.globals.push(IrGlobal {
            id,
            name,
            ty,
            initial: zero_for(ty),
        });
        id
    }

    fn declare_variable(&mut self, id: SymbolId, name: &str, ty: HirType) -> Result<(), CodegenError> {
        let ir_ty = hir_type_to_ir(ty, &format!("variable '{name}'"))?;
        let slot = self.push_global(name.to_string(), ir_ty);
        self.variable_slots.insert(id, slot);
        Ok(())
    }

    fn declare_net(&mut self, name: &str) {
        if self.net_slots.contains_key(name) {
            return;
        }
        let potential = self.push_global(format!("__net_potential_{name}"), IrType::Real);
        let flow = self.push_global(format!("__net_flow_{name}"), IrType::Real);
        self.net_slots.insert(name.to_string(), (potential, flow));
    }

    fn lower_expr(&mut self, expr: &HirExpr) -> Result<IrExpr, CodegenError> {
        match expr {
            HirExpr::Literal { value, ty } => {
                let ir_ty = hir_type_to_ir(*ty, "a literal")?;
                let c = match (value, ir_ty) {
                    (LiteralValue::Integer(v), IrType::Integer) => IrConst::Integer(truncate_to_i32(*v)),
                    (LiteralValue::Real(v), IrType::Real) => IrConst::Real(*v),
                    _ => unreachable!("HIR literal type always matches its own value's type"),
                };
                Ok(IrExpr::Const(c))
            }
            HirExpr::Variable { symbol, name, .. } => {
                let slot = self.variable_slots.get(symbol).copied().ok_or_else(|| CodegenError::UnsupportedType {
                    context: format!("reference to '{name}' has no codegen slot"),
                })?;
                Ok(IrExpr::GlobalRef(slot))
            }
            HirExpr::FunctionCall { function, arguments, ty } => {
                if function == builtins::POTENTIAL || function == builtins::FLOW {
                    let branch_id = match &arguments[0] {
                        HirExpr::Variable { symbol, .. } => *symbol,
                        _ => unreachable!("accessor probes always wrap a branch reference, §4.4 step 4"),
                    };
                    let key = self
                        .branch_key_by_id
                        .get(&branch_id)
                        .expect("every branch is declared before statements are lowered")
                        .clone();
                    if function == builtins::FLOW {
                        let (_, flow) = *self.branch_slots.get(&key).expect("branch globals declared up front");
                        return Ok(IrExpr::GlobalRef(flow));
                    }
                    let (net1_potential, _) = *self
                        .net_slots
                        .get(&key.0)
                        .expect("branch endpoints are always declared nets");
                    return Ok(match &key.1 {
                        None => IrExpr::GlobalRef(net1_potential),
                        Some(net2) => {
                            let (net2_potential, _) =
                                *self.net_slots.get(net2).expect("branch endpoints are always declared nets");
                            IrExpr::Call {
                                function: builtins::REAL_SUBTRACTION.to_string(),
                                arguments: vec![IrExpr::GlobalRef(net1_potential), IrExpr::GlobalRef(net2_potential)],
                                ty: IrType::Real,
                            }
                        }
                    });
                }

                if builtins::is_unary_math_intrinsic(function) || builtins::is_binary_math_intrinsic(function) {
                    self.intrinsics.insert(function.clone());
                }
                let ir_ty = hir_type_to_ir(*ty, &format!("call to '{function}'"))?;
                let arguments = arguments.iter().map(|a| self.lower_expr(a)).collect::<Result<Vec<_>, _>>()?;
                Ok(IrExpr::Call {
                    function: function.clone(),
                    arguments,
                    ty: ir_ty,
                })
            }
        }
    }

    fn lower_stmt(&mut self, stmt: &HirStmt) -> Result<IrStmt, CodegenError> {
        match stmt {
            HirStmt::Assignment { target, value, .. } => {
                let slot = *self
                    .variable_slots
                    .get(target)
                    .expect("assignment target registered during declaration pass");
                let value = self.lower_expr(value)?;
                Ok(IrStmt::Store { target: slot, value })
            }
            HirStmt::Block(stmts) => {
                let lowered = stmts.iter().map(|s| self.lower_stmt(s)).collect::<Result<Vec<_>, _>>()?;
                Ok(IrStmt::Block(lowered))
            }
            HirStmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.lower_expr(condition)?;
                let then_branch = Box::new(self.lower_stmt(then_branch)?);
                let else_branch = match else_branch {
                    Some(s) => Some(Box::new(self.lower_stmt(s)?)),
                    None => None,
                };
                Ok(IrStmt::If {
                    condition,
                    then_branch,
                    else_branch,
                })
            }
            HirStmt::AnalogContribution {
                branch_key, kind, value, ..
            } => {
                let value = self.lower_expr(value)?;
                match kind {
                    ContributionKind::Potential => {
                        let (branch_potential, _) = *self
                            .branch_slots
                            .get(branch_key)
                            .expect("branch registered during declaration pass");
                        Ok(IrStmt::Store {
                            target: branch_potential,
                            value,
                        })
                    }
                    ContributionKind::Flow => {
                        let (net1, net2) = branch_key;
                        let mut stmts = Vec::new();
                        let (_, net1_flow) = *self.net_slots.get(net1).expect("branch endpoints are always declared nets");
                        stmts.push(IrStmt::Accumulate {
                            target: net1_flow,
                            value: value.clone(),
                        });
                        if let Some(net2) = net2 {
                            let (_, net2_flow) =
                                *self.net_slots.get(net2).expect("branch endpoints are always declared nets");
                            let negated = IrExpr::Call {
                                function: builtins::REAL_SUBTRACTION.to_string(),
                                arguments: vec![IrExpr::Const(IrConst::Real(0.0)), value],
                                ty: IrType::Real,
                            };
                            stmts.push(IrStmt::Accumulate {
                                target: net2_flow,
                                value: negated,
                            });
                        }
                        Ok(IrStmt::Block(stmts))
                    }
                }
            }
        }
    }
}

/// Generates an [`IrModule`] for `module`.
pub fn generate(module: &HirModule) -> Result<IrModule, CodegenError> {
    let mut gen = Generator::new();

    for net in &module.nets {
        gen.declare_net(&net.name);
    }
    for branch in module.branches.values() {
        let key = branch.key();
        let suffix = branch_key_suffix(&key);
        let potential = gen.push_global(format!("__branch_potential_{suffix}"), IrType::Real);
        let flow = gen.push_global(format!("__branch_flow_{suffix}"), IrType::Real);
        gen.branch_slots.insert(key.clone(), (potential, flow));
        gen.branch_key_by_id.insert(branch.id, key);
    }
    for param in &module.parameters {
        gen.declare_variable(param.id, &param.name, param.ty)?;
    }
    for var in &module.variables {
        gen.declare_variable(var.id, &var.name, var.ty)?;
    }

    let mut body = Vec::new();
    for (_, flow) in gen.net_slots.values() {
        body.push(IrStmt::Store {
            target: *flow,
            value: IrExpr::Const(IrConst::Real(0.0)),
        });
    }
    for (potential, _) in gen.branch_slots.values() {
        body.push(IrStmt::Store {
            target: *potential,
            value: IrExpr::Const(IrConst::Real(0.0)),
        });
    }

    for stmt in &module.statements {
        body.push(gen.lower_stmt(stmt)?);
    }

    let mut functions = vec![IrFunction {
        name: IrModule::ENTRY_POINT.to_string(),
        params: vec![],
        ret: IrType::Integer,
        body: Some(body),
    }];
    let mut intrinsics: Vec<_> = gen.intrinsics.into_iter().collect();
    intrinsics.sort();
    for name in intrinsics {
        let (arity, ret) = builtins::math_intrinsic_signature(&name).expect("only intrinsics are inserted");
        functions.push(IrFunction {
            name,
            params: vec![IrType::Real; arity],
            ret: hir_type_to_ir(ret, "a math intrinsic")?,
            body: None,
        });
    }

    Ok(IrModule {
        name: module.name.clone(),
        globals: gen.globals,
        functions,
    })
}
