//! Statement lowering (§4.4 steps 5-6).

use va_hir::{HirStmt, HirType};
use va_parser::ast::Stmt;

use crate::errors::LowerError;
use crate::module::ModuleBuilder;
use crate::scope::Resolved;

impl<'a> ModuleBuilder<'a> {
    pub(crate) fn lower_stmt(&mut self, stmt: &Stmt) -> Result<HirStmt, LowerError> {
        match stmt {
            Stmt::Assignment { lvalue, value, span } => {
                let (id, ty) = match self.scope.resolve(lvalue) {
                    Some(Resolved::Var { id, ty, is_parameter: false }) => (*id, *ty),
                    Some(Resolved::Var { is_parameter: true, .. }) => {
                        return Err(LowerError::LvalueNotVariable {
                            name: lvalue.clone(),
                            span: span.clone(),
                        })
                    }
                    Some(_) => {
                        return Err(LowerError::LvalueNotVariable {
                            name: lvalue.clone(),
                            span: span.clone(),
                        })
                    }
                    None => {
                        return Err(LowerError::UndefinedIdentifier {
                            name: lvalue.clone(),
                            span: span.clone(),
                        })
                    }
                };
                let value = self.lower_expr_coerced(value, ty)?;
                Ok(HirStmt::Assignment {
                    target: id,
                    target_name: lvalue.clone(),
                    value,
                })
            }
            Stmt::Block { locals, statements, .. } => {
                self.scope.push_frame();
                let result = (|| {
                    for local in locals {
                        self.lower_decl_item(local)?;
                    }
                    let mut lowered = Vec::with_capacity(statements.len());
                    for s in statements {
                        lowered.push(self.lower_stmt(s)?);
                    }
                    Ok(lowered)
                })();
                self.scope.pop_frame();
                Ok(HirStmt::Block(result?))
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let condition_val = self.lower_expr(condition)?;
                if condition_val.ty() == HirType::String {
                    return Err(LowerError::TypeMismatch {
                        message: "an if-condition cannot be a string".to_string(),
                        span: condition.span(),
                    });
                }
                let then_branch = Box::new(self.lower_stmt(then_branch)?);
                let else_branch = match else_branch {
                    Some(s) => Some(Box::new(self.lower_stmt(s)?)),
                    None => None,
                };
                Ok(HirStmt::If {
                    condition: condition_val,
                    then_branch,
                    else_branch,
                })
            }
            Stmt::Contribution {
                accessor,
                net1,
                net2,
                value,
                span,
            } => {
                let kind = self.accessor_kinds.get(accessor).copied().ok_or_else(|| {
                    LowerError::IncompatibleDiscipline {
                        accessor: accessor.clone(),
                        span: span.clone(),
                    }
                })?;
                for net in std::iter::once(net1.as_str()).chain(net2.as_deref()) {
                    match self.scope.resolve(net) {
                        Some(Resolved::Net) => {}
                        Some(_) => {
                            return Err(LowerError::TypeMismatch {
                                message: format!("'{}' is not a net", net),
                                span: span.clone(),
                            })
                        }
                        None => {
                            return Err(LowerError::UndefinedIdentifier {
                                name: net.to_string(),
                                span: span.clone(),
                            })
                        }
                    }
                }
                let branch_key = (net1.clone(), net2.clone());
                let branch_id = self.branch_for(net1, net2.as_deref());
                let value = self.lower_expr_coerced(value, HirType::Real)?;
                Ok(HirStmt::AnalogContribution {
                    branch: branch_id,
                    branch_key,
                    kind,
                    value,
                })
            }
            Stmt::Case { span, .. } => Err(LowerError::UnsupportedConstruct {
                what: "the case statement".to_string(),
                span: span.clone(),
            }),
            Stmt::For { span, .. } => Err(LowerError::UnsupportedConstruct {
                what: "the for statement".to_string(),
                span: span.clone(),
            }),
            Stmt::SystemTaskCall { span, .. } => Err(LowerError::UnsupportedConstruct {
                what: "system task calls".to_string(),
                span: span.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use va_hir::HirStmt;
    use va_lexer::{lex, preprocessor::preprocess};
    use va_parser::{parse, Item};
    use va_source::SourceDb;

    use crate::errors::LowerError;
    use crate::module::lower_module;

    fn lower_module_src(src: &str) -> va_hir::HirModule {
        let full = format!("{}\n{}", va_hir::preamble::DISCIPLINES_VAMS, src);
        let mut db = SourceDb::new();
        let id = db.add_source("t.va", full.clone());
        let tokens = lex(&full, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        let file = parse(tokens).unwrap();
        let natures: Vec<_> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Nature(n) => Some(n.clone()),
                _ => None,
            })
            .collect();
        let disciplines: Vec<_> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Discipline(d) => Some(d.clone()),
                _ => None,
            })
            .collect();
        let (_, _, accessors) = crate::natures::build_natures_and_disciplines(&natures, &disciplines).unwrap();
        let module_decl = file
            .items
            .iter()
            .find_map(|i| match i {
                Item::Module(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        lower_module(&module_decl, &accessors).unwrap()
    }

    #[test]
    fn nested_if_lowers() {
        let m = lower_module_src(
            "module m(); real x; parameter real a = 1.0; analog begin \
             if (a == 1.0) begin if (a != 0.0) x = 1.0; else x = 2.0; end else x = 3.0; \
             end endmodule",
        );
        assert_eq!(m.statements.len(), 1);
        assert!(matches!(m.statements[0], HirStmt::If { .. }));
    }

    #[test]
    fn assignment_to_parameter_is_rejected() {
        let mut db = SourceDb::new();
        let full = format!(
            "{}\nmodule m(); parameter real a = 1.0; analog a = 2.0; endmodule",
            va_hir::preamble::DISCIPLINES_VAMS
        );
        let id = db.add_source("t.va", full.clone());
        let tokens = lex(&full, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        let file = parse(tokens).unwrap();
        let natures: Vec<_> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Nature(n) => Some(n.clone()),
                _ => None,
            })
            .collect();
        let disciplines: Vec<_> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Discipline(d) => Some(d.clone()),
                _ => None,
            })
            .collect();
        let (_, _, accessors) = crate::natures::build_natures_and_disciplines(&natures, &disciplines).unwrap();
        let module_decl = file
            .items
            .iter()
            .find_map(|i| match i {
                Item::Module(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        assert!(matches!(
            lower_module(&module_decl, &accessors),
            Err(LowerError::LvalueNotVariable { .. })
        ));
    }

    #[test]
    fn case_statement_is_unsupported() {
        let mut db = SourceDb::new();
        let full = format!(
            "{}\nmodule m(); integer x; analog case (x) 1: x = 1; endcase endmodule",
            va_hir::preamble::DISCIPLINES_VAMS
        );
        let id = db.add_source("t.va", full.clone());
        let tokens = lex(&full, id).unwrap();
        let tokens = preprocess(tokens, &mut db, &[]).unwrap();
        let file = parse(tokens).unwrap();
        let natures: Vec<_> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Nature(n) => Some(n.clone()),
                _ => None,
            })
            .collect();
        let disciplines: Vec<_> = file
            .items
            .iter()
            .filter_map(|i| match i {
                Item::Discipline(d) => Some(d.clone()),
                _ => None,
            })
            .collect();
        let (_, _, accessors) = crate::natures::build_natures_and_disciplines(&natures, &disciplines).unwrap();
        let module_decl = file
            .items
            .iter()
            .find_map(|i| match i {
                Item::Module(m) => Some(m.clone()),
                _ => None,
            })
            .unwrap();
        assert!(matches!(
            lower_module(&module_decl, &accessors),
            Err(LowerError::UnsupportedConstruct { .. })
        ));
    }
}
