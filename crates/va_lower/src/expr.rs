//! Expression lowering (§4.4 step 4): coercion insertion and accessor
//! resolution.

use va_hir::{
    builtins, ContributionKind, HirExpr, HirType, LiteralValue,
};
use va_parser::ast::{BinaryOp, Expr, UnaryOp};

use crate::errors::LowerError;
use crate::module::ModuleBuilder;
use crate::scope::Resolved;

fn canonical_binary(op: BinaryOp, ty: HirType) -> Option<&'static str> {
    use BinaryOp::*;
    match (op, ty) {
        (Add, HirType::Integer) => Some(builtins::INTEGER_ADDITION),
        (Add, HirType::Real) => Some(builtins::REAL_ADDITION),
        (Sub, HirType::Integer) => Some(builtins::INTEGER_SUBTRACTION),
        (Sub, HirType::Real) => Some(builtins::REAL_SUBTRACTION),
        (Mul, HirType::Integer) => Some(builtins::INTEGER_PRODUCT),
        (Mul, HirType::Real) => Some(builtins::REAL_PRODUCT),
        (Div, HirType::Integer) => Some(builtins::INTEGER_DIVISION),
        (Div, HirType::Real) => Some(builtins::REAL_DIVISION),
        (Eq, HirType::Integer) => Some(builtins::INTEGER_EQUALITY),
        (Eq, HirType::Real) => Some(builtins::REAL_EQUALITY),
        (Neq, HirType::Integer) => Some(builtins::INTEGER_INEQUALITY),
        (Neq, HirType::Real) => Some(builtins::REAL_INEQUALITY),
        _ => None,
    }
}

impl<'a> ModuleBuilder<'a> {
    /// Lowers `expr` with no target type in mind, inferring its own type.
    pub(crate) fn lower_expr(&mut self, expr: &Expr) -> Result<HirExpr, LowerError> {
        match expr {
            Expr::IntLiteral(v, _) => Ok(HirExpr::Literal {
                value: LiteralValue::Integer(*v),
                ty: HirType::Integer,
            }),
            Expr::RealLiteral(v, _) => Ok(HirExpr::Literal {
                value: LiteralValue::Real(*v),
                ty: HirType::Real,
            }),
            Expr::StringLiteral(s, _) => Ok(HirExpr::Literal {
                value: LiteralValue::String(s.clone()),
                ty: HirType::String,
            }),
            Expr::Identifier(name, span) => match self.scope.resolve(name) {
                Some(Resolved::Var { id, ty, .. }) => Ok(HirExpr::Variable {
                    symbol: *id,
                    name: name.clone(),
                    ty: *ty,
                }),
                Some(_) => Err(LowerError::TypeMismatch {
                    message: format!("'{}' does not name a value", name),
                    span: span.clone(),
                }),
                None => Err(LowerError::UndefinedIdentifier {
                    name: name.clone(),
                    span: span.clone(),
                }),
            },
            Expr::SystemIdentifier(name, span) => {
                if name == builtins::TEMPERATURE {
                    Ok(HirExpr::Literal {
                        value: LiteralValue::Real(builtins::TEMPERATURE_DEFAULT),
                        ty: HirType::Real,
                    })
                } else {
                    Err(LowerError::UndefinedIdentifier {
                        name: name.clone(),
                        span: span.clone(),
                    })
                }
            }
            Expr::Unary { op, operand, span } => self.lower_unary(*op, operand, span),
            Expr::Binary { op, lhs, rhs, span } => self.lower_binary(*op, lhs, rhs, span),
            Expr::Ternary { .. } => Err(LowerError::UnsupportedConstruct {
                what: "the ternary operator".to_string(),
                span: expr.span(),
            }),
            Expr::Call { callee, args, span } => self.lower_call(callee, args, span),
        }
    }

    /// Lowers `expr` and coerces the result to `target`, inserting an
    /// explicit cast `FunctionCall` when the natural type differs.
    pub(crate) fn lower_expr_coerced(&mut self, expr: &Expr, target: HirType) -> Result<HirExpr, LowerError> {
        let lowered = self.lower_expr(expr)?;
        self.coerce(lowered, target, expr.span())
    }

    fn coerce(&self, value: HirExpr, target: HirType, span: va_source::Span) -> Result<HirExpr, LowerError> {
        let ty = value.ty();
        if ty == target {
            return Ok(value);
        }
        match (ty, target) {
            (HirType::Integer, HirType::Real) => Ok(HirExpr::FunctionCall {
                function: builtins::CAST_INT_TO_REAL.to_string(),
                arguments: vec![value],
                ty: HirType::Real,
            }),
            (HirType::Real, HirType::Integer) => Ok(HirExpr::FunctionCall {
                function: builtins::CAST_REAL_TO_INT.to_string(),
                arguments: vec![value],
                ty: HirType::Integer,
            }),
            _ => Err(LowerError::TypeMismatch {
                message: format!("cannot coerce {} to {}", ty, target),
                span,
            }),
        }
    }

    fn lower_unary(
        &mut self,
        op: UnaryOp,
        operand: &Expr,
        span: &va_source::Span,
    ) -> Result<HirExpr, LowerError> {
        match op {
            UnaryOp::Plus => self.lower_expr(operand),
            UnaryOp::Neg => {
                let value = self.lower_expr(operand)?;
                let ty = value.ty();
                let zero = match ty {
                    HirType::Integer => HirExpr::Literal {
                        value: LiteralValue::Integer(0),
                        ty: HirType::Integer,
                    },
                    HirType::Real => HirExpr::Literal {
                        value: LiteralValue::Real(0.0),
                        ty: HirType::Real,
                    },
                    HirType::String => {
                        return Err(LowerError::TypeMismatch {
                            message: "cannot negate a string".to_string(),
                            span: span.clone(),
                        })
                    }
                };
                let function = canonical_binary(BinaryOp::Sub, ty)
                    .expect("subtraction is defined for integer and real")
                    .to_string();
                Ok(HirExpr::FunctionCall {
                    function,
                    arguments: vec![zero, value],
                    ty,
                })
            }
            UnaryOp::Not | UnaryOp::BitNot => Err(LowerError::UnsupportedConstruct {
                what: "logical/bitwise unary operators".to_string(),
                span: span.clone(),
            }),
        }
    }

    fn lower_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        span: &va_source::Span,
    ) -> Result<HirExpr, LowerError> {
        if !matches!(
            op,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Eq | BinaryOp::Neq
        ) {
            return Err(LowerError::UnsupportedConstruct {
                what: format!("the '{:?}' operator", op),
                span: span.clone(),
            });
        }

        let lhs_val = self.lower_expr(lhs)?;
        let rhs_val = self.lower_expr(rhs)?;
        let (lty, rty) = (lhs_val.ty(), rhs_val.ty());

        if lty == HirType::String || rty == HirType::String {
            return Err(LowerError::TypeMismatch {
                message: "strings cannot participate in arithmetic".to_string(),
                span: span.clone(),
            });
        }

        let result_ty = if lty == HirType::Real || rty == HirType::Real {
            HirType::Real
        } else {
            HirType::Integer
        };

        let lhs_val = self.coerce(lhs_val, result_ty, lhs.span())?;
        let rhs_val = self.coerce(rhs_val, result_ty, rhs.span())?;
        let function = canonical_binary(op, result_ty)
            .expect("binary op was checked against the supported set above")
            .to_string();

        Ok(HirExpr::FunctionCall {
            function,
            arguments: vec![lhs_val, rhs_val],
            ty: result_ty,
        })
    }

    fn lower_call(&mut self, callee: &str, args: &[Expr], span: &va_source::Span) -> Result<HirExpr, LowerError> {
        if let Some(kind) = self.accessor_kinds.get(callee).copied() {
            return self.lower_accessor_probe(kind, args, span);
        }

        if let Some((arity, ty)) = builtins::math_intrinsic_signature(callee) {
            if args.len() != arity {
                return Err(LowerError::ArityMismatch {
                    name: callee.to_string(),
                    expected: arity,
                    got: args.len(),
                    span: span.clone(),
                });
            }
            let arguments = args
                .iter()
                .map(|a| self.lower_expr_coerced(a, HirType::Real))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(HirExpr::FunctionCall {
                function: callee.to_string(),
                arguments,
                ty,
            });
        }

        Err(LowerError::UndefinedIdentifier {
            name: callee.to_string(),
            span: span.clone(),
        })
    }

    fn lower_accessor_probe(
        &mut self,
        kind: ContributionKind,
        args: &[Expr],
        span: &va_source::Span,
    ) -> Result<HirExpr, LowerError> {
        if args.is_empty() || args.len() > 2 {
            return Err(LowerError::ArityMismatch {
                name: "accessor".to_string(),
                expected: 1,
                got: args.len(),
                span: span.clone(),
            });
        }
        let net1 = self.net_arg_name(&args[0])?;
        let net2 = match args.get(1) {
            Some(e) => Some(self.net_arg_name(e)?),
            None => None,
        };
        let branch_id = self.branch_for(&net1, net2.as_deref());
        let function = match kind {
            ContributionKind::Potential => builtins::POTENTIAL,
            ContributionKind::Flow => builtins::FLOW,
        };
        Ok(HirExpr::FunctionCall {
            function: function.to_string(),
            arguments: vec![HirExpr::Variable {
                symbol: branch_id,
                name: format!("{}{}", net1, net2.as_deref().map(|n| format!(",{n}")).unwrap_or_default()),
                ty: HirType::Real,
            }],
            ty: HirType::Real,
        })
    }

    fn net_arg_name(&self, expr: &Expr) -> Result<String, LowerError> {
        match expr {
            Expr::Identifier(name, span) => match self.scope.resolve(name) {
                Some(Resolved::Net) => Ok(name.clone()),
                Some(_) => Err(LowerError::TypeMismatch {
                    message: format!("'{}' is not a net", name),
                    span: span.clone(),
                }),
                None => Err(LowerError::UndefinedIdentifier {
                    name: name.clone(),
                    span: span.clone(),
                }),
            },
            other => Err(LowerError::TypeMismatch {
                message: "accessor arguments must be net names".to_string(),
                span: other.span(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use va_hir::{HirExpr, HirType};
    use va_lexer::{lex, preprocessor::preprocess};
    use va_parser::{parse, Item};
    use va_source::SourceDb;

    use crate::module::lower_module;

    fn lower_one_stmt(src: &str) -> HirExpr {
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
        let module = lower_module(&module_decl, &accessors).unwrap();
        match module.statements.into_iter().next().unwrap() {
            va_hir::HirStmt::Assignment { value, .. } => value,
            other => panic!("expected an assignment, got {other:?}"),
        }
    }

    #[test]
    fn int_real_mix_inserts_cast() {
        let value = lower_one_stmt("module m(); real x; analog x = 1 + 2.5; endmodule");
        assert_eq!(value.ty(), HirType::Real);
        match value {
            HirExpr::FunctionCall { function, arguments, .. } => {
                assert_eq!(function, "real_addition");
                assert!(matches!(arguments[0], HirExpr::FunctionCall { .. }));
            }
            _ => panic!("expected a function call"),
        }
    }

    #[test]
    fn integer_arithmetic_stays_integer() {
        let value = lower_one_stmt("module m(); integer x; analog x = 1 + 2; endmodule");
        assert_eq!(value.ty(), HirType::Integer);
    }

    #[test]
    fn unary_minus_desugars_to_subtraction() {
        let value = lower_one_stmt("module m(); real x; analog x = -1.5; endmodule");
        match value {
            HirExpr::FunctionCall { function, .. } => assert_eq!(function, "real_subtraction"),
            _ => panic!("expected a function call"),
        }
    }
}
