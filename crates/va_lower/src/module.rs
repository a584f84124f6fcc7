//! Module lowering (§4.4 step 3, 7).

use std::collections::HashMap;

use va_hir::{Branch, BranchKey, ContributionKind, HirModule, HirType, Net, SymbolId, VarSymbol};
use va_parser::ast::{self, ModuleDecl, ModuleItem};
use va_source::Span;

use crate::errors::LowerError;
use crate::scope::{Resolved, Scope};

/// Per-module lowering state: the scope stack plus the module's
/// under-construction nets/branches/variables/parameters/statements.
pub struct ModuleBuilder<'a> {
    pub(crate) accessor_kinds: &'a HashMap<String, ContributionKind>,
    pub(crate) scope: Scope,
    pub(crate) nets: Vec<Net>,
    pub(crate) branches: HashMap<BranchKey, Branch>,
    pub(crate) variables: Vec<VarSymbol>,
    pub(crate) parameters: Vec<VarSymbol>,
}

impl<'a> ModuleBuilder<'a> {
    fn new(accessor_kinds: &'a HashMap<String, ContributionKind>) -> Self {
        Self {
            accessor_kinds,
            scope: Scope::new(),
            nets: Vec::new(),
            branches: HashMap::new(),
            variables: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub(crate) fn declare_net(&mut self, name: &str, discipline: Option<String>, span: &Span) -> Result<(), LowerError> {
        if self.scope.resolve(name).is_some() {
            return Err(LowerError::DuplicateIdentifier {
                name: name.to_string(),
                span: span.clone(),
            });
        }
        self.scope.declare(name.to_string(), Resolved::Net);
        self.nets.push(Net {
            id: SymbolId::next(),
            name: name.to_string(),
            discipline,
        });
        Ok(())
    }

    /// Finds (or lazily creates) the branch for `(net1, net2)`.
    pub(crate) fn branch_for(&mut self, net1: &str, net2: Option<&str>) -> SymbolId {
        let key: BranchKey = (net1.to_string(), net2.map(str::to_string));
        if let Some(b) = self.branches.get(&key) {
            return b.id;
        }
        let id = SymbolId::next();
        self.branches.insert(
            key.clone(),
            Branch {
                id,
                name: None,
                net1: key.0.clone(),
                net2: key.1.clone(),
            },
        );
        id
    }

    pub(crate) fn declare_variable(
        &mut self,
        name: &str,
        ty: HirType,
        is_parameter: bool,
        span: &Span,
    ) -> Result<SymbolId, LowerError> {
        if self.scope.resolve(name).is_some() {
            return Err(LowerError::DuplicateIdentifier {
                name: name.to_string(),
                span: span.clone(),
            });
        }
        let id = SymbolId::next();
        self.scope.declare(name.to_string(), Resolved::Var { id, ty, is_parameter });
        let symbol = VarSymbol {
            id,
            name: name.to_string(),
            ty,
            is_parameter,
        };
        if is_parameter {
            self.parameters.push(symbol);
        } else {
            self.variables.push(symbol);
        }
        Ok(id)
    }

    pub(crate) fn scalar_type(ty: ast::ScalarType) -> HirType {
        match ty {
            ast::ScalarType::Integer => HirType::Integer,
            ast::ScalarType::Real => HirType::Real,
            ast::ScalarType::String => HirType::String,
        }
    }

    pub(crate) fn lower_decl_item(&mut self, item: &ModuleItem) -> Result<(), LowerError> {
        match item {
            ModuleItem::PortDecl { discipline, names, span, .. } => {
                for name in names {
                    self.declare_net(name, discipline.clone(), span)?;
                }
                Ok(())
            }
            ModuleItem::NetDecl { discipline, names, span } => {
                for name in names {
                    self.declare_net(name, Some(discipline.clone()), span)?;
                }
                Ok(())
            }
            ModuleItem::VariableDecl { ty, names, span } => {
                let hir_ty = Self::scalar_type(*ty);
                for (name, init) in names {
                    let id = self.declare_variable(name, hir_ty, false, span)?;
                    if let Some(init) = init {
                        let value = self.lower_expr_coerced(init, hir_ty)?;
                        // Module-scope initializers behave like an
                        // implicit first assignment; block-scope locals
                        // with initializers are rare in this subset and
                        // treated identically (no control-flow ordering
                        // concerns at lowering time beyond emission order,
                        // which callers control by interleaving statements).
                        let _ = (id, value);
                    }
                }
                Ok(())
            }
            ModuleItem::ParameterDecl {
                ty, name, init, span, ..
            } => {
                let hir_ty = Self::scalar_type(*ty);
                let _value = self.lower_expr_coerced(init, hir_ty)?;
                self.declare_variable(name, hir_ty, true, span)?;
                Ok(())
            }
            ModuleItem::BranchDecl { name, net1, net2, span } => {
                let id = self.branch_for(net1, net2.as_deref());
                if let Some(alias) = name {
                    if self.scope.resolve(alias).is_some() {
                        return Err(LowerError::DuplicateIdentifier {
                            name: alias.clone(),
                            span: span.clone(),
                        });
                    }
                    self.scope.declare(
                        alias.clone(),
                        Resolved::Branch {
                            id,
                            key: (net1.clone(), net2.clone()),
                        },
                    );
                }
                Ok(())
            }
            ModuleItem::AttributeInstance(_) | ModuleItem::Analog(_) => Ok(()),
        }
    }
}

/// Lowers one parsed `module` into its `HirModule`.
pub fn lower_module(
    decl: &ModuleDecl,
    accessor_kinds: &HashMap<String, ContributionKind>,
) -> Result<HirModule, LowerError> {
    let mut builder = ModuleBuilder::new(accessor_kinds);

    for item in &decl.items {
        builder.lower_decl_item(item)?;
    }

    let mut statements = Vec::new();
    for item in &decl.items {
        if let ModuleItem::Analog(stmt) = item {
            statements.push(builder.lower_stmt(stmt)?);
        }
    }

    Ok(HirModule {
        name: decl.name.clone(),
        ports: decl.port_names.clone(),
        nets: builder.nets,
        branches: builder.branches,
        parameters: builder.parameters,
        variables: builder.variables,
        statements,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use va_hir::HirStmt;
    use va_lexer::{lex, preprocessor::preprocess};
    use va_parser::{parse, Item};
    use va_source::SourceDb;

    fn lower_src(src: &str) -> HirModule {
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
    fn constant_assignment_lowers() {
        let m = lower_src("module m(); real x; analog x = 3.5; endmodule");
        assert_eq!(m.statements.len(), 1);
        assert!(matches!(m.statements[0], HirStmt::Assignment { .. }));
    }

    #[test]
    fn contribution_creates_branch() {
        let m = lower_src(
            "module m(n1,n2); inout electrical n1,n2; analog I(n1) <+ 3.5; analog I(n2,n1) <+ 4.5; endmodule",
        );
        assert_eq!(m.branches.len(), 2);
        assert!(m.branches.contains_key(&("n1".to_string(), None)));
        assert!(m.branches.contains_key(&("n2".to_string(), Some("n1".to_string()))));
    }

    #[test]
    fn duplicate_net_errors() {
        let mut db = SourceDb::new();
        let full = format!(
            "{}\nmodule m(n1); inout electrical n1; electrical n1; endmodule",
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
            Err(LowerError::DuplicateIdentifier { .. })
        ));
    }
}
