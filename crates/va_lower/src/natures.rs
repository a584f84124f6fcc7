//! Two-pass nature/discipline construction (§4.4 step 1-2, §9 "Cyclic
//! references among natures").

use std::collections::HashMap;

use va_hir::{ContributionKind, Discipline, Nature};
use va_parser::ast::{DisciplineDecl, Expr, NatureDecl};

use crate::errors::LowerError;

fn expr_as_real(e: &Expr) -> Option<f64> {
    match e {
        Expr::RealLiteral(v, _) => Some(*v),
        Expr::IntLiteral(v, _) => Some(*v as f64),
        _ => None,
    }
}

fn expr_as_string(e: &Expr) -> Option<String> {
    match e {
        Expr::StringLiteral(s, _) => Some(s.clone()),
        _ => None,
    }
}

fn expr_as_identifier(e: &Expr) -> Option<String> {
    match e {
        Expr::Identifier(s, _) => Some(s.clone()),
        _ => None,
    }
}

/// Builds the nature table (two-pass) and the discipline table, plus a
/// map from accessor identifier to which contribution kind it probes
/// (derived from which nature's `access` symbol each discipline's
/// `potential`/`flow` field names).
pub fn build_natures_and_disciplines(
    nature_decls: &[NatureDecl],
    discipline_decls: &[DisciplineDecl],
) -> Result<(HashMap<String, Nature>, HashMap<String, Discipline>, HashMap<String, ContributionKind>), LowerError> {
    let mut natures = HashMap::new();
    for decl in nature_decls {
        if natures.contains_key(&decl.name) {
            return Err(LowerError::DuplicateIdentifier {
                name: decl.name.clone(),
                span: decl.span.clone(),
            });
        }
        natures.insert(decl.name.clone(), Nature::named(&decl.name));
    }

    for decl in nature_decls {
        let nature = natures.get(&decl.name).expect("created in pass 1").clone();
        let mut nature = nature;
        for (attr, value) in &decl.attributes {
            match attr.as_str() {
                "abstol" => nature.abstol = expr_as_real(value).or(nature.abstol),
                "units" => nature.units = expr_as_string(value).or(nature.units),
                "access" => nature.access = expr_as_identifier(value).or(nature.access),
                "idt_nature" => nature.idt_nature = expr_as_identifier(value).or(nature.idt_nature),
                "ddt_nature" => nature.ddt_nature = expr_as_identifier(value).or(nature.ddt_nature),
                _ => {}
            }
        }
        natures.insert(decl.name.clone(), nature);
    }

    let mut disciplines = HashMap::new();
    let mut accessor_kinds = HashMap::new();
    for decl in discipline_decls {
        if disciplines.contains_key(&decl.name) {
            return Err(LowerError::DuplicateIdentifier {
                name: decl.name.clone(),
                span: decl.span.clone(),
            });
        }
        let potential = decl.potential.clone().ok_or_else(|| LowerError::TypeMismatch {
            message: format!("discipline '{}' has no potential nature", decl.name),
            span: decl.span.clone(),
        })?;
        let flow = decl.flow.clone().ok_or_else(|| LowerError::TypeMismatch {
            message: format!("discipline '{}' has no flow nature", decl.name),
            span: decl.span.clone(),
        })?;

        if let Some(nature) = natures.get(&potential) {
            if let Some(access) = &nature.access {
                accessor_kinds.insert(access.clone(), ContributionKind::Potential);
            }
        }
        if let Some(nature) = natures.get(&flow) {
            if let Some(access) = &nature.access {
                accessor_kinds.insert(access.clone(), ContributionKind::Flow);
            }
        }

        disciplines.insert(
            decl.name.clone(),
            Discipline {
                name: decl.name.clone(),
                domain: decl.domain.clone().unwrap_or_else(|| "continuous".to_string()),
                potential,
                flow,
            },
        );
    }

    Ok((natures, disciplines, accessor_kinds))
}
