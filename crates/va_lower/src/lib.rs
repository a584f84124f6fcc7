#![warn(missing_docs)]
//! Lowering: parse tree → HIR (§4.4).
//!
//! [`lower_source_file`] is the crate's entry point. A source file may
//! declare multiple modules (§9.1 "no Design aggregate"); each is lowered
//! independently against the natures/disciplines declared earlier in the
//! same file, and the result is a flat `Vec<HirModule>` in source order.

pub mod errors;
pub mod expr;
pub mod module;
pub mod natures;
pub mod scope;
pub mod stmt;

use std::collections::HashMap;

use va_diagnostics::DiagnosticSink;
use va_hir::{ContributionKind, Discipline, HirModule, Nature};
use va_parser::ast::{Item, SourceFile};

pub use errors::LowerError;
pub use module::lower_module;
pub use natures::build_natures_and_disciplines;
pub use scope::{Resolved, Scope};

/// Lowers an entire parsed source file to its modules' HIR.
///
/// Natures and disciplines are collected and resolved once up front
/// (§4.4 steps 1-2), in source order; this step is a shared precondition
/// for every module in the file, so a failure here aborts immediately
/// (§4.3's "parsing does not recover" policy applies equally to this
/// prerequisite table).
///
/// Each `module` item is then lowered independently (§9.1 "this core
/// resolves each independently") — a module that fails to lower pushes
/// its [`LowerError`] to `sink` and is skipped, rather than aborting the
/// whole file, so that a source declaring several modules still yields
/// HIR for the ones that lower cleanly plus a complete error report for
/// the ones that don't (§1.1's "stage returns its best-effort partial
/// result alongside" diagnostics).
pub fn lower_source_file(
    file: &SourceFile,
    sink: &DiagnosticSink,
) -> Result<(Vec<HirModule>, HashMap<String, Nature>, HashMap<String, Discipline>), LowerError> {
    let nature_decls: Vec<_> = file
        .items
        .iter()
        .filter_map(|i| match i {
            Item::Nature(n) => Some(n.clone()),
            _ => None,
        })
        .collect();
    let discipline_decls: Vec<_> = file
        .items
        .iter()
        .filter_map(|i| match i {
            Item::Discipline(d) => Some(d.clone()),
            _ => None,
        })
        .collect();

    let (natures, disciplines, accessor_kinds) = build_natures_and_disciplines(&nature_decls, &discipline_decls)?;

    let mut modules = Vec::new();
    for item in &file.items {
        if let Item::Module(decl) = item {
            match lower_module(decl, &accessor_kinds) {
                Ok(module) => modules.push(module),
                Err(e) => sink.emit(e.to_diagnostic()),
            }
        }
    }

    Ok((modules, natures, disciplines))
}
