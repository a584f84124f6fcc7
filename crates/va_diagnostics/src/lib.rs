//! Structured diagnostics shared by every compilation stage.
//!
//! Every stage (lex, preprocess, parse, lowering, codegen, JIT facade)
//! reports user-facing failures as a [`Diagnostic`] pushed to a
//! [`DiagnosticSink`] rather than as a panic or process abort; see the
//! error handling design for the stage-to-code-prefix mapping.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use label::{Label, LabelStyle};
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
