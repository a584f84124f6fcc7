//! Rendering diagnostics to human-readable text.

use va_source::SourceDb;

use crate::Diagnostic;

/// Renders a [`Diagnostic`] to a printable string given the source
/// database used to resolve its spans.
pub trait DiagnosticRenderer {
    /// Renders one diagnostic.
    fn render(&self, diagnostic: &Diagnostic, source_db: &SourceDb) -> String;
}

/// Renders diagnostics as `file:line:col: severity[code]: message`, one
/// line per label/note/help appended below, matching the error handling
/// design's `file:line:col: message` policy.
pub struct TerminalRenderer;

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diagnostic: &Diagnostic, source_db: &SourceDb) -> String {
        let resolved = source_db.resolve_span(&diagnostic.primary_span);
        let mut out = format!(
            "{resolved}: {severity}[{code}]: {message}",
            severity = diagnostic.severity,
            code = diagnostic.code,
            message = diagnostic.message,
        );
        for label in &diagnostic.labels {
            let resolved = source_db.resolve_span(&label.span);
            out.push_str(&format!("\n  {resolved}: {}", label.message));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("\n  note: {note}"));
        }
        for help in &diagnostic.help {
            out.push_str(&format!("\n  help: {help}"));
        }
        out
    }
}
