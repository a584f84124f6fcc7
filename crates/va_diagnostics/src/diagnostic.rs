//! The structured diagnostic type every compilation stage reports through.

use va_source::Span;

use crate::{DiagnosticCode, Label, Severity};

/// A single diagnostic: an error or warning, with its offending span and
/// any supporting labels/notes.
pub struct Diagnostic {
    /// How serious this diagnostic is.
    pub severity: Severity,
    /// The stable code identifying this diagnostic's kind.
    pub code: DiagnosticCode,
    /// The headline message.
    pub message: String,
    /// The span the diagnostic is anchored to for `file:line:col` printing.
    pub primary_span: Span,
    /// Additional annotated spans.
    pub labels: Vec<Label>,
    /// Free-form supplementary notes.
    pub notes: Vec<String>,
    /// Free-form suggestions for how to fix the problem.
    pub help: Vec<String>,
}

impl Diagnostic {
    /// Builds an error-severity diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, primary_span: Span) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            primary_span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Builds a warning-severity diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, primary_span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            primary_span,
            labels: Vec::new(),
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Attaches a label.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Attaches a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Attaches a help suggestion.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;
    use va_source::FileId;

    #[test]
    fn builds_error() {
        let span = Span::new(FileId::from_raw(0), 0, 1);
        let d = Diagnostic::error(DiagnosticCode::new(Category::Lower, 1), "undefined identifier 'x'", span);
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "undefined identifier 'x'");
    }

    #[test]
    fn builder_chain() {
        let span = Span::new(FileId::from_raw(0), 0, 1);
        let d = Diagnostic::warning(DiagnosticCode::new(Category::Parse, 2), "unused parameter", span.clone())
            .with_label(Label::secondary(span, "declared here"))
            .with_note("parameters must be referenced by name")
            .with_help("remove the parameter or use it in the analog block");
        assert_eq!(d.labels.len(), 1);
        assert_eq!(d.notes.len(), 1);
        assert_eq!(d.help.len(), 1);
    }
}
