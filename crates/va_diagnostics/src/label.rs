//! Span-anchored annotations attached to a diagnostic.

use va_source::Span;

/// Whether a label marks the main offending span or supplementary context.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LabelStyle {
    /// The span the diagnostic is primarily about.
    Primary,
    /// A related span shown for context (e.g. the first declaration in a
    /// "duplicate identifier" diagnostic).
    Secondary,
}

/// A span with an explanatory message, attached to a [`crate::Diagnostic`].
pub struct Label {
    /// The span being annotated.
    pub span: Span,
    /// The annotation text.
    pub message: String,
    /// Whether this is the diagnostic's main span or supporting context.
    pub style: LabelStyle,
}

impl Label {
    /// Builds a primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Builds a secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}
