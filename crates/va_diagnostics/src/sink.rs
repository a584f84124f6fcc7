//! Thread-safe accumulation point for diagnostics emitted during compilation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::Diagnostic;

/// Collects diagnostics emitted by any compilation stage.
///
/// Shared by reference through the pipeline so that, e.g., lowering can
/// keep going after an undefined-identifier error to report further
/// problems in the same pass, while still tracking that at least one error
/// occurred.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    /// Records a diagnostic, bumping the error counter if it is
    /// error-severity.
    pub fn emit(&self, diagnostic: Diagnostic) {
        if diagnostic.severity.is_error() {
            self.error_count.fetch_add(1, Ordering::SeqCst);
        }
        self.diagnostics.lock().unwrap().push(diagnostic);
    }

    /// Whether any error-severity diagnostic has been emitted.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::SeqCst) > 0
    }

    /// The number of error-severity diagnostics emitted so far.
    ///
    /// Note this counter is not reset by [`Self::take_all`] — it reflects
    /// the lifetime total, which is what callers checking "did compilation
    /// fail overall" want.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::SeqCst)
    }

    /// Drains and returns all diagnostics recorded so far.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics.lock().unwrap())
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};
    use va_source::{FileId, Span};

    fn dummy_error() -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Lex, 1),
            "unexpected character",
            Span::new(FileId::from_raw(0), 0, 1),
        )
    }

    #[test]
    fn emit_tracks_errors() {
        let sink = DiagnosticSink::new();
        assert!(!sink.has_errors());
        sink.emit(dummy_error());
        assert!(sink.has_errors());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(dummy_error());
        let taken = sink.take_all();
        assert_eq!(taken.len(), 1);
        assert!(sink.take_all().is_empty());
        // error_count is not reset by take_all.
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn concurrent_emit() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let mut handles = Vec::new();
        for _ in 0..10 {
            let sink = Arc::clone(&sink);
            handles.push(thread::spawn(move || {
                for _ in 0..100 {
                    sink.emit(dummy_error());
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(sink.error_count(), 1000);
    }
}
