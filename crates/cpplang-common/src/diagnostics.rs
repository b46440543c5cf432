//! Diagnostics and the pluggable sink front-end components report through.
//!
//! Every stage (Preprocessor, Lexer, Parser, Binder) is tolerant by
//! construction: malformed input produces a diagnostic and processing
//! continues, except for a small set of fatal conditions (e.g. a
//! non-existent top-level source file) that abandon only the current
//! translation unit. Nothing here ever panics on malformed input.

use crate::position::Position;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Severity of a reported diagnostic.
///
/// `Fatal` abandons the current translation unit; `Warning` and `Error`
/// never halt processing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Fatal => "fatal error",
        };
        f.write_str(s)
    }
}

/// One reported problem, already formatted for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub file: String,
    pub position: Position,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        category: DiagnosticCategory,
        file: impl Into<String>,
        position: Position,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            category,
            file: file.into(),
            position,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn warning(file: impl Into<String>, position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Warning, file, position, message)
    }

    #[must_use]
    pub fn error(file: impl Into<String>, position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Error, file, position, message)
    }

    #[must_use]
    pub fn fatal(file: impl Into<String>, position: Position, message: impl Into<String>) -> Self {
        Self::new(DiagnosticCategory::Fatal, file, position, message)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.file, self.position, self.category, self.message
        )
    }
}

/// Receives diagnostics as they are raised during preprocessing, lexing,
/// parsing and binding.
///
/// Front-end stages hold a `&dyn DiagnosticClient`, never a concrete sink,
/// so a host (CLI, LSP server, test harness) can route diagnostics however
/// it wants. Implementations must not block or panic: this is called from
/// deep inside hot parsing loops.
pub trait DiagnosticClient {
    fn report(&self, diagnostic: Diagnostic);
}

/// A `DiagnosticClient` that discards everything. Useful for benchmarks and
/// for components (like the arena allocator) that never need to report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiagnosticClient;

impl DiagnosticClient for NullDiagnosticClient {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// A `DiagnosticClient` that accumulates everything reported to it, for
/// tests and for hosts that want to batch-print at the end of a run.
#[derive(Debug, Default)]
pub struct CollectingDiagnosticClient {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnosticClient {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics.lock().expect("diagnostics mutex poisoned"))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.lock().expect("diagnostics mutex poisoned").len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .lock()
            .expect("diagnostics mutex poisoned")
            .iter()
            .any(|d| matches!(d.category, DiagnosticCategory::Error | DiagnosticCategory::Fatal))
    }
}

impl DiagnosticClient for CollectingDiagnosticClient {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::debug!(target: "cpplang::diagnostics", %diagnostic, "reported");
        self.diagnostics
            .lock()
            .expect("diagnostics mutex poisoned")
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_client_preserves_order() {
        let client = CollectingDiagnosticClient::new();
        client.report(Diagnostic::warning("a.cpp", Position::new(1, 1), "first"));
        client.report(Diagnostic::error("a.cpp", Position::new(2, 1), "second"));
        let collected = client.take();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].message, "first");
        assert_eq!(collected[1].category, DiagnosticCategory::Error);
    }

    #[test]
    fn has_errors_ignores_warnings() {
        let client = CollectingDiagnosticClient::new();
        client.report(Diagnostic::warning("a.cpp", Position::new(1, 1), "w"));
        assert!(!client.has_errors());
        client.report(Diagnostic::fatal("a.cpp", Position::new(1, 1), "f"));
        assert!(client.has_errors());
    }

    #[test]
    fn display_matches_file_position_category_message() {
        let d = Diagnostic::error("a.cpp", Position::new(3, 5), "unexpected token");
        assert_eq!(format!("{d}"), "a.cpp:3:5: error: unexpected token");
    }
}
