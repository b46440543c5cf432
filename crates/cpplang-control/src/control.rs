//! The `Control` type: owns every canonicalization pool for one front-end
//! worker and is the factory every other stage goes through to produce
//! canonical names, canonical types, and (eventually) symbols.

use crate::literal::{Identifier, LiteralPool, NumericLiteral, StringLiteral};
use crate::name::NamePool;
use crate::ty::TypePool;
use cpplang_arena::Arena;
use cpplang_common::{Diagnostic, DiagnosticCategory, DiagnosticClient, NullDiagnosticClient, Position, Span};
use std::cell::{Cell, RefCell};

/// Opaque handle to a translation unit, assigned by the component that
/// owns `TranslationUnit`'s full definition. `Control` only needs to track
/// which one is current during nested processing (e.g. while an
/// `#include` is being processed within the same worker); it never needs
/// the concrete type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TranslationUnitId(pub u32);

/// Offered every top-level declaration as it's bound; returning `false`
/// skips further processing of that subtree. A cheap filter for clients
/// that only care about some constructs.
pub trait TopLevelDeclarationProcessor {
    fn process(&mut self, declaration_span: Span) -> bool;
}

static NULL_CLIENT: NullDiagnosticClient = NullDiagnosticClient;

/// Owns every canonicalization pool for one front-end worker: literal,
/// name, and type interning, plus diagnostic routing and the "current
/// translation unit" register.
///
/// A `Control` is meant to live for the lifetime of one worker's
/// TU-pipeline (`N` worker threads each run one TU-pipeline to
/// completion); canonicalization is per-`Control` and needs no
/// cross-thread synchronization.
pub struct Control<'ctrl> {
    arena: &'ctrl Arena,
    identifiers: LiteralPool<'ctrl, Identifier<'ctrl>>,
    string_literals: LiteralPool<'ctrl, StringLiteral<'ctrl>>,
    numeric_literals: LiteralPool<'ctrl, NumericLiteral<'ctrl>>,
    names: NamePool<'ctrl>,
    types: TypePool<'ctrl>,
    diagnostic_client: RefCell<&'ctrl dyn DiagnosticClient>,
    top_level_processor: RefCell<Option<Box<dyn TopLevelDeclarationProcessor + 'ctrl>>>,
    tu_stack: RefCell<Vec<TranslationUnitId>>,
    block_errors: Cell<bool>,
}

impl<'ctrl> Control<'ctrl> {
    /// Builds a `Control` whose literal/name/type pools allocate out of
    /// `arena`. The caller owns `arena` and must keep it alive at least as
    /// long as this `Control` (and anything it interns).
    #[must_use]
    pub fn new(arena: &'ctrl Arena) -> Self {
        Control {
            arena,
            identifiers: LiteralPool::new(),
            string_literals: LiteralPool::new(),
            numeric_literals: LiteralPool::new(),
            names: NamePool::new(),
            types: TypePool::new(),
            diagnostic_client: RefCell::new(&NULL_CLIENT),
            top_level_processor: RefCell::new(None),
            tu_stack: RefCell::new(Vec::new()),
            block_errors: Cell::new(false),
        }
    }

    #[must_use]
    pub fn arena(&self) -> &'ctrl Arena {
        self.arena
    }

    pub fn intern_identifier(&self, chars: &str) -> &'ctrl Identifier<'ctrl> {
        self.identifiers.intern(self.arena, chars)
    }

    pub fn intern_string_literal(&self, chars: &str) -> &'ctrl StringLiteral<'ctrl> {
        self.string_literals.intern(self.arena, chars)
    }

    pub fn intern_numeric_literal(&self, chars: &str) -> &'ctrl NumericLiteral<'ctrl> {
        self.numeric_literals.intern(self.arena, chars)
    }

    #[must_use]
    pub fn names(&self) -> &NamePool<'ctrl> {
        &self.names
    }

    #[must_use]
    pub fn types(&self) -> &TypePool<'ctrl> {
        &self.types
    }

    pub fn diagnostic_client_set(&self, client: &'ctrl dyn DiagnosticClient) {
        *self.diagnostic_client.borrow_mut() = client;
    }

    pub fn top_level_declaration_processor_set(&self, processor: Box<dyn TopLevelDeclarationProcessor + 'ctrl>) {
        *self.top_level_processor.borrow_mut() = Some(processor);
    }

    /// Offers `declaration_span` to the registered processor, if any.
    /// Defaults to `true` (process it) when none is registered.
    pub fn offer_top_level_declaration(&self, declaration_span: Span) -> bool {
        match self.top_level_processor.borrow_mut().as_mut() {
            Some(processor) => processor.process(declaration_span),
            None => true,
        }
    }

    /// Suppresses diagnostic reporting, without suppressing the work that
    /// would produce it, while `true`. Used during speculative/tentative
    /// parses that may be discarded.
    pub fn set_block_errors(&self, blocked: bool) {
        self.block_errors.set(blocked);
    }

    #[must_use]
    pub fn block_errors(&self) -> bool {
        self.block_errors.get()
    }

    pub fn report(
        &self,
        category: DiagnosticCategory,
        file: impl Into<String>,
        position: Position,
        message: impl Into<String>,
    ) {
        if self.block_errors.get() {
            return;
        }
        let diagnostic = Diagnostic::new(category, file, position, message);
        tracing::trace!(target: "cpplang::control", %diagnostic, "reporting diagnostic");
        self.diagnostic_client.borrow().report(diagnostic);
    }

    /// Replaces the current translation unit, returning the previous one
    /// (if any). An explicit stack, not an ambient global: nested
    /// `#include` processing pushes here and the caller restores on the
    /// way back out.
    pub fn switch_translation_unit(&self, tu: TranslationUnitId) -> Option<TranslationUnitId> {
        let previous = self.tu_stack.borrow().last().copied();
        self.tu_stack.borrow_mut().push(tu);
        previous
    }

    /// Pops back to the translation unit active before the matching
    /// `switch_translation_unit` call.
    pub fn restore_translation_unit(&self) -> Option<TranslationUnitId> {
        self.tu_stack.borrow_mut().pop()
    }

    #[must_use]
    pub fn current_translation_unit(&self) -> Option<TranslationUnitId> {
        self.tu_stack.borrow().last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_common::diagnostics::CollectingDiagnosticClient;

    #[test]
    fn diagnostics_route_through_the_registered_client() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let client = CollectingDiagnosticClient::new();
        control.diagnostic_client_set(&*client);
        control.report(DiagnosticCategory::Error, "a.cpp", Position::new(1, 1), "oops");
        assert_eq!(client.len(), 1);
    }

    #[test]
    fn block_errors_suppresses_reporting() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let client = CollectingDiagnosticClient::new();
        control.diagnostic_client_set(&*client);
        control.set_block_errors(true);
        control.report(DiagnosticCategory::Error, "a.cpp", Position::new(1, 1), "hidden");
        assert!(client.is_empty());
    }

    #[test]
    fn switch_translation_unit_is_an_explicit_stack() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let outer = TranslationUnitId(1);
        let inner = TranslationUnitId(2);
        assert_eq!(control.switch_translation_unit(outer), None);
        assert_eq!(control.switch_translation_unit(inner), Some(outer));
        assert_eq!(control.current_translation_unit(), Some(inner));
        assert_eq!(control.restore_translation_unit(), Some(inner));
        assert_eq!(control.current_translation_unit(), Some(outer));
    }

    #[test]
    fn top_level_processor_defaults_to_process_everything() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        assert!(control.offer_top_level_declaration(Span::new(0, 1)));
    }

    struct RejectAll;
    impl TopLevelDeclarationProcessor for RejectAll {
        fn process(&mut self, _declaration_span: Span) -> bool {
            false
        }
    }

    #[test]
    fn registered_processor_can_skip_subtrees() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        control.top_level_declaration_processor_set(Box::new(RejectAll));
        assert!(!control.offer_top_level_declaration(Span::new(0, 1)));
    }
}
