//! Crate-level boundary scenarios from the `#if 0` skip-include case.

use cpplang_arena::Arena;
use cpplang_common::diagnostics::CollectingDiagnosticClient;
use cpplang_common::FrontendOptions;
use cpplang_control::Control;
use cpplang_preprocessor::{IncludeKind, Preprocessor, SourceProvider};

struct PanicsIfAsked;
impl SourceProvider for PanicsIfAsked {
    fn source_needed(&mut self, file_name: &mut String, _kind: IncludeKind) -> Option<String> {
        panic!("source_needed invoked for {file_name} inside a dead #if branch");
    }
}

#[test]
fn dead_branch_include_is_never_resolved_and_raises_no_diagnostic() {
    let arena = Arena::new();
    let control = Control::new(&arena);
    let diagnostics = CollectingDiagnosticClient::new();
    control.diagnostic_client_set(&*diagnostics);

    let mut pp = Preprocessor::new(&control, &FrontendOptions::default());
    let out = pp.preprocess("#if 0\n#include \"missing.h\"\n#endif\nint alive = 1;\n", "a.cpp", &mut PanicsIfAsked);

    assert!(out.buffer.contains("alive"));
    assert!(diagnostics.is_empty());
}
