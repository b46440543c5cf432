//! Crate-level boundary scenario: `##` token pasting, end to end from
//! macro expansion through scanning. `cpplang-lexer` alone never pastes
//! tokens, so this is necessarily a two-crate integration test.

use cpplang_arena::Arena;
use cpplang_common::FrontendOptions;
use cpplang_control::Control;
use cpplang_lexer::{scan, TokenFlags, TokenKind};
use cpplang_preprocessor::Preprocessor;

struct NoIncludes;
impl cpplang_preprocessor::SourceProvider for NoIncludes {
    fn source_needed(&mut self, _file_name: &mut String, _kind: cpplang_preprocessor::IncludeKind) -> Option<String> {
        None
    }
}

#[test]
fn object_like_hash_hash_pastes_before_scanning() {
    let arena = Arena::new();
    let control = Control::new(&arena);
    let mut pp = Preprocessor::new(&control, &FrontendOptions::default());
    let out = pp.preprocess("#define FOO(a,b) a##b\nFOO(x,1)\n", "a.cpp", &mut NoIncludes);

    let result = scan(&out.buffer, "a.cpp", &control, FrontendOptions::default().lexer_flags);
    let pasted = result
        .tokens
        .iter()
        .find(|t| t.kind == TokenKind::Identifier && out.buffer[t.byte_offset as usize..(t.byte_offset + t.byte_length) as usize] == *"x1")
        .expect("pasted x1 identifier token");
    assert!(pasted.flags.contains(TokenFlags::GENERATED));
}
