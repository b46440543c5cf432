//! A pragmatic recursive-descent parser: not a full C++ grammar, just
//! enough of declaration, statement, expression, class, template,
//! Objective-C, and Qt syntax for `cpplang-binder` to walk real trees.
//! Anything this parser doesn't recognize is skipped to the next
//! statement or declaration boundary and reported as a diagnostic rather
//! than aborting the whole translation unit.

mod decl;
mod expr;
mod objc;
mod qt;
mod stmt;

use cpplang_arena::{Arena, List};
use cpplang_ast::{DeclarationAst, TranslationUnitAst};
use cpplang_common::limits::MAX_PARSE_RECURSION_DEPTH;
use cpplang_common::DiagnosticCategory;
use cpplang_control::Control;
use cpplang_lexer::TokenKind;
use cpplang_tu::TranslationUnit;

/// Parses one translation unit's token array into an arena-allocated AST.
///
/// Holds the translation unit mutably: closing a template-argument list
/// or a named cast's angle brackets against a `>>` token calls
/// [`TranslationUnit::split_greater_greater`] to turn it into two `>`
/// tokens in place, the same way the original `vector<vector<int>>`
/// ambiguity is resolved wherever it's reached (not just inside
/// templates).
pub struct Parser<'a, 'ctrl> {
    tu: &'a mut TranslationUnit<'ctrl>,
    control: &'a Control<'ctrl>,
    arena: &'ctrl Arena,
    pos: u32,
    depth: u32,
}

/// Parses every declaration in `tu`, recovering past anything malformed.
///
/// Never fails outright: a translation unit with unrecognized syntax
/// still returns whatever declarations could be parsed, with diagnostics
/// reported through `control` for the rest.
#[must_use]
pub fn parse_translation_unit<'a, 'ctrl>(
    tu: &'a mut TranslationUnit<'ctrl>,
    control: &'a Control<'ctrl>,
) -> TranslationUnitAst<'ctrl> {
    let mut parser = Parser::new(tu, control);
    parser.parse_translation_unit()
}

impl<'a, 'ctrl> Parser<'a, 'ctrl> {
    fn new(tu: &'a mut TranslationUnit<'ctrl>, control: &'a Control<'ctrl>) -> Self {
        Parser {
            tu,
            control,
            arena: control.arena(),
            pos: 0,
            depth: 0,
        }
    }

    fn parse_translation_unit(&mut self) -> TranslationUnitAst<'ctrl> {
        let mut declarations: List<&DeclarationAst> = self.arena.new_list();
        while !self.at_eof() {
            let before = self.pos;
            if let Some(declaration) = self.parse_declaration() {
                declarations.push(self.arena.alloc(declaration));
            }
            if self.pos == before {
                // No production consumed a token; force progress so a
                // single unrecognized token can't loop forever.
                self.bump();
            }
        }
        tracing::debug!(
            target: "cpplang::parser",
            file = self.tu.file_name(),
            declarations = declarations.len(),
            "translation unit parsed"
        );
        TranslationUnitAst {
            declarations: declarations.into_bump_slice(),
        }
    }

    // --- token cursor -------------------------------------------------

    pub(crate) fn kind(&self) -> TokenKind {
        self.tu.token(self.pos).kind
    }

    pub(crate) fn kind_at(&self, offset: u32) -> TokenKind {
        let index = self.pos + offset;
        if index >= self.tu.token_count() {
            TokenKind::Eof
        } else {
            self.tu.token(index).kind
        }
    }

    pub(crate) fn at_eof(&self) -> bool {
        self.kind() == TokenKind::Eof
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub(crate) fn pos(&self) -> u32 {
        self.pos
    }

    pub(crate) fn spelling(&self) -> &str {
        self.tu.spelling(self.pos)
    }

    pub(crate) fn spelling_at(&self, index: u32) -> &str {
        self.tu.spelling(index)
    }

    /// Whether the identifier under the cursor spells `text` exactly.
    /// Used for Qt macros (`Q_PROPERTY`, `Q_ENUMS`, `Q_FLAGS`) that the
    /// lexer has no dedicated token kind for.
    pub(crate) fn at_identifier(&self, text: &str) -> bool {
        self.at(TokenKind::Identifier) && self.spelling() == text
    }

    pub(crate) fn bump(&mut self) -> u32 {
        let index = self.pos;
        if !self.at_eof() {
            self.pos += 1;
        }
        index
    }

    /// Consumes the current token if it matches `kind`, returning its
    /// index.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<u32> {
        if self.at(kind) {
            Some(self.bump())
        } else {
            None
        }
    }

    /// Consumes a token expected to be `kind`; reports and keeps the
    /// cursor in place (so the caller can still attempt recovery) if it
    /// isn't there.
    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> u32 {
        if let Some(index) = self.eat(kind) {
            return index;
        }
        self.error(self.pos, format!("expected {what}"));
        self.pos
    }

    /// Consumes a single `>` closing an angle-bracket construct
    /// (template-argument list, named-cast type). A `>>` token under the
    /// cursor is split in place so this call only consumes the first
    /// half, leaving the second `>` for whichever enclosing construct
    /// needs it.
    pub(crate) fn expect_angle_close(&mut self, what: &str) -> u32 {
        if let Some(index) = self.eat(TokenKind::Greater) {
            return index;
        }
        if self.at(TokenKind::GreaterGreater) {
            self.tu.split_greater_greater(self.pos);
            return self.bump();
        }
        self.error(self.pos, format!("expected {what}"));
        self.pos
    }

    pub(crate) fn error(&self, at: u32, message: impl Into<String>) {
        let at = at.min(self.tu.token_count().saturating_sub(1));
        self.tu.report(self.control, DiagnosticCategory::Error, self.tu.token(at).utf16_offset, message);
    }

    /// Guards a recursive production: reports and returns `false` once
    /// nesting exceeds the bound rather than overflowing the stack on
    /// adversarial input. Every caller must pair this with [`Self::leave`].
    pub(crate) fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_PARSE_RECURSION_DEPTH {
            self.error(self.pos, "exceeded maximum nesting depth");
            false
        } else {
            true
        }
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Skips forward to (and past) the next `;` at the current nesting
    /// level, or to a `}`/`Eof` if none is found first. Used after a
    /// declaration fails to parse.
    pub(crate) fn recover_to_declaration_boundary(&mut self) {
        let mut depth = 0u32;
        loop {
            match self.kind() {
                TokenKind::Eof => return,
                TokenKind::LeftBrace => {
                    depth += 1;
                    self.bump();
                }
                TokenKind::RightBrace => {
                    if depth == 0 {
                        return;
                    }
                    depth -= 1;
                    self.bump();
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Skips to the next statement boundary within the current compound
    /// statement: a `;` at depth zero, or a `}` that closes it.
    pub(crate) fn recover_to_statement_boundary(&mut self) {
        self.recover_to_declaration_boundary();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_arena::Arena;
    use cpplang_common::FrontendOptions;
    use cpplang_control::Control;

    fn parse(source: &str) -> usize {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let options = FrontendOptions::default();
        let mut tu = TranslationUnit::new("test.cpp", source, &control, options.lexer_flags);
        let ast = parse_translation_unit(&mut tu, &control);
        ast.declarations.len()
    }

    #[test]
    fn empty_source_parses_to_no_declarations() {
        assert_eq!(parse(""), 0);
    }

    #[test]
    fn stray_semicolons_are_empty_declarations() {
        assert_eq!(parse(";;;"), 3);
    }

    #[test]
    fn garbage_token_does_not_loop_forever() {
        // `)` alone starts no production; the unit test is really about
        // termination, not about what gets reported.
        assert_eq!(parse(")"), 0);
    }
}
