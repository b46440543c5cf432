//! `TranslationUnit`: owns the token array the scanner produces, and
//! everything that needs the *whole* array rather than one token at a
//! time — brace matching, `>>` splitting, and mapping a buffer offset
//! back to a human-facing line/column/file.

use cpplang_common::{DiagnosticCategory, LexerFeatureFlags, LineMap, Position};
use cpplang_control::Control;
use cpplang_lexer::{scan, ByteRange, Marker, Token, TokenFlags, TokenKind, TokenPayload};
use rustc_hash::FxHashMap;

/// One `# line` marker's effect, recorded against the raw (preprocessed
/// buffer) line it took hold on.
#[derive(Debug, Clone)]
struct LineMarkerEntry {
    raw_line: u32,
    target_line: u32,
    file: String,
}

/// A fully resolved position: line, column, and originating file name,
/// after accounting for `#line`/expansion markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPosition {
    pub line: u32,
    pub column: u32,
    pub file: String,
}

/// Owns one translation unit's token array and the structures derived
/// from it after scanning: brace-match links, `>>` splitting, and
/// original-source position mapping across `#line`/expansion markers.
pub struct TranslationUnit<'ctrl> {
    file_name: String,
    source: String,
    tokens: Vec<Token<'ctrl>>,
    comments: Vec<ByteRange>,
    line_map: LineMap,
    pp_lines: Vec<LineMarkerEntry>,
    expanded_line_column: FxHashMap<u32, (u32, u32)>,
}

impl<'ctrl> TranslationUnit<'ctrl> {
    /// Scans `source` (already macro-expanded by the preprocessor) and
    /// builds every derived structure: brace matching runs immediately;
    /// position-mapping tables are built from the scanner's markers.
    #[must_use]
    pub fn new(file_name: impl Into<String>, source: impl Into<String>, control: &Control<'ctrl>, flags: LexerFeatureFlags) -> Self {
        let file_name = file_name.into();
        let source = source.into();
        let result = scan(&source, &file_name, control, flags);
        let line_map = LineMap::new(&source);

        let mut tokens = result.tokens;
        match_braces(&mut tokens);

        let pp_lines = result
            .markers
            .iter()
            .filter_map(|marker| match marker {
                Marker::Line { start_byte, line, file, .. } => {
                    let raw_line = line_map.position_at(&source, *start_byte).line;
                    Some(LineMarkerEntry {
                        raw_line,
                        target_line: *line,
                        file: file.clone(),
                    })
                }
                Marker::Expansion(_) => None,
            })
            .collect();

        let mut expanded_line_column = FxHashMap::default();
        for entry in &result.expanded_positions {
            if let Some(token) = tokens.get(entry.token_index as usize) {
                expanded_line_column.insert(token.utf16_offset, (entry.line, entry.column));
            }
        }

        tracing::debug!(
            target: "cpplang::tu",
            file = file_name,
            tokens = tokens.len(),
            markers = pp_lines.len(),
            "translation unit built"
        );

        TranslationUnit {
            file_name,
            source,
            tokens,
            comments: result.comments,
            line_map,
            pp_lines,
            expanded_line_column,
        }
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn tokens(&self) -> &[Token<'ctrl>] {
        &self.tokens
    }

    #[must_use]
    pub fn token(&self, index: u32) -> &Token<'ctrl> {
        &self.tokens[index as usize]
    }

    #[must_use]
    pub fn token_count(&self) -> u32 {
        self.tokens.len() as u32
    }

    #[must_use]
    pub fn eof_index(&self) -> u32 {
        self.tokens.len() as u32 - 1
    }

    #[must_use]
    pub fn comments(&self) -> &[ByteRange] {
        &self.comments
    }

    /// Text of the token at `index`, by its byte extent in the buffer.
    #[must_use]
    pub fn spelling(&self, index: u32) -> &str {
        let token = self.token(index);
        &self.source[token.byte_range()]
    }

    /// Resolves a UTF-16 buffer offset to the original source position,
    /// following the precedence the data model specifies: an exact
    /// `expanded_line_column` hit wins outright; otherwise the raw line is
    /// mapped through the nearest preceding `#line` marker.
    #[must_use]
    pub fn position_at(&self, utf16_offset: u32) -> ResolvedPosition {
        if let Some(&(line, column)) = self.expanded_line_column.get(&utf16_offset) {
            let file = self.marker_file_for_utf16_offset(utf16_offset).unwrap_or_else(|| self.file_name.clone());
            return ResolvedPosition { line, column, file };
        }

        let byte_offset = self.utf16_to_byte_offset(utf16_offset);
        let raw = self.line_map.position_at(&self.source, byte_offset);
        match self.nearest_marker(raw.line) {
            Some(marker) => ResolvedPosition {
                line: marker.target_line + (raw.line - marker.raw_line) - 1,
                column: raw.column,
                file: marker.file.clone(),
            },
            None => ResolvedPosition {
                line: raw.line,
                column: raw.column,
                file: self.file_name.clone(),
            },
        }
    }

    fn utf16_to_byte_offset(&self, utf16_offset: u32) -> u32 {
        self.tokens
            .iter()
            .find(|t| t.utf16_offset == utf16_offset)
            .map_or(utf16_offset, |t| t.byte_offset)
    }

    fn marker_file_for_utf16_offset(&self, utf16_offset: u32) -> Option<String> {
        let byte_offset = self.utf16_to_byte_offset(utf16_offset);
        let raw_line = self.line_map.position_at(&self.source, byte_offset).line;
        self.nearest_marker(raw_line).map(|m| m.file.clone())
    }

    fn nearest_marker(&self, raw_line: u32) -> Option<&LineMarkerEntry> {
        self.pp_lines.iter().filter(|m| m.raw_line <= raw_line).max_by_key(|m| m.raw_line)
    }

    /// Forces the `>>` token at `index` to split into two `>` tokens, the
    /// second marked `generated`, for template-argument-list closes like
    /// `vector<vector<int>>`. Any `close_brace` index pointing past the
    /// split shifts by one; an `expanded_line_column` entry on the
    /// original token is copied onto the synthetic one.
    pub fn split_greater_greater(&mut self, index: u32) {
        let index = index as usize;
        let original = self.tokens[index];
        assert_eq!(original.kind, TokenKind::GreaterGreater, "split_greater_greater called on a non->> token");

        let half_byte = original.byte_length / 2;
        let half_utf16 = original.utf16_length / 2;

        let mut first = original;
        first.kind = TokenKind::Greater;
        first.byte_length = half_byte;
        first.utf16_length = half_utf16;

        let mut second = Token::new(
            TokenKind::Greater,
            original.byte_offset + half_byte,
            original.utf16_offset + half_utf16,
            original.byte_length - half_byte,
            original.utf16_length - half_utf16,
        );
        second.flags = original.flags | TokenFlags::GENERATED;

        self.tokens[index] = first;
        self.tokens.insert(index + 1, second);

        for token in &mut self.tokens {
            if let TokenPayload::CloseBraceIndex(close) = token.payload {
                if close as usize > index {
                    token.payload = TokenPayload::CloseBraceIndex(close + 1);
                }
            }
        }

        if let Some(&position) = self.expanded_line_column.get(&original.utf16_offset) {
            self.expanded_line_column.insert(second.utf16_offset, position);
        }
    }

    /// Reports a diagnostic against the resolved position of `utf16_offset`.
    pub fn report(&self, control: &Control, category: DiagnosticCategory, utf16_offset: u32, message: impl Into<String>) {
        let resolved = self.position_at(utf16_offset);
        control.report(category, resolved.file.clone(), Position::new(resolved.line, resolved.column), message);
    }
}

/// Pairs every `{`/`}` token by index: `tokens[open].payload` becomes
/// `CloseBraceIndex(close)`. Unmatched opens at end of scan pair with the
/// trailing `Eof` token's index.
fn match_braces(tokens: &mut [Token]) {
    let eof_index = tokens.len().saturating_sub(1) as u32;
    let mut open_stack: Vec<usize> = Vec::new();

    for index in 0..tokens.len() {
        match tokens[index].kind {
            TokenKind::LeftBrace => open_stack.push(index),
            TokenKind::RightBrace => {
                if let Some(open) = open_stack.pop() {
                    tokens[open].payload = TokenPayload::CloseBraceIndex(index as u32);
                }
            }
            _ => {}
        }
    }

    for open in open_stack {
        tokens[open].payload = TokenPayload::CloseBraceIndex(eof_index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_arena::Arena;

    fn build<'ctrl>(source: &str, control: &Control<'ctrl>) -> TranslationUnit<'ctrl> {
        TranslationUnit::new("test.cpp", source, control, LexerFeatureFlags::default())
    }

    #[test]
    fn braces_match_across_nesting() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let tu = build("void f() { if (x) { y(); } }", &control);
        let outer_brace = tu.tokens().iter().position(|t| t.kind == TokenKind::LeftBrace).unwrap();
        let close = tu.token(outer_brace as u32).close_brace().unwrap();
        assert_eq!(tu.token(close).kind, TokenKind::RightBrace);
    }

    #[test]
    fn unmatched_open_brace_pairs_with_eof() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let tu = build("void f() {", &control);
        let open = tu.tokens().iter().position(|t| t.kind == TokenKind::LeftBrace).unwrap();
        assert_eq!(tu.token(open as u32).close_brace(), Some(tu.eof_index()));
    }

    #[test]
    fn split_greater_greater_produces_two_greater_tokens() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let mut tu = build("a<b<c>>", &control);
        let gg = tu.tokens().iter().position(|t| t.kind == TokenKind::GreaterGreater).unwrap() as u32;
        tu.split_greater_greater(gg);
        assert_eq!(tu.token(gg).kind, TokenKind::Greater);
        assert_eq!(tu.token(gg + 1).kind, TokenKind::Greater);
        assert!(tu.token(gg + 1).has_flag(TokenFlags::GENERATED));
    }

    #[test]
    fn line_marker_shifts_reported_line_number() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let tu = build("# line 100 \"included.h\"\nint x;", &control);
        let int_token = tu.tokens().iter().position(|t| t.kind == TokenKind::KwInt).unwrap() as u32;
        let offset = tu.token(int_token).utf16_offset;
        let resolved = tu.position_at(offset);
        assert_eq!(resolved.line, 100);
        assert_eq!(resolved.file, "included.h");
    }

    #[test]
    fn spelling_reads_back_the_original_token_text() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let tu = build("int x;", &control);
        assert_eq!(tu.spelling(0), "int");
    }
}
