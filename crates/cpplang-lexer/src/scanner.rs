//! The hand-written character scanner.
//!
//! Dispatches on one to three characters of lookahead to find the longest
//! matching token. Comments are captured into a side list rather than the
//! main token stream (tooling consumers read them separately); the
//! preprocessor's embedded `# line` / `# expansion` marker lines are
//! consumed as metadata, never emitted as tokens, and drive the `newline`/
//! `expanded`/`generated` flags and position overrides on the tokens that
//! follow them.

use crate::keywords;
use crate::token::{Token, TokenFlags, TokenKind, TokenPayload};
use cpplang_common::{LexerFeatureFlags, LineMap};
use cpplang_control::Control;
use std::collections::VecDeque;

/// A `[start, end)` byte range in the scanned buffer, used for comment
/// extents. Unlike [`cpplang_common::Span`] (a *token-index* range), this
/// addresses raw source bytes directly, since comments never become
/// tokens in the main array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u32,
    pub end: u32,
}

/// A `# line N "FILE"` or `# expansion ...` marker recognized in the
/// scanned buffer, and the token index it applies from.
#[derive(Debug, Clone)]
pub enum Marker {
    Line {
        at_token: u32,
        /// Byte offset of the `#` that introduced this marker, i.e. the
        /// directive's own raw line — the anchor `cpplang-tu` remaps
        /// `#line`-shifted positions from.
        start_byte: u32,
        line: u32,
        file: String,
    },
    Expansion(ExpansionBlock),
}

/// One parsed `# expansion OFFSET,LENGTH\n<data>\n# expansion end\n` block.
#[derive(Debug, Clone)]
pub struct ExpansionBlock {
    pub at_token: u32,
    pub offset: u32,
    pub length: u32,
    pub entries: Vec<ExpansionEntry>,
}

/// One space-separated entry from an expansion block's data line.
#[derive(Debug, Clone, Copy)]
pub enum ExpansionEntry {
    /// `LINE:COL` — the next token's true original position.
    Position { line: u32, column: u32 },
    /// `~N` — the next `N` tokens are pure generator output with no
    /// original position.
    Generated(u32),
}

/// A position override recorded for one expanded token, keyed by its
/// index in the returned token array.
#[derive(Debug, Clone, Copy)]
pub struct ExpandedPosition {
    pub token_index: u32,
    pub line: u32,
    pub column: u32,
}

/// Everything the scanner produced from one buffer.
pub struct ScanResult<'ctrl> {
    pub tokens: Vec<Token<'ctrl>>,
    pub comments: Vec<ByteRange>,
    pub markers: Vec<Marker>,
    pub expanded_positions: Vec<ExpandedPosition>,
}

struct Cursor<'a> {
    source: &'a str,
    len: usize,
    byte_pos: usize,
    utf16_pos: u32,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Cursor {
            source,
            len: source.len(),
            byte_pos: 0,
            utf16_pos: 0,
        }
    }

    fn is_eof(&self) -> bool {
        self.byte_pos >= self.len
    }

    fn rest(&self) -> &'a str {
        &self.source[self.byte_pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.byte_pos += ch.len_utf8();
        self.utf16_pos += ch.len_utf16() as u32;
        Some(ch)
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.rest().starts_with(needle)
    }

    fn bump_str(&mut self, s: &str) {
        for ch in s.chars() {
            self.byte_pos += ch.len_utf8();
            self.utf16_pos += ch.len_utf16() as u32;
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_alphanumeric()
}

/// Scans `source` (the already-preprocessed byte stream for `file_name`)
/// into a flat token array under the given dialect `flags`.
pub fn scan<'ctrl>(source: &str, file_name: &str, control: &Control<'ctrl>, flags: LexerFeatureFlags) -> ScanResult<'ctrl> {
    tracing::trace!(target: "cpplang::lexer", file_name, bytes = source.len(), "scanning");
    let line_map = LineMap::new(source);
    let mut cursor = Cursor::new(source);
    let mut tokens: Vec<Token<'ctrl>> = Vec::new();
    let mut comments = Vec::new();
    let mut markers = Vec::new();
    let mut expanded_positions = Vec::new();
    let mut pending_expansion: VecDeque<ExpansionEntry> = VecDeque::new();
    let mut at_line_start = true;

    loop {
        let mut pending_flags = TokenFlags::empty();

        loop {
            match cursor.peek() {
                Some('\n') => {
                    cursor.bump();
                    pending_flags |= TokenFlags::NEWLINE;
                    at_line_start = true;
                }
                Some('\\') if cursor.peek_at(1) == Some('\n') => {
                    cursor.bump();
                    cursor.bump();
                    pending_flags |= TokenFlags::JOINED;
                }
                Some(c) if c.is_whitespace() => {
                    cursor.bump();
                    pending_flags |= TokenFlags::WHITESPACE;
                }
                _ => break,
            }
        }

        if cursor.is_eof() {
            let mut eof = Token::new(TokenKind::Eof, cursor.byte_pos as u32, cursor.utf16_pos, 0, 0);
            eof.flags = pending_flags;
            tokens.push(eof);
            break;
        }

        if at_line_start && cursor.peek() == Some('#') {
            if let Some(marker) = try_scan_marker(&mut cursor, tokens.len() as u32) {
                if let Marker::Expansion(ref block) = marker {
                    pending_expansion = block.entries.iter().copied().collect();
                }
                markers.push(marker);
                continue;
            }
        }
        at_line_start = false;

        let start_byte = cursor.byte_pos as u32;
        let start_utf16 = cursor.utf16_pos;
        let ch = cursor.peek().expect("checked not eof above");

        if ch == '/' && cursor.peek_at(1) == Some('/') {
            while let Some(c) = cursor.peek() {
                if c == '\n' {
                    break;
                }
                cursor.bump();
            }
            comments.push(ByteRange { start: start_byte, end: cursor.byte_pos as u32 });
            if flags.contains(LexerFeatureFlags::SCAN_COMMENT_TOKENS) {
                let mut token = Token::new(
                    TokenKind::Comment,
                    start_byte,
                    start_utf16,
                    cursor.byte_pos as u32 - start_byte,
                    cursor.utf16_pos - start_utf16,
                );
                token.flags = pending_flags;
                tokens.push(token);
            }
            continue;
        }

        if ch == '/' && cursor.peek_at(1) == Some('*') {
            cursor.bump();
            cursor.bump();
            while !cursor.is_eof() && !cursor.starts_with("*/") {
                cursor.bump();
            }
            if cursor.starts_with("*/") {
                cursor.bump();
                cursor.bump();
            } else {
                report_scan_error(control, &line_map, source, file_name, start_byte, "unterminated comment");
            }
            comments.push(ByteRange { start: start_byte, end: cursor.byte_pos as u32 });
            if flags.contains(LexerFeatureFlags::SCAN_COMMENT_TOKENS) {
                let mut token = Token::new(
                    TokenKind::Comment,
                    start_byte,
                    start_utf16,
                    cursor.byte_pos as u32 - start_byte,
                    cursor.utf16_pos - start_utf16,
                );
                token.flags = pending_flags;
                tokens.push(token);
            }
            continue;
        }

        let (kind, payload) = if ch == '@' {
            cursor.bump();
            scan_at_keyword(&mut cursor, flags)
        } else if is_ident_start(ch) {
            scan_identifier_like(&mut cursor, control, flags)
        } else if ch.is_ascii_digit() || (ch == '.' && cursor.peek_at(1).is_some_and(|c| c.is_ascii_digit())) {
            scan_number(&mut cursor, control)
        } else if ch == '"' {
            scan_string_literal(&mut cursor, control, None)
        } else if ch == '\'' {
            scan_char_literal(&mut cursor, control)
        } else {
            (scan_punctuator(&mut cursor), TokenPayload::None)
        };

        let end_byte = cursor.byte_pos as u32;
        let end_utf16 = cursor.utf16_pos;
        let mut token = Token::new(kind, start_byte, start_utf16, end_byte - start_byte, end_utf16 - start_utf16);
        token.flags = pending_flags;
        token.payload = payload;

        apply_expansion_state(&mut token, tokens.len() as u32, &mut pending_expansion, &mut expanded_positions);

        tokens.push(token);
    }

    ScanResult {
        tokens,
        comments,
        markers,
        expanded_positions,
    }
}

fn apply_expansion_state(
    token: &mut Token,
    token_index: u32,
    pending: &mut VecDeque<ExpansionEntry>,
    expanded_positions: &mut Vec<ExpandedPosition>,
) {
    let Some(entry) = pending.front_mut() else {
        return;
    };
    token.flags |= TokenFlags::EXPANDED;
    match *entry {
        ExpansionEntry::Position { line, column } => {
            expanded_positions.push(ExpandedPosition { token_index, line, column });
            pending.pop_front();
        }
        ExpansionEntry::Generated(remaining) => {
            token.flags |= TokenFlags::GENERATED;
            if remaining <= 1 {
                pending.pop_front();
            } else {
                *entry = ExpansionEntry::Generated(remaining - 1);
            }
        }
    }
}

fn report_scan_error(control: &Control, line_map: &LineMap, source: &str, file_name: &str, byte_offset: u32, message: &str) {
    let position = line_map.position_at(source, byte_offset);
    control.report(cpplang_common::DiagnosticCategory::Error, file_name, position, message.to_string());
}

/// Attempts to consume a `# line ...` or `# expansion ...` marker starting
/// at the current (line-start) position. Leaves the cursor untouched and
/// returns `None` if what follows isn't a recognized marker.
fn try_scan_marker(cursor: &mut Cursor, at_token: u32) -> Option<Marker> {
    let start_byte = cursor.byte_pos as u32;
    let checkpoint = (cursor.byte_pos, cursor.utf16_pos);
    cursor.bump(); // '#'
    while cursor.peek() == Some(' ') {
        cursor.bump();
    }

    if cursor.starts_with("line ") {
        cursor.bump_str("line ");
        let mut digits = String::new();
        while let Some(c) = cursor.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                cursor.bump();
            } else {
                break;
            }
        }
        while cursor.peek() == Some(' ') {
            cursor.bump();
        }
        let file = if cursor.peek() == Some('"') {
            cursor.bump();
            let mut name = String::new();
            while let Some(c) = cursor.peek() {
                if c == '"' {
                    cursor.bump();
                    break;
                }
                name.push(c);
                cursor.bump();
            }
            name
        } else {
            String::new()
        };
        skip_to_next_line(cursor);
        return Some(Marker::Line {
            at_token,
            start_byte,
            line: digits.parse().unwrap_or(1),
            file,
        });
    }

    if cursor.starts_with("expansion ") {
        cursor.bump_str("expansion ");
        let mut offset_digits = String::new();
        while let Some(c) = cursor.peek() {
            if c.is_ascii_digit() {
                offset_digits.push(c);
                cursor.bump();
            } else {
                break;
            }
        }
        let offset: u32 = offset_digits.parse().unwrap_or(0);
        let mut length = 0u32;
        if cursor.peek() == Some(',') {
            cursor.bump();
            let mut length_digits = String::new();
            while let Some(c) = cursor.peek() {
                if c.is_ascii_digit() {
                    length_digits.push(c);
                    cursor.bump();
                } else {
                    break;
                }
            }
            length = length_digits.parse().unwrap_or(0);
        }
        skip_to_next_line(cursor);

        let mut data_line = String::new();
        while let Some(c) = cursor.peek() {
            if c == '\n' {
                break;
            }
            data_line.push(c);
            cursor.bump();
        }
        let entries = parse_expansion_entries(&data_line);
        skip_to_next_line(cursor);

        while cursor.peek() == Some(' ') {
            cursor.bump();
        }
        if cursor.starts_with("# expansion end") {
            cursor.bump_str("# expansion end");
            skip_to_next_line(cursor);
        }

        return Some(Marker::Expansion(ExpansionBlock {
            at_token,
            offset,
            length,
            entries,
        }));
    }

    // Not a recognized marker: rewind and let normal scanning handle `#`.
    cursor.byte_pos = checkpoint.0;
    cursor.utf16_pos = checkpoint.1;
    None
}

fn skip_to_next_line(cursor: &mut Cursor) {
    while let Some(c) = cursor.peek() {
        if c == '\n' {
            cursor.bump();
            break;
        }
        cursor.bump();
    }
}

fn parse_expansion_entries(data_line: &str) -> Vec<ExpansionEntry> {
    data_line
        .split_whitespace()
        .filter_map(|field| {
            if let Some(rest) = field.strip_prefix('~') {
                rest.parse::<u32>().ok().map(ExpansionEntry::Generated)
            } else {
                let (line, column) = field.split_once(':')?;
                Some(ExpansionEntry::Position {
                    line: line.parse().ok()?,
                    column: column.parse().ok()?,
                })
            }
        })
        .collect()
}

fn scan_at_keyword<'ctrl>(cursor: &mut Cursor, flags: LexerFeatureFlags) -> (TokenKind, TokenPayload<'ctrl>) {
    if flags.contains(LexerFeatureFlags::OBJC_ENABLED) && cursor.peek().is_some_and(is_ident_start) {
        let mut spelling = String::new();
        while let Some(c) = cursor.peek() {
            if is_ident_continue(c) {
                spelling.push(c);
                cursor.bump();
            } else {
                break;
            }
        }
        if let Some(kind) = keywords::classify_objc(&spelling, flags) {
            return (kind, TokenPayload::None);
        }
    }
    (TokenKind::At, TokenPayload::None)
}

fn scan_identifier_like<'ctrl>(cursor: &mut Cursor, control: &Control<'ctrl>, flags: LexerFeatureFlags) -> (TokenKind, TokenPayload<'ctrl>) {
    let mut spelling = String::new();
    while let Some(c) = cursor.peek() {
        if is_ident_continue(c) {
            spelling.push(c);
            cursor.bump();
        } else {
            break;
        }
    }

    let is_string_prefix = matches!(spelling.as_str(), "L" | "u" | "U" | "u8" | "R" | "LR" | "uR" | "UR" | "u8R");
    if is_string_prefix && cursor.peek() == Some('"') {
        return scan_string_literal(cursor, control, Some(spelling.as_str()));
    }
    if is_string_prefix && !spelling.ends_with('R') && cursor.peek() == Some('\'') {
        return scan_char_literal(cursor, control);
    }

    match keywords::classify(&spelling, flags) {
        Some(kind) => (kind, TokenPayload::None),
        None => (TokenKind::Identifier, TokenPayload::Identifier(control.intern_identifier(&spelling))),
    }
}

fn scan_number<'ctrl>(cursor: &mut Cursor, control: &Control<'ctrl>) -> (TokenKind, TokenPayload<'ctrl>) {
    let mut spelling = String::new();
    let mut is_float = false;

    if cursor.peek() == Some('0') && matches!(cursor.peek_at(1), Some('x') | Some('X')) {
        spelling.push(cursor.bump().unwrap());
        spelling.push(cursor.bump().unwrap());
        while let Some(c) = cursor.peek() {
            if c.is_ascii_hexdigit() {
                spelling.push(c);
                cursor.bump();
            } else {
                break;
            }
        }
    } else {
        while let Some(c) = cursor.peek() {
            if c.is_ascii_digit() {
                spelling.push(c);
                cursor.bump();
            } else {
                break;
            }
        }
        if cursor.peek() == Some('.') {
            is_float = true;
            spelling.push(cursor.bump().unwrap());
            while let Some(c) = cursor.peek() {
                if c.is_ascii_digit() {
                    spelling.push(c);
                    cursor.bump();
                } else {
                    break;
                }
            }
        }
        if matches!(cursor.peek(), Some('e') | Some('E')) {
            is_float = true;
            spelling.push(cursor.bump().unwrap());
            if matches!(cursor.peek(), Some('+') | Some('-')) {
                spelling.push(cursor.bump().unwrap());
            }
            while let Some(c) = cursor.peek() {
                if c.is_ascii_digit() {
                    spelling.push(c);
                    cursor.bump();
                } else {
                    break;
                }
            }
        }
    }

    while let Some(c) = cursor.peek() {
        if matches!(c, 'u' | 'U' | 'l' | 'L' | 'f' | 'F') {
            if c == 'f' || c == 'F' {
                is_float = true;
            }
            spelling.push(c);
            cursor.bump();
        } else {
            break;
        }
    }

    let kind = if is_float { TokenKind::FloatLiteral } else { TokenKind::IntegerLiteral };
    let literal = control.intern_numeric_literal(&spelling);
    (kind, TokenPayload::NumericLiteral(literal))
}

fn scan_string_literal<'ctrl>(cursor: &mut Cursor, control: &Control<'ctrl>, prefix: Option<&str>) -> (TokenKind, TokenPayload<'ctrl>) {
    let is_raw = prefix.is_some_and(|p| p.ends_with('R'));
    let mut spelling = String::new();
    if let Some(p) = prefix {
        spelling.push_str(p);
    }

    if is_raw {
        spelling.push(cursor.bump().unwrap()); // opening quote
        let mut delimiter = String::new();
        while let Some(c) = cursor.peek() {
            if c == '(' {
                break;
            }
            delimiter.push(c);
            spelling.push(c);
            cursor.bump();
        }
        if cursor.peek() == Some('(') {
            spelling.push(cursor.bump().unwrap());
        }
        let closer = format!("){delimiter}\"");
        loop {
            if cursor.is_eof() {
                break;
            }
            if cursor.starts_with(&closer) {
                cursor.bump_str(&closer);
                spelling.push_str(&closer);
                break;
            }
            if let Some(c) = cursor.peek() {
                spelling.push(c);
                cursor.bump();
            }
        }
        let literal = control.intern_string_literal(&spelling);
        return (TokenKind::RawStringLiteral, TokenPayload::StringLiteral(literal));
    }

    spelling.push(cursor.bump().unwrap()); // opening quote
    loop {
        match cursor.peek() {
            None | Some('\n') => break,
            Some('"') => {
                spelling.push(cursor.bump().unwrap());
                break;
            }
            Some('\\') => {
                spelling.push(cursor.bump().unwrap());
                if let Some(escaped) = cursor.peek() {
                    spelling.push(escaped);
                    cursor.bump();
                }
            }
            Some(c) => {
                spelling.push(c);
                cursor.bump();
            }
        }
    }

    let kind = match prefix {
        Some("L") => TokenKind::WideStringLiteral,
        Some("u") => TokenKind::Utf16StringLiteral,
        Some("U") => TokenKind::Utf32StringLiteral,
        Some("u8") => TokenKind::Utf8StringLiteral,
        _ => TokenKind::StringLiteral,
    };
    let literal = control.intern_string_literal(&spelling);
    (kind, TokenPayload::StringLiteral(literal))
}

fn scan_char_literal<'ctrl>(cursor: &mut Cursor, control: &Control<'ctrl>) -> (TokenKind, TokenPayload<'ctrl>) {
    let mut spelling = String::new();
    spelling.push(cursor.bump().unwrap()); // opening quote
    loop {
        match cursor.peek() {
            None | Some('\n') => break,
            Some('\'') => {
                spelling.push(cursor.bump().unwrap());
                break;
            }
            Some('\\') => {
                spelling.push(cursor.bump().unwrap());
                if let Some(escaped) = cursor.peek() {
                    spelling.push(escaped);
                    cursor.bump();
                }
            }
            Some(c) => {
                spelling.push(c);
                cursor.bump();
            }
        }
    }
    let literal = control.intern_string_literal(&spelling);
    (TokenKind::CharLiteral, TokenPayload::StringLiteral(literal))
}

fn scan_punctuator(cursor: &mut Cursor) -> TokenKind {
    use TokenKind::*;

    macro_rules! try3 {
        ($s:literal, $kind:expr) => {
            if cursor.starts_with($s) {
                cursor.bump_str($s);
                return $kind;
            }
        };
    }

    try3!("<<=", LeftShiftAssign);
    try3!(">>=", RightShiftAssign);
    try3!("...", Ellipsis);
    try3!("->*", ArrowStar);

    try3!("::", ColonColon);
    try3!("->", Arrow);
    try3!(".*", DotStar);
    try3!("++", PlusPlus);
    try3!("--", MinusMinus);
    try3!("<<", LeftShift);
    try3!(">>", GreaterGreater);
    try3!("&&", AmpAmp);
    try3!("||", PipePipe);
    try3!("==", EqualEqual);
    try3!("!=", NotEqual);
    try3!("<=", LessEqual);
    try3!(">=", GreaterEqual);
    try3!("+=", PlusAssign);
    try3!("-=", MinusAssign);
    try3!("*=", StarAssign);
    try3!("/=", SlashAssign);
    try3!("%=", PercentAssign);
    try3!("&=", AmpAssign);
    try3!("|=", PipeAssign);
    try3!("^=", CaretAssign);
    try3!("##", HashHash);

    let Some(ch) = cursor.bump() else {
        return Eof;
    };
    match ch {
        '(' => LeftParen,
        ')' => RightParen,
        '{' => LeftBrace,
        '}' => RightBrace,
        '[' => LeftBracket,
        ']' => RightBracket,
        ';' => Semicolon,
        ',' => Comma,
        ':' => Colon,
        '?' => Question,
        '.' => Dot,
        '+' => Plus,
        '-' => Minus,
        '*' => Star,
        '/' => Slash,
        '%' => Percent,
        '&' => Amp,
        '|' => Pipe,
        '^' => Caret,
        '~' => Tilde,
        '!' => Bang,
        '=' => Assign,
        '<' => Less,
        '>' => Greater,
        '#' => Hash,
        '@' => At,
        _ => Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_arena::Arena;

    fn scan_default<'ctrl>(source: &str, control: &Control<'ctrl>) -> ScanResult<'ctrl> {
        scan(source, "test.cpp", control, LexerFeatureFlags::default())
    }

    #[test]
    fn simple_declaration_tokenizes_into_expected_kinds() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let result = scan_default("int x;", &control);
        let kinds: Vec<_> = result.tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TokenKind::KwInt, TokenKind::Identifier, TokenKind::Semicolon, TokenKind::Eof]);
    }

    #[test]
    fn identifier_payload_is_interned() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let result = scan_default("foo foo", &control);
        let a = result.tokens[0].identifier().unwrap();
        let b = result.tokens[1].identifier().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn greater_greater_scans_as_a_single_token() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let result = scan_default(">>", &control);
        assert_eq!(result.tokens[0].kind, TokenKind::GreaterGreater);
    }

    #[test]
    fn raw_string_literal_reads_to_matching_delimiter() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let result = scan_default(r#"R"(hello "world")""#, &control);
        assert_eq!(result.tokens[0].kind, TokenKind::RawStringLiteral);
    }

    #[test]
    fn qt_keywords_require_the_dialect_flag() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let without = scan("signals", "test.cpp", &control, LexerFeatureFlags::default());
        assert_eq!(without.tokens[0].kind, TokenKind::Identifier);

        let control2 = Control::new(&arena);
        let with = scan(
            "signals",
            "test.cpp",
            &control2,
            LexerFeatureFlags::default() | LexerFeatureFlags::QT_MOC_RUN_ENABLED,
        );
        assert_eq!(with.tokens[0].kind, TokenKind::KwSignals);
    }

    #[test]
    fn token_pasting_example_marks_generated_token() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let source = "# expansion 0,2\n~1\n# expansion end\nx1";
        let result = scan_default(source, &control);
        assert_eq!(result.tokens[0].kind, TokenKind::Identifier);
        assert!(result.tokens[0].has_flag(TokenFlags::GENERATED));
        assert!(result.tokens[0].has_flag(TokenFlags::EXPANDED));
    }

    #[test]
    fn line_marker_is_recorded_and_not_tokenized() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let source = "# line 5 \"foo.h\"\nint x;";
        let result = scan_default(source, &control);
        assert_eq!(result.tokens[0].kind, TokenKind::KwInt);
        assert!(matches!(&result.markers[0], Marker::Line { line: 5, file, .. } if file == "foo.h"));
    }
}
