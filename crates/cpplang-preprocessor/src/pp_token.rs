//! A lightweight token scanner used only within this crate, distinct from
//! `cpplang-lexer`'s full scanner: the preprocessor never needs keyword
//! classification or literal interning, only enough structure to find
//! directive lines, macro invocations, and balanced-paren argument lists.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PpTokenKind {
    Identifier,
    Number,
    StringLiteral,
    CharLiteral,
    /// `#`, recognized as its own kind so the directive dispatcher can
    /// check `kind == Hash && is_line_start` without re-deriving it from
    /// `Other`'s text.
    Hash,
    HashHash,
    LParen,
    RParen,
    Comma,
    Ellipsis,
    /// Any other punctuator; callers needing to distinguish further
    /// slice `text` themselves.
    Other,
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct PpToken {
    pub kind: PpTokenKind,
    pub start: u32,
    pub end: u32,
    pub whitespace_before: bool,
    /// True if this is the first non-whitespace token of its logical
    /// line (joined lines via backslash-newline don't end a logical
    /// line).
    pub is_line_start: bool,
    pub line: u32,
}

impl PpToken {
    #[must_use]
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start as usize..self.end as usize]
    }
}

/// Scans `source` into a flat array of preprocessing tokens, terminated by
/// one `Eof` token. Comments are dropped (replaced by whitespace); a
/// backslash immediately followed by a newline splices the two physical
/// lines without ending the logical line.
#[must_use]
pub fn scan(source: &str) -> Vec<PpToken> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0usize;
    let mut line = 1u32;
    let mut whitespace_before = true;
    let mut is_line_start = true;

    macro_rules! push {
        ($kind:expr, $start:expr) => {
            tokens.push(PpToken {
                kind: $kind,
                start: $start as u32,
                end: pos as u32,
                whitespace_before,
                is_line_start,
                line,
            });
            whitespace_before = false;
            is_line_start = false;
        };
    }

    while pos < bytes.len() {
        let c = bytes[pos] as char;

        if c == '\\' && bytes.get(pos + 1) == Some(&b'\n') {
            pos += 2;
            line += 1;
            whitespace_before = true;
            continue;
        }
        if c == '\n' {
            pos += 1;
            line += 1;
            whitespace_before = true;
            is_line_start = true;
            continue;
        }
        if c.is_whitespace() {
            pos += 1;
            whitespace_before = true;
            continue;
        }
        if c == '/' && bytes.get(pos + 1) == Some(&b'/') {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
            whitespace_before = true;
            continue;
        }
        if c == '/' && bytes.get(pos + 1) == Some(&b'*') {
            pos += 2;
            while pos < bytes.len() && !(bytes[pos] == b'*' && bytes.get(pos + 1) == Some(&b'/')) {
                if bytes[pos] == b'\n' {
                    line += 1;
                }
                pos += 1;
            }
            pos = (pos + 2).min(bytes.len());
            whitespace_before = true;
            continue;
        }

        let start = pos;

        if c == '_' || c.is_alphabetic() {
            while pos < bytes.len() && (bytes[pos] == b'_' || (bytes[pos] as char).is_alphanumeric()) {
                pos += 1;
            }
            push!(PpTokenKind::Identifier, start);
            continue;
        }

        if c.is_ascii_digit() || (c == '.' && bytes.get(pos + 1).is_some_and(|b| b.is_ascii_digit())) {
            pos += 1;
            while pos < bytes.len() {
                let b = bytes[pos] as char;
                if b == '.' || b == '_' || b.is_alphanumeric() {
                    if (b == 'e' || b == 'E' || b == 'p' || b == 'P') && matches!(bytes.get(pos + 1), Some(b'+') | Some(b'-')) {
                        pos += 2;
                        continue;
                    }
                    pos += 1;
                } else {
                    break;
                }
            }
            push!(PpTokenKind::Number, start);
            continue;
        }

        if c == '"' {
            pos += 1;
            while pos < bytes.len() && bytes[pos] != b'"' {
                if bytes[pos] == b'\\' && pos + 1 < bytes.len() {
                    pos += 2;
                } else {
                    if bytes[pos] == b'\n' {
                        break;
                    }
                    pos += 1;
                }
            }
            if pos < bytes.len() && bytes[pos] == b'"' {
                pos += 1;
            }
            push!(PpTokenKind::StringLiteral, start);
            continue;
        }

        if c == '\'' {
            pos += 1;
            while pos < bytes.len() && bytes[pos] != b'\'' {
                if bytes[pos] == b'\\' && pos + 1 < bytes.len() {
                    pos += 2;
                } else {
                    if bytes[pos] == b'\n' {
                        break;
                    }
                    pos += 1;
                }
            }
            if pos < bytes.len() && bytes[pos] == b'\'' {
                pos += 1;
            }
            push!(PpTokenKind::CharLiteral, start);
            continue;
        }

        if c == '#' {
            pos += 1;
            if bytes.get(pos) == Some(&b'#') {
                pos += 1;
                push!(PpTokenKind::HashHash, start);
            } else {
                push!(PpTokenKind::Hash, start);
            }
            continue;
        }

        if c == '(' {
            pos += 1;
            push!(PpTokenKind::LParen, start);
            continue;
        }
        if c == ')' {
            pos += 1;
            push!(PpTokenKind::RParen, start);
            continue;
        }
        if c == ',' {
            pos += 1;
            push!(PpTokenKind::Comma, start);
            continue;
        }
        if c == '.' && bytes.get(pos + 1) == Some(&b'.') && bytes.get(pos + 2) == Some(&b'.') {
            pos += 3;
            push!(PpTokenKind::Ellipsis, start);
            continue;
        }

        pos += c.len_utf8();
        push!(PpTokenKind::Other, start);
    }

    tokens.push(PpToken {
        kind: PpTokenKind::Eof,
        start: pos as u32,
        end: pos as u32,
        whitespace_before,
        is_line_start,
        line,
    });
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_line_starts_with_a_hash_token_flagged_as_line_start() {
        let tokens = scan("#define FOO 1\n");
        assert_eq!(tokens[0].kind, PpTokenKind::Hash);
        assert!(tokens[0].is_line_start);
        assert_eq!(tokens[1].kind, PpTokenKind::Identifier);
        assert_eq!(tokens[1].text("#define FOO 1\n"), "define");
    }

    #[test]
    fn joined_line_does_not_end_the_logical_line() {
        let source = "#define FOO \\\n  1\n";
        let tokens = scan(source);
        let number = tokens.iter().find(|t| t.kind == PpTokenKind::Number).unwrap();
        assert!(!number.is_line_start);
    }

    #[test]
    fn comments_are_skipped_and_leave_whitespace_before_set() {
        let tokens = scan("a/* c */b");
        assert_eq!(tokens[1].text("a/* c */b"), "b");
        assert!(tokens[1].whitespace_before);
    }
}
