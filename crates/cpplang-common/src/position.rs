//! Line/column positions and a line-offset map for translating byte offsets
//! into human- and editor-facing coordinates.

use serde::{Deserialize, Serialize};

/// A 1-based line, 1-based UTF-16 column position, as most editor
/// protocols (and diagnostic renderers) expect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Maps byte offsets in a source buffer to 1-based line/column positions.
///
/// Built once per physical source file (not per translation unit: a header
/// included by many TUs gets one `LineMap`, shared). Columns are counted in
/// UTF-16 code units, matching the convention most source files and editor
/// protocols use, rather than bytes or Unicode scalar values.
#[derive(Clone, Debug)]
pub struct LineMap {
    /// Byte offset of the first character of each line. `line_starts[0]` is
    /// always 0.
    line_starts: Vec<u32>,
    source_len: u32,
}

impl LineMap {
    /// Scan `source` once, recording the byte offset at which each line
    /// begins. Recognizes `\n`, `\r\n`, and bare `\r` as line terminators.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        let bytes = source.as_bytes();
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_starts.push((i + 1) as u32);
                    i += 1;
                }
                b'\r' => {
                    let next = if i + 1 < bytes.len() && bytes[i + 1] == b'\n' {
                        i + 2
                    } else {
                        i + 1
                    };
                    line_starts.push(next as u32);
                    i = next;
                }
                _ => i += 1,
            }
        }
        LineMap {
            line_starts,
            source_len: bytes.len() as u32,
        }
    }

    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset into a 1-based line/column position.
    ///
    /// Offsets past the end of the source clamp to the last valid position.
    #[must_use]
    pub fn position_at(&self, source: &str, offset: u32) -> Position {
        let offset = offset.min(self.source_len);
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts[line_index];
        let column = utf16_len(&source[line_start as usize..offset as usize]) + 1;
        Position::new(line_index as u32 + 1, column)
    }

    /// Byte offset at which the given 1-based line begins.
    #[must_use]
    pub fn line_start(&self, line: u32) -> Option<u32> {
        self.line_starts.get(line.checked_sub(1)? as usize).copied()
    }
}

fn utf16_len(s: &str) -> u32 {
    s.chars().map(char::len_utf16).sum::<usize>() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_starts_at_one_one() {
        let src = "int x;\nint y;\n";
        let map = LineMap::new(src);
        assert_eq!(map.position_at(src, 0), Position::new(1, 1));
    }

    #[test]
    fn second_line_after_lf() {
        let src = "int x;\nint y;\n";
        let map = LineMap::new(src);
        assert_eq!(map.position_at(src, 7), Position::new(2, 1));
    }

    #[test]
    fn crlf_counts_as_one_terminator() {
        let src = "a\r\nb";
        let map = LineMap::new(src);
        assert_eq!(map.line_count(), 2);
        assert_eq!(map.position_at(src, 3), Position::new(2, 1));
    }

    #[test]
    fn offset_past_end_clamps() {
        let src = "abc";
        let map = LineMap::new(src);
        assert_eq!(map.position_at(src, 1000), Position::new(1, 4));
    }
}
