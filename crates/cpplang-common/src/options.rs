//! Front-end-wide options: dialect feature flags threaded from the CLI (or
//! any other host) down into the Lexer and TranslationUnit.
//!
//! These mirror the "Feature flags on Lexer/TranslationUnit" listed for the
//! scanner: each toggles a dialect extension that changes what the lexer
//! recognizes as a token, not general compiler behavior.

use bitflags::bitflags;

bitflags! {
    /// Dialect toggles that change what the Lexer accepts as a token.
    ///
    /// Defaults are chosen for plain C++ source; a host enables Qt or
    /// Objective-C extensions explicitly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LexerFeatureFlags: u32 {
        /// Recognize Qt's `Q_OBJECT`/`signals`/`slots`/`emit` moc keywords.
        const QT_MOC_RUN_ENABLED = 1 << 0;
        /// Recognize C++11 keywords (`constexpr`, `nullptr`, `static_assert`, ...).
        const CXX0X_ENABLED = 1 << 1;
        /// Recognize Objective-C++ syntax (`@interface`, `@implementation`, ...).
        const OBJC_ENABLED = 1 << 2;
        /// Emit comment tokens instead of discarding them during scanning.
        const SCAN_COMMENT_TOKENS = 1 << 3;
        /// Classify identifiers matching a keyword spelling as keyword tokens.
        /// Disabled for contexts (e.g. raw re-lexing) that want plain identifiers.
        const SCAN_KEYWORDS = 1 << 4;
        /// Recognize `<...>` as a single angle-bracketed string literal token
        /// in `#include` directive position.
        const SCAN_ANGLE_STRING_LITERAL_TOKENS = 1 << 5;
    }
}

impl Default for LexerFeatureFlags {
    fn default() -> Self {
        LexerFeatureFlags::CXX0X_ENABLED
            | LexerFeatureFlags::SCAN_KEYWORDS
            | LexerFeatureFlags::SCAN_ANGLE_STRING_LITERAL_TOKENS
    }
}

/// Top-level options threaded through an entire front-end run.
///
/// A host (CLI, LSP server, test harness) builds one `FrontendOptions` and
/// passes it to every translation unit it processes; nothing here varies
/// per translation unit.
#[derive(Debug, Clone)]
pub struct FrontendOptions {
    pub lexer_flags: LexerFeatureFlags,
    /// Search path for `#include "..."` (quoted) lookups, checked before
    /// `system_include_paths`.
    pub quote_include_paths: Vec<String>,
    /// Search path for `#include <...>` (angle-bracketed) lookups.
    pub system_include_paths: Vec<String>,
    /// `-D NAME=VALUE` / `-D NAME` style command-line macro definitions,
    /// applied before scanning the primary source file.
    pub predefined_macros: Vec<(String, Option<String>)>,
    /// `-U NAME` command-line macro undefinitions, applied after predefined
    /// macros so `-D FOO -U FOO` nets out to undefined.
    pub undefined_macros: Vec<String>,
}

impl Default for FrontendOptions {
    fn default() -> Self {
        FrontendOptions {
            lexer_flags: LexerFeatureFlags::default(),
            quote_include_paths: Vec::new(),
            system_include_paths: Vec::new(),
            predefined_macros: Vec::new(),
            undefined_macros: Vec::new(),
        }
    }
}

impl FrontendOptions {
    #[must_use]
    pub fn with_qt_moc(mut self) -> Self {
        self.lexer_flags |= LexerFeatureFlags::QT_MOC_RUN_ENABLED;
        self
    }

    #[must_use]
    pub fn with_objc(mut self) -> Self {
        self.lexer_flags |= LexerFeatureFlags::OBJC_ENABLED;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_enable_cxx0x_and_keywords() {
        let flags = LexerFeatureFlags::default();
        assert!(flags.contains(LexerFeatureFlags::CXX0X_ENABLED));
        assert!(flags.contains(LexerFeatureFlags::SCAN_KEYWORDS));
        assert!(!flags.contains(LexerFeatureFlags::OBJC_ENABLED));
    }

    #[test]
    fn builder_methods_add_flags_without_clearing_defaults() {
        let options = FrontendOptions::default().with_objc();
        assert!(options.lexer_flags.contains(LexerFeatureFlags::OBJC_ENABLED));
        assert!(options.lexer_flags.contains(LexerFeatureFlags::CXX0X_ENABLED));
    }
}
