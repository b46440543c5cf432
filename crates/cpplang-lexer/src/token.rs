//! Token kinds, flags, and the `Token` record itself.

use bitflags::bitflags;
use cpplang_control::{Identifier, NumericLiteral, StringLiteral};

/// Every kind of token the scanner can produce: punctuators, operators,
/// keywords across every supported dialect, literal categories, and the
/// two end-of-stream sentinels.
///
/// `Eof` is the ordinary end-of-token-array sentinel (unmatched braces are
/// paired with its index, per the brace-matching contract). `Invalid` is a
/// distinct sentinel for a token the scanner gave up recovering mid-scan
/// (e.g. an unterminated literal abandoned at end of buffer) — downstream
/// consumers can tell "ran out of input" from "ran into garbage" apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TokenKind {
    Eof,
    Invalid,

    // Literal categories.
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
    WideStringLiteral,
    Utf8StringLiteral,
    Utf16StringLiteral,
    Utf32StringLiteral,
    RawStringLiteral,
    AngleStringLiteral,
    Comment,

    // Punctuators / operators.
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Colon,
    ColonColon,
    Question,
    Dot,
    DotStar,
    Ellipsis,
    Arrow,
    ArrowStar,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LeftShift,
    Greater,
    GreaterGreater,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    AmpAmp,
    PipePipe,
    Equal,
    EqualEqual,
    NotEqual,
    Less,
    LessEqual,
    GreaterEqual,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    LeftShiftAssign,
    RightShiftAssign,
    Hash,
    HashHash,
    At,

    // C++ keywords.
    KwAuto,
    KwBreak,
    KwCase,
    KwCatch,
    KwChar,
    KwClass,
    KwConst,
    KwConstCast,
    KwContinue,
    KwDefault,
    KwDelete,
    KwDo,
    KwDouble,
    KwDynamicCast,
    KwElse,
    KwEnum,
    KwExplicit,
    KwExport,
    KwExtern,
    KwFalse,
    KwFloat,
    KwFor,
    KwFriend,
    KwGoto,
    KwIf,
    KwInline,
    KwInt,
    KwLong,
    KwMutable,
    KwNamespace,
    KwNew,
    KwOperator,
    KwPrivate,
    KwProtected,
    KwPublic,
    KwRegister,
    KwReinterpretCast,
    KwReturn,
    KwShort,
    KwSigned,
    KwSizeof,
    KwStatic,
    KwStaticCast,
    KwStruct,
    KwSwitch,
    KwTemplate,
    KwThis,
    KwThrow,
    KwTrue,
    KwTry,
    KwTypedef,
    KwTypeid,
    KwTypename,
    KwUnion,
    KwUnsigned,
    KwUsing,
    KwVirtual,
    KwVoid,
    KwVolatile,
    KwWhile,

    // C++11 keywords (gated by `cxx0x_enabled`).
    KwDecltype,
    KwNullptr,
    KwStaticAssert,
    KwConstexpr,
    KwNoexcept,
    KwChar16T,
    KwChar32T,
    KwAlignas,
    KwAlignof,
    KwThreadLocal,

    // Qt MOC keywords (gated by `qt_moc_run_enabled`).
    KwQObject,
    KwSignals,
    KwSlots,
    KwEmit,
    KwQSignal,
    KwQSlot,
    KwQInvokable,
    KwQPrivateSlot,
    KwQD,
    KwQQ,

    // Objective-C `@`-keywords (gated by `objc_enabled`).
    KwAtInterface,
    KwAtImplementation,
    KwAtEnd,
    KwAtProperty,
    KwAtSelector,
    KwAtEncode,
    KwAtSynthesize,
    KwAtDynamic,
    KwAtClass,
    KwAtProtocol,
    KwAtOptional,
    KwAtRequired,
    KwAtPackage,
    KwAtThrow,
    KwAtTry,
    KwAtCatch,
    KwAtFinally,
    KwAtAutoreleasepool,
}

impl TokenKind {
    #[must_use]
    pub fn is_eof(self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    #[must_use]
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerLiteral
                | TokenKind::FloatLiteral
                | TokenKind::CharLiteral
                | TokenKind::StringLiteral
                | TokenKind::WideStringLiteral
                | TokenKind::Utf8StringLiteral
                | TokenKind::Utf16StringLiteral
                | TokenKind::Utf32StringLiteral
                | TokenKind::RawStringLiteral
                | TokenKind::AngleStringLiteral
        )
    }

    #[must_use]
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::KwAuto
                | TokenKind::KwBreak
                | TokenKind::KwCase
                | TokenKind::KwCatch
                | TokenKind::KwChar
                | TokenKind::KwClass
                | TokenKind::KwConst
                | TokenKind::KwConstCast
                | TokenKind::KwContinue
                | TokenKind::KwDefault
                | TokenKind::KwDelete
                | TokenKind::KwDo
                | TokenKind::KwDouble
                | TokenKind::KwDynamicCast
                | TokenKind::KwElse
                | TokenKind::KwEnum
                | TokenKind::KwExplicit
                | TokenKind::KwExport
                | TokenKind::KwExtern
                | TokenKind::KwFalse
                | TokenKind::KwFloat
                | TokenKind::KwFor
                | TokenKind::KwFriend
                | TokenKind::KwGoto
                | TokenKind::KwIf
                | TokenKind::KwInline
                | TokenKind::KwInt
                | TokenKind::KwLong
                | TokenKind::KwMutable
                | TokenKind::KwNamespace
                | TokenKind::KwNew
                | TokenKind::KwOperator
                | TokenKind::KwPrivate
                | TokenKind::KwProtected
                | TokenKind::KwPublic
                | TokenKind::KwRegister
                | TokenKind::KwReinterpretCast
                | TokenKind::KwReturn
                | TokenKind::KwShort
                | TokenKind::KwSigned
                | TokenKind::KwSizeof
                | TokenKind::KwStatic
                | TokenKind::KwStaticCast
                | TokenKind::KwStruct
                | TokenKind::KwSwitch
                | TokenKind::KwTemplate
                | TokenKind::KwThis
                | TokenKind::KwThrow
                | TokenKind::KwTrue
                | TokenKind::KwTry
                | TokenKind::KwTypedef
                | TokenKind::KwTypeid
                | TokenKind::KwTypename
                | TokenKind::KwUnion
                | TokenKind::KwUnsigned
                | TokenKind::KwUsing
                | TokenKind::KwVirtual
                | TokenKind::KwVoid
                | TokenKind::KwVolatile
                | TokenKind::KwWhile
                | TokenKind::KwDecltype
                | TokenKind::KwNullptr
                | TokenKind::KwStaticAssert
                | TokenKind::KwConstexpr
                | TokenKind::KwNoexcept
                | TokenKind::KwChar16T
                | TokenKind::KwChar32T
                | TokenKind::KwAlignas
                | TokenKind::KwAlignof
                | TokenKind::KwThreadLocal
                | TokenKind::KwQObject
                | TokenKind::KwSignals
                | TokenKind::KwSlots
                | TokenKind::KwEmit
                | TokenKind::KwQSignal
                | TokenKind::KwQSlot
                | TokenKind::KwQInvokable
                | TokenKind::KwQPrivateSlot
                | TokenKind::KwQD
                | TokenKind::KwQQ
                | TokenKind::KwAtInterface
                | TokenKind::KwAtImplementation
                | TokenKind::KwAtEnd
                | TokenKind::KwAtProperty
                | TokenKind::KwAtSelector
                | TokenKind::KwAtEncode
                | TokenKind::KwAtSynthesize
                | TokenKind::KwAtDynamic
                | TokenKind::KwAtClass
                | TokenKind::KwAtProtocol
                | TokenKind::KwAtOptional
                | TokenKind::KwAtRequired
                | TokenKind::KwAtPackage
                | TokenKind::KwAtThrow
                | TokenKind::KwAtTry
                | TokenKind::KwAtCatch
                | TokenKind::KwAtFinally
                | TokenKind::KwAtAutoreleasepool
        )
    }
}

bitflags! {
    /// Textual-trivia and provenance flags carried on every token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        /// Preceded by a newline.
        const NEWLINE = 1 << 0;
        /// Preceded by whitespace (other than the newline itself).
        const WHITESPACE = 1 << 1;
        /// Produced after a line-continuation backslash.
        const JOINED = 1 << 2;
        /// Originates from a macro expansion site.
        const EXPANDED = 1 << 3;
        /// Has no corresponding source character (e.g. produced by `##`).
        const GENERATED = 1 << 4;
    }
}

/// The discriminated payload carried by some token kinds.
#[derive(Debug, Clone, Copy)]
pub enum TokenPayload<'ctrl> {
    None,
    Identifier(&'ctrl Identifier<'ctrl>),
    StringLiteral(&'ctrl StringLiteral<'ctrl>),
    NumericLiteral(&'ctrl NumericLiteral<'ctrl>),
    /// Set on an opening-brace token once its matching close is found
    /// (filled in by `cpplang-tu`'s brace-matching pass, not the scanner).
    CloseBraceIndex(u32),
}

/// One scanned token: its classification, trivia flags, source extent in
/// both byte and UTF-16 units, and (for some kinds) an interned payload.
#[derive(Debug, Clone, Copy)]
pub struct Token<'ctrl> {
    pub kind: TokenKind,
    pub flags: TokenFlags,
    pub byte_offset: u32,
    pub utf16_offset: u32,
    pub byte_length: u32,
    pub utf16_length: u32,
    pub payload: TokenPayload<'ctrl>,
}

impl<'ctrl> Token<'ctrl> {
    #[must_use]
    pub fn new(kind: TokenKind, byte_offset: u32, utf16_offset: u32, byte_length: u32, utf16_length: u32) -> Self {
        Token {
            kind,
            flags: TokenFlags::empty(),
            byte_offset,
            utf16_offset,
            byte_length,
            utf16_length,
            payload: TokenPayload::None,
        }
    }

    #[must_use]
    pub fn byte_range(&self) -> std::ops::Range<usize> {
        self.byte_offset as usize..(self.byte_offset + self.byte_length) as usize
    }

    #[must_use]
    pub fn has_flag(&self, flag: TokenFlags) -> bool {
        self.flags.contains(flag)
    }

    #[must_use]
    pub fn identifier(&self) -> Option<&'ctrl Identifier<'ctrl>> {
        match self.payload {
            TokenPayload::Identifier(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn close_brace(&self) -> Option<u32> {
        match self.payload {
            TokenPayload::CloseBraceIndex(idx) => Some(idx),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_keyword_matches_kw_prefixed_variants() {
        assert!(TokenKind::KwClass.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
    }

    #[test]
    fn byte_range_covers_the_token_spelling() {
        let token: Token = Token::new(TokenKind::Identifier, 10, 10, 3, 3);
        assert_eq!(token.byte_range(), 10..13);
    }
}
