//! Maps an identifier spelling to a keyword `TokenKind`, gated by the
//! dialect flags active for this scan.

use crate::token::TokenKind;
use cpplang_common::LexerFeatureFlags;

/// Returns the keyword kind for `spelling` under `flags`, or `None` if it
/// should be classified as a plain identifier (either because it isn't a
/// keyword spelling at all, or because the dialect that defines it is
/// disabled).
#[must_use]
pub fn classify(spelling: &str, flags: LexerFeatureFlags) -> Option<TokenKind> {
    if !flags.contains(LexerFeatureFlags::SCAN_KEYWORDS) {
        return None;
    }

    let core = core_keyword(spelling);
    if core.is_some() {
        return core;
    }

    if flags.contains(LexerFeatureFlags::CXX0X_ENABLED) {
        if let Some(kind) = cxx0x_keyword(spelling) {
            return Some(kind);
        }
    }

    if flags.contains(LexerFeatureFlags::QT_MOC_RUN_ENABLED) {
        if let Some(kind) = qt_moc_keyword(spelling) {
            return Some(kind);
        }
    }

    None
}

fn core_keyword(spelling: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match spelling {
        "asm" | "auto" => KwAuto,
        "break" => KwBreak,
        "case" => KwCase,
        "catch" => KwCatch,
        "char" => KwChar,
        "class" => KwClass,
        "const" => KwConst,
        "const_cast" => KwConstCast,
        "continue" => KwContinue,
        "default" => KwDefault,
        "delete" => KwDelete,
        "do" => KwDo,
        "double" => KwDouble,
        "dynamic_cast" => KwDynamicCast,
        "else" => KwElse,
        "enum" => KwEnum,
        "explicit" => KwExplicit,
        "export" => KwExport,
        "extern" => KwExtern,
        "false" => KwFalse,
        "float" => KwFloat,
        "for" => KwFor,
        "friend" => KwFriend,
        "goto" => KwGoto,
        "if" => KwIf,
        "inline" => KwInline,
        "int" => KwInt,
        "long" => KwLong,
        "mutable" => KwMutable,
        "namespace" => KwNamespace,
        "new" => KwNew,
        "operator" => KwOperator,
        "private" => KwPrivate,
        "protected" => KwProtected,
        "public" => KwPublic,
        "register" => KwRegister,
        "reinterpret_cast" => KwReinterpretCast,
        "return" => KwReturn,
        "short" => KwShort,
        "signed" => KwSigned,
        "sizeof" => KwSizeof,
        "static" => KwStatic,
        "static_cast" => KwStaticCast,
        "struct" => KwStruct,
        "switch" => KwSwitch,
        "template" => KwTemplate,
        "this" => KwThis,
        "throw" => KwThrow,
        "true" => KwTrue,
        "try" => KwTry,
        "typedef" => KwTypedef,
        "typeid" => KwTypeid,
        "typename" => KwTypename,
        "union" => KwUnion,
        "unsigned" => KwUnsigned,
        "using" => KwUsing,
        "virtual" => KwVirtual,
        "void" => KwVoid,
        "volatile" => KwVolatile,
        "while" => KwWhile,
        _ => return None,
    })
}

fn cxx0x_keyword(spelling: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match spelling {
        "decltype" => KwDecltype,
        "nullptr" => KwNullptr,
        "static_assert" => KwStaticAssert,
        "constexpr" => KwConstexpr,
        "noexcept" => KwNoexcept,
        "char16_t" => KwChar16T,
        "char32_t" => KwChar32T,
        "alignas" => KwAlignas,
        "alignof" => KwAlignof,
        "thread_local" => KwThreadLocal,
        _ => return None,
    })
}

fn qt_moc_keyword(spelling: &str) -> Option<TokenKind> {
    use TokenKind::*;
    Some(match spelling {
        "Q_OBJECT" => KwQObject,
        "signals" => KwSignals,
        "slots" => KwSlots,
        "emit" => KwEmit,
        "Q_SIGNAL" => KwQSignal,
        "Q_SLOT" => KwQSlot,
        "Q_INVOKABLE" => KwQInvokable,
        "Q_PRIVATE_SLOT" => KwQPrivateSlot,
        "Q_D" => KwQD,
        "Q_Q" => KwQQ,
        _ => return None,
    })
}

/// Classifies an `@`-prefixed spelling (the `@` itself already consumed)
/// into an Objective-C keyword, when `objc_enabled` is set.
#[must_use]
pub fn classify_objc(spelling_after_at: &str, flags: LexerFeatureFlags) -> Option<TokenKind> {
    if !flags.contains(LexerFeatureFlags::OBJC_ENABLED) {
        return None;
    }
    use TokenKind::*;
    Some(match spelling_after_at {
        "interface" => KwAtInterface,
        "implementation" => KwAtImplementation,
        "end" => KwAtEnd,
        "property" => KwAtProperty,
        "selector" => KwAtSelector,
        "encode" => KwAtEncode,
        "synthesize" => KwAtSynthesize,
        "dynamic" => KwAtDynamic,
        "class" => KwAtClass,
        "protocol" => KwAtProtocol,
        "optional" => KwAtOptional,
        "required" => KwAtRequired,
        "package" => KwAtPackage,
        "throw" => KwAtThrow,
        "try" => KwAtTry,
        "catch" => KwAtCatch,
        "finally" => KwAtFinally,
        "autoreleasepool" => KwAtAutoreleasepool,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_keywords_recognized_regardless_of_dialect_flags() {
        assert_eq!(classify("class", LexerFeatureFlags::empty() | LexerFeatureFlags::SCAN_KEYWORDS), Some(TokenKind::KwClass));
    }

    #[test]
    fn cxx0x_keyword_hidden_without_the_flag() {
        let flags = LexerFeatureFlags::SCAN_KEYWORDS;
        assert_eq!(classify("nullptr", flags), None);
    }

    #[test]
    fn cxx0x_keyword_recognized_with_the_flag() {
        let flags = LexerFeatureFlags::SCAN_KEYWORDS | LexerFeatureFlags::CXX0X_ENABLED;
        assert_eq!(classify("nullptr", flags), Some(TokenKind::KwNullptr));
    }

    #[test]
    fn scan_keywords_disabled_yields_plain_identifiers() {
        let flags = LexerFeatureFlags::CXX0X_ENABLED;
        assert_eq!(classify("class", flags), None);
    }

    #[test]
    fn objc_keyword_requires_objc_enabled() {
        assert_eq!(classify_objc("interface", LexerFeatureFlags::empty()), None);
        assert_eq!(
            classify_objc("interface", LexerFeatureFlags::OBJC_ENABLED),
            Some(TokenKind::KwAtInterface)
        );
    }
}
