//! Decl-specifiers: everything that can appear in a decl-specifier-seq
//! before the declarators, plus the two specifiers that carry their own
//! member lists (`class`/`struct`/`union`, `enum`).

use crate::declarations::DeclarationAst;
use crate::expressions::ExpressionAst;
use crate::names::NameAst;
use crate::types::TypeIdAst;
use cpplang_common::Span;

#[derive(Debug)]
pub enum SpecifierAst<'a> {
    /// A single-token specifier with no further structure: `int`, `const`,
    /// `static`, `virtual`, `inline`, a sign/storage keyword, etc.
    Simple(Span),
    NamedType {
        span: Span,
        name: &'a NameAst<'a>,
    },
    /// `class X;` / `struct X;` / `enum X;` with no body: a forward
    /// reference, not a definition.
    ElaboratedType {
        span: Span,
        class_key: Span,
        name: &'a NameAst<'a>,
    },
    Class(ClassSpecifierAst<'a>),
    Enum(EnumSpecifierAst<'a>),
    Typeof {
        span: Span,
        expression: &'a ExpressionAst<'a>,
    },
    Attribute(Span),
}

impl<'a> SpecifierAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            SpecifierAst::Simple(span) | SpecifierAst::Attribute(span) => *span,
            SpecifierAst::NamedType { span, .. }
            | SpecifierAst::ElaboratedType { span, .. }
            | SpecifierAst::Typeof { span, .. } => *span,
            SpecifierAst::Class(class) => class.span,
            SpecifierAst::Enum(en) => en.span,
        }
    }
}

#[derive(Debug)]
pub struct BaseClassAst<'a> {
    pub span: Span,
    pub is_virtual: bool,
    /// `public`/`protected`/`private`, if written; absent defaults per
    /// the enclosing class key.
    pub access_span: Option<Span>,
    pub name: &'a NameAst<'a>,
    pub is_pack_expansion: bool,
}

#[derive(Debug)]
pub struct ClassSpecifierAst<'a> {
    pub span: Span,
    /// `class` / `struct` / `union` token.
    pub class_key: Span,
    pub name: Option<&'a NameAst<'a>>,
    pub bases: &'a [BaseClassAst<'a>],
    pub members: &'a [&'a DeclarationAst<'a>],
}

#[derive(Debug)]
pub struct EnumeratorAst<'a> {
    pub span: Span,
    pub name: Span,
    pub expression: Option<&'a ExpressionAst<'a>>,
}

#[derive(Debug)]
pub struct EnumSpecifierAst<'a> {
    pub span: Span,
    pub name: Option<&'a NameAst<'a>>,
    /// `enum class` / `enum struct`.
    pub is_scoped: bool,
    pub underlying_type: Option<&'a TypeIdAst<'a>>,
    pub enumerators: &'a [EnumeratorAst<'a>],
}
