//! Declarator syntax: the `*p`, `f(int, char) const noexcept`,
//! `arr[10]` shapes that sit between a decl-specifier-seq and an
//! initializer.

use crate::expressions::ExpressionAst;
use crate::names::NameAst;
use crate::ptr_operators::PtrOperatorAst;
use crate::specifiers::SpecifierAst;
use crate::types::TypeIdAst;
use cpplang_common::Span;

#[derive(Debug)]
pub enum CoreDeclaratorAst<'a> {
    Id(&'a NameAst<'a>),
    /// `(` declarator `)`, used to group ptr-operators against an inner
    /// declarator, e.g. `int (*p)[10]`.
    Nested(&'a DeclaratorAst<'a>),
    /// No id at all: an abstract declarator, as in a `type-id`.
    Abstract,
}

#[derive(Debug)]
pub struct ParameterAst<'a> {
    pub span: Span,
    pub specifiers: &'a [&'a SpecifierAst<'a>],
    pub declarator: Option<&'a DeclaratorAst<'a>>,
    pub default_value: Option<&'a ExpressionAst<'a>>,
}

#[derive(Debug)]
pub enum PostfixDeclaratorAst<'a> {
    Array {
        span: Span,
        size: Option<&'a ExpressionAst<'a>>,
    },
    Function {
        span: Span,
        parameters: &'a [ParameterAst<'a>],
        is_variadic: bool,
        cv_qualifiers: &'a [Span],
        ref_qualifier: Option<Span>,
        is_noexcept: bool,
        trailing_return_type: Option<&'a TypeIdAst<'a>>,
    },
}

impl<'a> PostfixDeclaratorAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            PostfixDeclaratorAst::Array { span, .. } | PostfixDeclaratorAst::Function { span, .. } => *span,
        }
    }
}

#[derive(Debug)]
pub struct DeclaratorAst<'a> {
    pub span: Span,
    pub ptr_operators: &'a [PtrOperatorAst<'a>],
    pub core: CoreDeclaratorAst<'a>,
    pub postfix: &'a [PostfixDeclaratorAst<'a>],
    /// `Args...` pack expansion on the declarator itself, as in a
    /// variadic template parameter `T... args`.
    pub is_variadic_pack: bool,
}
