//! `type-id` syntax: a specifier list plus an optional abstract declarator,
//! as used in casts, `sizeof`, `new`, template arguments, and trailing
//! return types.

use crate::declarators::DeclaratorAst;
use crate::specifiers::SpecifierAst;
use cpplang_common::Span;

#[derive(Debug)]
pub struct TypeIdAst<'a> {
    pub span: Span,
    pub specifiers: &'a [&'a SpecifierAst<'a>],
    pub declarator: Option<&'a DeclaratorAst<'a>>,
}
