//! C99-style designated initializers (`.field = value`, `[index] = value`),
//! accepted as an extension in brace-init lists.

use crate::expressions::ExpressionAst;
use cpplang_common::Span;

#[derive(Debug)]
pub enum DesignatorAst<'a> {
    Dot {
        span: Span,
        name: Span,
    },
    Bracket {
        span: Span,
        index: &'a ExpressionAst<'a>,
    },
}

#[derive(Debug)]
pub struct DesignatedInitializerAst<'a> {
    pub span: Span,
    pub designators: &'a [DesignatorAst<'a>],
    pub value: &'a ExpressionAst<'a>,
}
