//! Expression syntax, including the Objective-C message-send forms and
//! lambda expressions.

use crate::declarators::ParameterAst;
use crate::designators::DesignatedInitializerAst;
use crate::names::NameAst;
use crate::statements::StatementAst;
use crate::types::TypeIdAst;
use cpplang_common::Span;
use cpplang_control::OperatorKind;

#[derive(Debug)]
pub enum SizeofOperandAst<'a> {
    Expression(&'a ExpressionAst<'a>),
    Type(&'a TypeIdAst<'a>),
    /// `sizeof...(Pack)`.
    VariadicPack(Span),
}

#[derive(Debug)]
pub struct ObjcMessageArgumentAst<'a> {
    /// The selector keyword preceding this argument, e.g. `andColor` in
    /// `andColor:color`. Absent for a unary selector's sole argument slot.
    pub selector_part: Option<Span>,
    pub value: Option<&'a ExpressionAst<'a>>,
}

#[derive(Debug)]
pub struct LambdaCaptureAst {
    pub span: Span,
    pub by_reference: bool,
    /// Absent for a default capture (`[=]`/`[&]`).
    pub name: Option<Span>,
}

#[derive(Debug)]
pub struct LambdaExpressionAst<'a> {
    pub span: Span,
    pub captures: &'a [LambdaCaptureAst],
    pub parameters: &'a [ParameterAst<'a>],
    pub is_mutable: bool,
    pub trailing_return_type: Option<&'a TypeIdAst<'a>>,
    pub body: &'a StatementAst<'a>,
}

#[derive(Debug)]
pub enum ExpressionAst<'a> {
    Literal(Span),
    IdExpression {
        span: Span,
        name: &'a NameAst<'a>,
    },
    This(Span),
    /// Parenthesized sub-expression, kept rather than discarded so spans
    /// and re-spelling stay faithful to what was written.
    Nested {
        span: Span,
        inner: &'a ExpressionAst<'a>,
    },
    Unary {
        span: Span,
        operator: OperatorKind,
        operand: &'a ExpressionAst<'a>,
    },
    Binary {
        span: Span,
        operator: OperatorKind,
        left: &'a ExpressionAst<'a>,
        right: &'a ExpressionAst<'a>,
    },
    Assignment {
        span: Span,
        operator: OperatorKind,
        target: &'a ExpressionAst<'a>,
        value: &'a ExpressionAst<'a>,
    },
    Conditional {
        span: Span,
        condition: &'a ExpressionAst<'a>,
        then_branch: &'a ExpressionAst<'a>,
        else_branch: &'a ExpressionAst<'a>,
    },
    Call {
        span: Span,
        callee: &'a ExpressionAst<'a>,
        arguments: &'a [&'a ExpressionAst<'a>],
    },
    ArraySubscript {
        span: Span,
        object: &'a ExpressionAst<'a>,
        index: &'a ExpressionAst<'a>,
    },
    Member {
        span: Span,
        object: &'a ExpressionAst<'a>,
        is_arrow: bool,
        is_template: bool,
        name: &'a NameAst<'a>,
    },
    PostIncrDecr {
        span: Span,
        is_increment: bool,
        operand: &'a ExpressionAst<'a>,
    },
    Cast {
        span: Span,
        type_id: &'a TypeIdAst<'a>,
        operand: &'a ExpressionAst<'a>,
    },
    /// `T(args...)` or `T{args...}` functional-notation cast.
    FunctionalCast {
        span: Span,
        type_id: &'a TypeIdAst<'a>,
        arguments: &'a [&'a ExpressionAst<'a>],
    },
    Sizeof {
        span: Span,
        operand: SizeofOperandAst<'a>,
    },
    TypeId {
        span: Span,
        type_id: &'a TypeIdAst<'a>,
    },
    New {
        span: Span,
        placement: &'a [&'a ExpressionAst<'a>],
        type_id: &'a TypeIdAst<'a>,
        initializer: Option<&'a ExpressionAst<'a>>,
    },
    Delete {
        span: Span,
        is_array: bool,
        operand: &'a ExpressionAst<'a>,
    },
    Throw {
        span: Span,
        operand: Option<&'a ExpressionAst<'a>>,
    },
    Comma {
        span: Span,
        left: &'a ExpressionAst<'a>,
        right: &'a ExpressionAst<'a>,
    },
    BracedInitList {
        span: Span,
        elements: &'a [&'a ExpressionAst<'a>],
    },
    DesignatedInitializer(DesignatedInitializerAst<'a>),
    Lambda(LambdaExpressionAst<'a>),
    ObjcMessageExpression {
        span: Span,
        receiver: &'a ExpressionAst<'a>,
        arguments: &'a [ObjcMessageArgumentAst<'a>],
    },
    ObjcEncode {
        span: Span,
        type_id: &'a TypeIdAst<'a>,
    },
    ObjcSelectorExpression {
        span: Span,
        selector: &'a NameAst<'a>,
    },
    ObjcProtocolExpression {
        span: Span,
        name: Span,
    },
}

impl<'a> ExpressionAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            ExpressionAst::Literal(span) | ExpressionAst::This(span) | ExpressionAst::ObjcProtocolExpression { span, .. } => *span,
            ExpressionAst::IdExpression { span, .. }
            | ExpressionAst::Nested { span, .. }
            | ExpressionAst::Unary { span, .. }
            | ExpressionAst::Binary { span, .. }
            | ExpressionAst::Assignment { span, .. }
            | ExpressionAst::Conditional { span, .. }
            | ExpressionAst::Call { span, .. }
            | ExpressionAst::ArraySubscript { span, .. }
            | ExpressionAst::Member { span, .. }
            | ExpressionAst::PostIncrDecr { span, .. }
            | ExpressionAst::Cast { span, .. }
            | ExpressionAst::FunctionalCast { span, .. }
            | ExpressionAst::Sizeof { span, .. }
            | ExpressionAst::TypeId { span, .. }
            | ExpressionAst::New { span, .. }
            | ExpressionAst::Delete { span, .. }
            | ExpressionAst::Throw { span, .. }
            | ExpressionAst::Comma { span, .. }
            | ExpressionAst::BracedInitList { span, .. }
            | ExpressionAst::ObjcMessageExpression { span, .. }
            | ExpressionAst::ObjcEncode { span, .. }
            | ExpressionAst::ObjcSelectorExpression { span, .. } => *span,
            ExpressionAst::DesignatedInitializer(d) => d.span,
            ExpressionAst::Lambda(l) => l.span,
        }
    }
}
