//! Pre-binding name syntax. Distinct from `cpplang_control::Name`: these
//! nodes carry raw token spans and arena-referenced children as written by
//! the programmer; the binder resolves each one into a canonical `Name`.

use crate::types::TypeIdAst;
use cpplang_common::Span;
use cpplang_control::OperatorKind;

#[derive(Debug)]
pub enum NameAst<'a> {
    Simple(Span),
    Destructor {
        span: Span,
        name: &'a NameAst<'a>,
    },
    TemplateId {
        span: Span,
        name_token: Span,
        arguments: &'a [&'a TypeIdAst<'a>],
        is_specialization: bool,
    },
    Operator {
        span: Span,
        kind: OperatorKind,
    },
    ConversionFunctionId {
        span: Span,
        type_id: &'a TypeIdAst<'a>,
    },
    Qualified {
        span: Span,
        base: Option<&'a NameAst<'a>>,
        is_global: bool,
        name: &'a NameAst<'a>,
    },
    /// Objective-C selector, e.g. `initWithFrame:andColor:`.
    Selector {
        span: Span,
        parts: &'a [Span],
        has_arguments: bool,
    },
}

impl<'a> NameAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            NameAst::Simple(span)
            | NameAst::Destructor { span, .. }
            | NameAst::TemplateId { span, .. }
            | NameAst::Operator { span, .. }
            | NameAst::ConversionFunctionId { span, .. }
            | NameAst::Qualified { span, .. }
            | NameAst::Selector { span, .. } => *span,
        }
    }

    /// The trailing simple name token, following qualifiers and template
    /// arguments down to the innermost identifier. Used by the binder's
    /// "expected a class-name" fallback.
    #[must_use]
    pub fn trailing_simple_name(&self) -> Option<Span> {
        match self {
            NameAst::Simple(span) => Some(*span),
            NameAst::TemplateId { name_token, .. } => Some(*name_token),
            NameAst::Qualified { name, .. } => name.trailing_simple_name(),
            NameAst::Destructor { .. } | NameAst::Operator { .. } | NameAst::ConversionFunctionId { .. } | NameAst::Selector { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_simple_name_descends_through_qualifiers() {
        let inner = NameAst::Simple(Span::new(3, 4));
        let qualified = NameAst::Qualified {
            span: Span::new(0, 4),
            base: None,
            is_global: false,
            name: &inner,
        };
        assert_eq!(qualified.trailing_simple_name(), Some(Span::new(3, 4)));
    }
}
