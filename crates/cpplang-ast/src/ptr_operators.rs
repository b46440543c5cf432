//! The `*`/`&`/`&&`/`T::*` chain between a declarator's specifiers and its
//! core name.

use crate::names::NameAst;
use cpplang_common::Span;

#[derive(Debug)]
pub enum PtrOperatorAst<'a> {
    Pointer {
        span: Span,
        cv_qualifiers: &'a [Span],
    },
    Reference {
        span: Span,
        is_rvalue: bool,
    },
    PointerToMember {
        span: Span,
        nested_name: &'a NameAst<'a>,
        cv_qualifiers: &'a [Span],
    },
}

impl<'a> PtrOperatorAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            PtrOperatorAst::Pointer { span, .. }
            | PtrOperatorAst::Reference { span, .. }
            | PtrOperatorAst::PointerToMember { span, .. } => *span,
        }
    }
}
