//! Top-level and member declaration syntax.

use crate::declarators::DeclaratorAst;
use crate::expressions::ExpressionAst;
use crate::names::NameAst;
use crate::objc::ObjcDeclarationAst;
use crate::qt::QtDeclarationAst;
use crate::specifiers::SpecifierAst;
use crate::statements::StatementAst;
use cpplang_common::Span;

#[derive(Debug)]
pub struct InitDeclaratorAst<'a> {
    pub span: Span,
    pub declarator: &'a DeclaratorAst<'a>,
    pub initializer: Option<&'a ExpressionAst<'a>>,
}

#[derive(Debug)]
pub struct MemberInitializerAst<'a> {
    pub span: Span,
    pub name: &'a NameAst<'a>,
    pub arguments: &'a [&'a ExpressionAst<'a>],
}

#[derive(Debug)]
pub enum TemplateParameterAst<'a> {
    Type {
        span: Span,
        name: Option<Span>,
        default_value: Option<&'a crate::types::TypeIdAst<'a>>,
        is_pack: bool,
    },
    NonType {
        span: Span,
        parameter: &'a crate::declarators::ParameterAst<'a>,
    },
    Template {
        span: Span,
        parameters: &'a [TemplateParameterAst<'a>],
        name: Option<Span>,
        is_pack: bool,
    },
}

#[derive(Debug)]
pub enum DeclarationAst<'a> {
    Simple {
        span: Span,
        specifiers: &'a [&'a SpecifierAst<'a>],
        declarators: &'a [InitDeclaratorAst<'a>],
    },
    FunctionDefinition {
        span: Span,
        specifiers: &'a [&'a SpecifierAst<'a>],
        declarator: &'a DeclaratorAst<'a>,
        member_initializers: &'a [MemberInitializerAst<'a>],
        body: &'a StatementAst<'a>,
    },
    Template {
        span: Span,
        parameters: &'a [TemplateParameterAst<'a>],
        declaration: &'a DeclarationAst<'a>,
    },
    Namespace {
        span: Span,
        name: Option<Span>,
        is_inline: bool,
        members: &'a [&'a DeclarationAst<'a>],
    },
    NamespaceAlias {
        span: Span,
        name: Span,
        target: &'a NameAst<'a>,
    },
    UsingDeclaration {
        span: Span,
        name: &'a NameAst<'a>,
    },
    UsingDirective {
        span: Span,
        name: &'a NameAst<'a>,
    },
    LinkageSpecification {
        span: Span,
        language: Span,
        members: &'a [&'a DeclarationAst<'a>],
    },
    Asm(Span),
    Empty(Span),
    Objc(ObjcDeclarationAst<'a>),
    Qt(QtDeclarationAst<'a>),
}

impl<'a> DeclarationAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            DeclarationAst::Asm(span) | DeclarationAst::Empty(span) => *span,
            DeclarationAst::Simple { span, .. }
            | DeclarationAst::FunctionDefinition { span, .. }
            | DeclarationAst::Template { span, .. }
            | DeclarationAst::Namespace { span, .. }
            | DeclarationAst::NamespaceAlias { span, .. }
            | DeclarationAst::UsingDeclaration { span, .. }
            | DeclarationAst::UsingDirective { span, .. }
            | DeclarationAst::LinkageSpecification { span, .. } => *span,
            DeclarationAst::Objc(d) => d.span(),
            DeclarationAst::Qt(d) => d.span(),
        }
    }
}
