//! Objective-C declaration syntax: `@interface`/`@implementation`/
//! `@protocol`, methods, properties, and instance variables.

use crate::declarations::DeclarationAst;
use crate::names::NameAst;
use crate::specifiers::SpecifierAst;
use crate::statements::StatementAst;
use crate::types::TypeIdAst;
use cpplang_common::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjcVisibility {
    Private,
    Protected,
    Public,
    Package,
}

#[derive(Debug)]
pub struct ObjcInstanceVariableAst<'a> {
    pub span: Span,
    pub visibility: Option<ObjcVisibility>,
    pub specifiers: &'a [&'a SpecifierAst<'a>],
    pub name: Span,
}

#[derive(Debug)]
pub struct ObjcMethodParameterAst<'a> {
    pub span: Span,
    /// The selector keyword before this parameter, absent only for a
    /// unary method's implicit sole slot.
    pub selector_part: Option<Span>,
    pub type_id: Option<&'a TypeIdAst<'a>>,
    pub name: Option<Span>,
}

#[derive(Debug)]
pub struct ObjcMethodPrototypeAst<'a> {
    pub span: Span,
    pub is_class_method: bool,
    pub return_type: Option<&'a TypeIdAst<'a>>,
    pub parameters: &'a [ObjcMethodParameterAst<'a>],
    pub is_variadic: bool,
}

#[derive(Debug)]
pub enum ObjcDeclarationAst<'a> {
    ClassForwardDeclaration {
        span: Span,
        names: &'a [Span],
    },
    ProtocolForwardDeclaration {
        span: Span,
        names: &'a [Span],
    },
    ClassInterface {
        span: Span,
        name: Span,
        category: Option<Span>,
        superclass: Option<&'a NameAst<'a>>,
        protocols: &'a [Span],
        instance_variables: &'a [ObjcInstanceVariableAst<'a>],
        members: &'a [&'a DeclarationAst<'a>],
    },
    ClassImplementation {
        span: Span,
        name: Span,
        category: Option<Span>,
        instance_variables: &'a [ObjcInstanceVariableAst<'a>],
        members: &'a [&'a DeclarationAst<'a>],
    },
    ProtocolDeclaration {
        span: Span,
        name: Span,
        protocols: &'a [Span],
        members: &'a [&'a DeclarationAst<'a>],
    },
    MethodDeclaration(ObjcMethodPrototypeAst<'a>),
    MethodDefinition {
        span: Span,
        prototype: ObjcMethodPrototypeAst<'a>,
        body: &'a StatementAst<'a>,
    },
    PropertyDeclaration {
        span: Span,
        attributes: &'a [Span],
        type_id: &'a TypeIdAst<'a>,
        name: Span,
    },
    PropertySynthesize {
        span: Span,
        property: Span,
        backing_ivar: Option<Span>,
    },
    PropertyDynamic {
        span: Span,
        property: Span,
    },
    VisibilityMarker {
        span: Span,
        visibility: ObjcVisibility,
    },
}

impl<'a> ObjcDeclarationAst<'a> {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            ObjcDeclarationAst::ClassForwardDeclaration { span, .. }
            | ObjcDeclarationAst::ProtocolForwardDeclaration { span, .. }
            | ObjcDeclarationAst::ClassInterface { span, .. }
            | ObjcDeclarationAst::ClassImplementation { span, .. }
            | ObjcDeclarationAst::ProtocolDeclaration { span, .. }
            | ObjcDeclarationAst::MethodDefinition { span, .. }
            | ObjcDeclarationAst::PropertyDeclaration { span, .. }
            | ObjcDeclarationAst::PropertySynthesize { span, .. }
            | ObjcDeclarationAst::PropertyDynamic { span, .. }
            | ObjcDeclarationAst::VisibilityMarker { span, .. } => *span,
            ObjcDeclarationAst::MethodDeclaration(proto) => proto.span,
        }
    }
}
