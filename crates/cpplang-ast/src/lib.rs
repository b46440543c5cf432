//! Arena-allocated AST. Nodes are grouped into families (name, specifier,
//! declarator, declaration, statement, expression, plus Objective-C and Qt
//! extensions) rather than one type per concrete grammar production;
//! children are arena slices (`&'a [T]`) rather than an owned list type,
//! since a finished tree is never mutated after the parser builds it.
//!
//! `cpplang-parser` builds these nodes; `cpplang-binder` walks them via
//! [`visitor::Visitor`] to resolve [`names::NameAst`] into
//! `cpplang_control::Name` and attach symbols.

pub mod declarations;
pub mod declarators;
pub mod designators;
pub mod expressions;
pub mod names;
pub mod objc;
pub mod ptr_operators;
pub mod qt;
pub mod specifiers;
pub mod statements;
pub mod types;
pub mod visitor;

pub use declarations::{DeclarationAst, InitDeclaratorAst, MemberInitializerAst, TemplateParameterAst};
pub use declarators::{CoreDeclaratorAst, DeclaratorAst, ParameterAst, PostfixDeclaratorAst};
pub use designators::{DesignatedInitializerAst, DesignatorAst};
pub use expressions::{ExpressionAst, LambdaCaptureAst, LambdaExpressionAst, ObjcMessageArgumentAst, SizeofOperandAst};
pub use names::NameAst;
pub use objc::{ObjcDeclarationAst, ObjcInstanceVariableAst, ObjcMethodParameterAst, ObjcMethodPrototypeAst, ObjcVisibility};
pub use ptr_operators::PtrOperatorAst;
pub use qt::{QtDeclarationAst, QtPropertyDeclarationAst, QtPropertyFlags};
pub use specifiers::{BaseClassAst, ClassSpecifierAst, EnumSpecifierAst, EnumeratorAst, SpecifierAst};
pub use statements::{CatchClauseAst, StatementAst};
pub use types::TypeIdAst;
pub use visitor::Visitor;

/// The root of one parsed translation unit: an ordered list of top-level
/// declarations sharing one arena.
#[derive(Debug)]
pub struct TranslationUnitAst<'a> {
    pub declarations: &'a [&'a DeclarationAst<'a>],
}

impl<'a> TranslationUnitAst<'a> {
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        for declaration in self.declarations {
            visitor::walk_declaration(visitor, declaration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_common::Span;

    struct CountingVisitor {
        declarations: u32,
        expressions: u32,
    }

    impl Visitor for CountingVisitor {
        fn pre_visit_declaration(&mut self, _node: &DeclarationAst<'_>) -> bool {
            self.declarations += 1;
            true
        }

        fn pre_visit_expression(&mut self, _node: &ExpressionAst<'_>) -> bool {
            self.expressions += 1;
            true
        }
    }

    #[test]
    fn accept_visits_declarations_and_nested_expressions() {
        let name = NameAst::Simple(Span::new(0, 1));
        let declarator = DeclaratorAst {
            span: Span::new(0, 1),
            ptr_operators: &[],
            core: CoreDeclaratorAst::Id(&name),
            postfix: &[],
            is_variadic_pack: false,
        };
        let literal = ExpressionAst::Literal(Span::new(2, 3));
        let init = InitDeclaratorAst {
            span: Span::new(0, 3),
            declarator: &declarator,
            initializer: Some(&literal),
        };
        let declaration = DeclarationAst::Simple {
            span: Span::new(0, 3),
            specifiers: &[],
            declarators: &[init],
        };
        let tu = TranslationUnitAst {
            declarations: &[&declaration],
        };

        let mut visitor = CountingVisitor { declarations: 0, expressions: 0 };
        tu.accept(&mut visitor);

        assert_eq!(visitor.declarations, 1);
        assert_eq!(visitor.expressions, 1);
    }

    #[test]
    fn pre_visit_returning_false_prunes_descent() {
        struct Pruning;
        impl Visitor for Pruning {
            fn pre_visit_expression(&mut self, _node: &ExpressionAst<'_>) -> bool {
                false
            }
        }

        let literal = ExpressionAst::Literal(Span::new(0, 1));
        let wrapped = ExpressionAst::Nested {
            span: Span::new(0, 1),
            inner: &literal,
        };
        // Would panic on a second visit if pruning failed to stop recursion;
        // absence of a panic is the assertion.
        visitor::walk_expression(&mut Pruning, &wrapped);
    }
}
