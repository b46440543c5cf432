//! Qt MOC construct binding: `Q_PROPERTY`, `Q_ENUMS`/`Q_FLAGS`, the
//! `Q_D`/`Q_Q` private-implementation pointers, and `Q_PRIVATE_SLOT`.
//! `Q_OBJECT` itself introduces no symbol — it's a tag the moc reads, not
//! a declaration.

use crate::symbol::{FunctionSymbol, MethodKey, Scope, SymbolKind};
use crate::Binder;
use cpplang_ast::QtDeclarationAst;
use cpplang_control::FullySpecifiedType;
use cpplang_lexer::TokenKind;

impl<'tu, 'ctrl> Binder<'tu, 'ctrl> {
    pub(crate) fn bind_qt_declaration(&mut self, qt: &'ctrl QtDeclarationAst<'ctrl>) {
        match qt {
            QtDeclarationAst::Object(_) => {}
            QtDeclarationAst::Property(property) => {
                let ty = self.bind_type_id(property.type_id);
                let name = self.identifier_name(property.name);
                let symbol = self.alloc_symbol(property.span.start, Some(name), SymbolKind::QtPropertyDeclaration { ty });
                self.add_to_current_scope(symbol);
            }
            QtDeclarationAst::Enums { span, names } => self.bind_qt_name_list(*span, names, false),
            QtDeclarationAst::Flags { span, names } => self.bind_qt_name_list(*span, names, true),
            QtDeclarationAst::PrivateSlot { span, signature, .. } => self.bind_qt_private_slot(*span, *signature),
            QtDeclarationAst::PrivatePointer { span, class_name } => self.bind_qt_private_pointer(*span, *class_name),
            QtDeclarationAst::QPointer { span, class_name } => self.bind_qt_q_pointer(*span, *class_name),
        }
    }

    fn bind_qt_name_list(&mut self, span: cpplang_common::Span, names: &'ctrl [cpplang_common::Span], is_flags: bool) {
        for name in names {
            let resolved = self.identifier_name(*name);
            let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::QtEnum { is_flags });
            self.add_to_current_scope(symbol);
        }
    }

    /// `Q_PRIVATE_SLOT(d, void _q_foo())` declares a slot on the private
    /// object. This front-end doesn't re-enter the full declarator parser
    /// over the embedded signature; it just recovers the slot's name (the
    /// identifier immediately before the signature's parameter list) and
    /// emits a zero-argument `Function` symbol for it, which is enough
    /// for "find declarations of this slot" to see it.
    fn bind_qt_private_slot(&mut self, span: cpplang_common::Span, signature: cpplang_common::Span) {
        let mut slot_name_token = None;
        for index in signature.start..signature.end.saturating_sub(1) {
            if self.tu.token(index).kind == TokenKind::Identifier && self.tu.token(index + 1).kind == TokenKind::LeftParen {
                slot_name_token = Some(index);
            }
        }
        let Some(token_index) = slot_name_token else {
            return;
        };
        let name = self.identifier_name(cpplang_common::Span::at(token_index));
        let function_data = FunctionSymbol {
            scope: Scope::new(),
            return_type: FullySpecifiedType::new(self.control.types().undefined(self.control.arena())),
            parameters: Vec::new(),
            is_variadic: false,
            method_key: MethodKey::Slot,
            is_pure_virtual: false,
        };
        let symbol = self.alloc_symbol(span.start, Some(name), SymbolKind::Function(Box::new(function_data)));
        self.add_to_current_scope(symbol);
    }

    /// `Q_D(Foo)` declares `Foo *d = ...` reaching into `FooPrivate`.
    fn bind_qt_private_pointer(&mut self, span: cpplang_common::Span, class_name: cpplang_common::Span) {
        let private_class = format!("{}Private", self.tu.spelling(class_name.start));
        let id = self.control.intern_identifier(&private_class);
        let private_name = self.control.names().identifier(self.control.arena(), id);
        let pointee = self.control.types().named(self.control.arena(), private_name);
        let ty = FullySpecifiedType::new(self.control.types().pointer(self.control.arena(), pointee));
        let d_id = self.control.intern_identifier("d");
        let d_name = self.control.names().identifier(self.control.arena(), d_id);
        let symbol = self.alloc_symbol(span.start, Some(d_name), SymbolKind::Declaration { ty, is_auto_initialized: false });
        self.add_to_current_scope(symbol);
    }

    /// `Q_Q(Foo)` declares `Foo *q` reaching back out to the public class.
    fn bind_qt_q_pointer(&mut self, span: cpplang_common::Span, class_name: cpplang_common::Span) {
        let name = self.identifier_name(class_name);
        let pointee = self.control.types().named(self.control.arena(), name);
        let ty = FullySpecifiedType::new(self.control.types().pointer(self.control.arena(), pointee));
        let q_id = self.control.intern_identifier("q");
        let q_name = self.control.names().identifier(self.control.arena(), q_id);
        let symbol = self.alloc_symbol(span.start, Some(q_name), SymbolKind::Declaration { ty, is_auto_initialized: false });
        self.add_to_current_scope(symbol);
    }
}

#[cfg(test)]
mod tests {
    use cpplang_arena::Arena;
    use cpplang_common::FrontendOptions;
    use cpplang_control::{Control, Type};
    use cpplang_tu::TranslationUnit;

    use crate::symbol::SymbolKind;

    macro_rules! bind {
        ($scope:ident, $source:expr) => {
            let arena = Arena::new();
            let control = Control::new(&arena);
            let options = FrontendOptions::default();
            let mut tu = TranslationUnit::new("test.cpp", $source, &control, options.lexer_flags);
            let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
            let $scope = crate::bind_translation_unit(&ast, &tu, &control);
        };
    }

    #[test]
    fn q_property_member_binds_under_the_class_scope() {
        bind!(top_level, "class Widget { Q_PROPERTY(int width READ width WRITE setWidth NOTIFY widthChanged) };");
        let class = top_level.members()[0];
        let scope = class.scope().expect("class owns a scope");
        let property = scope.members().into_iter().find(|m| matches!(m.kind, SymbolKind::QtPropertyDeclaration { .. })).expect("Q_PROPERTY bound");
        assert!(property.name.is_some());
    }

    #[test]
    fn q_d_inside_a_method_body_declares_a_private_pointer() {
        bind!(top_level, "void Widget::resize() { Q_D(Widget); }");
        let function = top_level.members().into_iter().find(|m| matches!(m.kind, SymbolKind::Function(_))).expect("function bound");
        let body_scope = function.scope().expect("function owns a scope");
        let d = body_scope.members().into_iter().find(|m| matches!(m.kind, SymbolKind::Declaration { .. })).expect("Q_D pointer bound");
        let SymbolKind::Declaration { ty, .. } = &d.kind else { unreachable!() };
        assert!(matches!(ty.ty, Type::Pointer(_)));
    }
}
