//! Objective-C symbol emission: `@interface`/`@implementation`/
//! `@protocol`, methods, properties, and instance variables.

use crate::symbol::{ObjcClassSymbol, Scope, Symbol, SymbolKind, Visibility};
use crate::Binder;
use cpplang_ast::{ObjcDeclarationAst, ObjcInstanceVariableAst, ObjcMethodPrototypeAst, ObjcVisibility, StatementAst};
use cpplang_control::FullySpecifiedType;

impl<'tu, 'ctrl> Binder<'tu, 'ctrl> {
    pub(crate) fn bind_objc_declaration(&mut self, objc: &'ctrl ObjcDeclarationAst<'ctrl>) {
        match objc {
            ObjcDeclarationAst::ClassForwardDeclaration { names, .. } => {
                for name in *names {
                    let resolved = self.identifier_name(*name);
                    let symbol = self.alloc_symbol(name.start, Some(resolved), SymbolKind::ForwardObjCClassDeclaration);
                    self.add_to_current_scope(symbol);
                }
            }
            ObjcDeclarationAst::ProtocolForwardDeclaration { names, .. } => {
                for name in *names {
                    let resolved = self.identifier_name(*name);
                    let symbol = self.alloc_symbol(name.start, Some(resolved), SymbolKind::ForwardObjCProtocolDeclaration);
                    self.add_to_current_scope(symbol);
                }
            }
            ObjcDeclarationAst::ClassInterface { span, name, category, superclass, protocols, instance_variables, members } => {
                let resolved = self.identifier_name(*name);
                let category = category.map(|c| self.tu.spelling(c.start).to_string());
                let class_data = ObjcClassSymbol { scope: Scope::new(), is_interface: true, category };
                let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::ObjCClass(Box::new(class_data)));
                self.add_to_current_scope(symbol);
                self.with_scope(symbol, |binder| {
                    if let Some(superclass) = superclass {
                        let super_name = binder.resolve_name(superclass);
                        let base = binder.alloc_symbol(span.start, Some(super_name), SymbolKind::ObjCBaseClass);
                        binder.add_to_current_scope(base);
                    }
                    for protocol in *protocols {
                        let protocol_name = binder.identifier_name(*protocol);
                        let base = binder.alloc_symbol(protocol.start, Some(protocol_name), SymbolKind::ObjCBaseProtocol);
                        binder.add_to_current_scope(base);
                    }
                    for ivar in *instance_variables {
                        binder.bind_objc_instance_variable(ivar);
                    }
                    for member in *members {
                        binder.bind_declaration(member);
                    }
                });
            }
            ObjcDeclarationAst::ClassImplementation { span, name, category, instance_variables, members } => {
                let resolved = self.identifier_name(*name);
                let category = category.map(|c| self.tu.spelling(c.start).to_string());
                let class_data = ObjcClassSymbol { scope: Scope::new(), is_interface: false, category };
                let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::ObjCClass(Box::new(class_data)));
                self.add_to_current_scope(symbol);
                self.with_scope(symbol, |binder| {
                    for ivar in *instance_variables {
                        binder.bind_objc_instance_variable(ivar);
                    }
                    for member in *members {
                        binder.bind_declaration(member);
                    }
                });
            }
            ObjcDeclarationAst::ProtocolDeclaration { span, name, protocols, members } => {
                let resolved = self.identifier_name(*name);
                let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::ObjCProtocol { scope: Scope::new() });
                self.add_to_current_scope(symbol);
                self.with_scope(symbol, |binder| {
                    for protocol in *protocols {
                        let protocol_name = binder.identifier_name(*protocol);
                        let base = binder.alloc_symbol(protocol.start, Some(protocol_name), SymbolKind::ObjCBaseProtocol);
                        binder.add_to_current_scope(base);
                    }
                    for member in *members {
                        binder.bind_declaration(member);
                    }
                });
            }
            ObjcDeclarationAst::MethodDeclaration(prototype) => self.bind_objc_method(prototype, None),
            ObjcDeclarationAst::MethodDefinition { prototype, body, .. } => self.bind_objc_method(prototype, Some(body)),
            ObjcDeclarationAst::PropertyDeclaration { span, type_id, name, .. } => {
                let ty = self.bind_type_id(type_id);
                let resolved = self.identifier_name(*name);
                let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::ObjCPropertyDeclaration { ty });
                self.add_to_current_scope(symbol);
            }
            ObjcDeclarationAst::PropertySynthesize { .. } | ObjcDeclarationAst::PropertyDynamic { .. } => {}
            ObjcDeclarationAst::VisibilityMarker { visibility, .. } => {
                self.objc_visibility = convert_objc_visibility(*visibility);
            }
        }
    }

    fn bind_objc_instance_variable(&mut self, ivar: &'ctrl ObjcInstanceVariableAst<'ctrl>) {
        let ty = self.bind_specifiers(ivar.specifiers);
        let resolved = self.identifier_name(ivar.name);
        let visibility = ivar.visibility.map_or(self.objc_visibility, convert_objc_visibility);
        let mut symbol = Symbol::new(ivar.span.start, Some(resolved), self.scope, SymbolKind::Declaration { ty, is_auto_initialized: false });
        symbol.visibility = visibility;
        let symbol = self.control.arena().alloc(symbol);
        self.add_to_current_scope(symbol);
    }

    fn bind_objc_method(&mut self, prototype: &'ctrl ObjcMethodPrototypeAst<'ctrl>, body: Option<&'ctrl StatementAst<'ctrl>>) {
        let return_type = match prototype.return_type {
            Some(type_id) => self.bind_type_id(type_id),
            None => FullySpecifiedType::new(self.control.types().undefined(self.control.arena())),
        };
        let symbol = self.alloc_symbol(
            prototype.span.start,
            None,
            SymbolKind::ObjCMethod { scope: Scope::new(), is_class_method: prototype.is_class_method, return_type },
        );
        self.add_to_current_scope(symbol);
        self.with_scope(symbol, |binder| {
            for parameter in prototype.parameters {
                let ty = match parameter.type_id {
                    Some(type_id) => binder.bind_type_id(type_id),
                    None => FullySpecifiedType::new(binder.control.types().undefined(binder.control.arena())),
                };
                if let Some(name) = parameter.name {
                    let resolved = binder.identifier_name(name);
                    let argument = binder.alloc_symbol(name.start, Some(resolved), SymbolKind::Argument { ty });
                    binder.add_to_current_scope(argument);
                }
            }
            if let Some(body) = body {
                binder.bind_statement(body);
            }
        });
    }
}

fn convert_objc_visibility(visibility: ObjcVisibility) -> Visibility {
    match visibility {
        ObjcVisibility::Private => Visibility::Private,
        ObjcVisibility::Protected => Visibility::Protected,
        ObjcVisibility::Public => Visibility::Public,
        ObjcVisibility::Package => Visibility::Package,
    }
}

#[cfg(test)]
mod tests {
    use cpplang_arena::Arena;
    use cpplang_common::FrontendOptions;
    use cpplang_control::Control;
    use cpplang_tu::TranslationUnit;

    use crate::symbol::SymbolKind;

    macro_rules! bind {
        ($scope:ident, $source:expr) => {
            let arena = Arena::new();
            let control = Control::new(&arena);
            let options = FrontendOptions::default();
            let mut tu = TranslationUnit::new("test.m", $source, &control, options.lexer_flags);
            let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
            let $scope = crate::bind_translation_unit(&ast, &tu, &control);
        };
    }

    #[test]
    fn class_interface_binds_base_class_ivar_property_and_method() {
        bind!(
            top_level,
            "@interface Widget : NSObject { int _count; } @property (nonatomic) NSString *name; - (void)tick; @end"
        );
        let class = top_level.members()[0];
        assert!(matches!(class.kind, SymbolKind::ObjCClass(_)));
        let scope = class.scope().expect("objc class owns a scope");
        let members = scope.members();
        assert!(members.iter().any(|m| matches!(m.kind, SymbolKind::ObjCBaseClass)), "base class bound");
        assert!(members.iter().any(|m| matches!(m.kind, SymbolKind::Declaration { .. })), "ivar bound");
        assert!(members.iter().any(|m| matches!(m.kind, SymbolKind::ObjCPropertyDeclaration { .. })), "property bound");
        let method = members.iter().find(|m| matches!(m.kind, SymbolKind::ObjCMethod { .. })).expect("method bound");
        assert!(matches!(method.kind, SymbolKind::ObjCMethod { is_class_method: false, .. }));
    }

    #[test]
    fn keyword_selector_method_binds_one_argument_per_part() {
        bind!(top_level, "@implementation Widget - (void)setWidth:(int)w height:(int)h { } @end");
        let class = top_level.members()[0];
        let scope = class.scope().expect("objc class owns a scope");
        let method = scope.members().into_iter().find(|m| matches!(m.kind, SymbolKind::ObjCMethod { .. })).expect("method bound");
        let method_scope = method.scope().expect("method owns a scope");
        let argument_count = method_scope.members().iter().filter(|m| matches!(m.kind, SymbolKind::Argument { .. })).count();
        assert_eq!(argument_count, 2);
    }
}
