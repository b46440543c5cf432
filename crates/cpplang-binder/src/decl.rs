//! SimpleDeclaration/ClassSpecifier/EnumSpecifier/Template/
//! FunctionDefinition binding: the core of the symbol table.

use crate::symbol::{ClassKey, ClassSymbol, EnumSymbol, FunctionSymbol, MethodKey, Scope, Symbol, SymbolKind, Visibility};
use crate::ty::Layered;
use crate::Binder;
use cpplang_ast::{
    BaseClassAst, ClassSpecifierAst, DeclarationAst, EnumSpecifierAst, EnumeratorAst, ExpressionAst, InitDeclaratorAst, SpecifierAst, StatementAst,
    TemplateParameterAst,
};
use cpplang_common::Span;
use cpplang_control::Qualifiers;
use cpplang_lexer::TokenKind;
use std::cell::RefCell;

impl<'tu, 'ctrl> Binder<'tu, 'ctrl> {
    pub(crate) fn bind_declaration(&mut self, declaration: &'ctrl DeclarationAst<'ctrl>) {
        if !self.enter() {
            return;
        }
        match declaration {
            DeclarationAst::Simple { specifiers, declarators, .. } => self.bind_simple_declaration(specifiers, declarators),
            DeclarationAst::FunctionDefinition { span, specifiers, declarator, member_initializers, body } => {
                self.bind_function_definition(*span, specifiers, declarator, member_initializers, body)
            }
            DeclarationAst::Template { span, parameters, declaration } => self.bind_template(*span, parameters, declaration),
            DeclarationAst::Namespace { span, name, is_inline, members } => self.bind_namespace(*span, *name, *is_inline, members),
            DeclarationAst::NamespaceAlias { span, name, target } => {
                let alias_name = self.identifier_name(*name);
                let target_name = self.resolve_name(target);
                let symbol = self.alloc_symbol(span.start, Some(alias_name), SymbolKind::NamespaceAlias { target: target_name });
                self.add_to_current_scope(symbol);
            }
            DeclarationAst::UsingDeclaration { span, name } => {
                let resolved = self.resolve_name(name);
                let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::UsingDeclaration);
                self.add_to_current_scope(symbol);
            }
            DeclarationAst::UsingDirective { span, name } => {
                let resolved = self.resolve_name(name);
                let symbol = self.alloc_symbol(span.start, Some(resolved), SymbolKind::UsingNamespaceDirective);
                self.add_to_current_scope(symbol);
            }
            DeclarationAst::LinkageSpecification { members, .. } => {
                for member in *members {
                    self.bind_declaration(member);
                }
            }
            DeclarationAst::Asm(_) => {}
            DeclarationAst::Empty(span) => {
                if let Some((visibility, method_key)) = self.method_key_for_access_label(*span) {
                    self.visibility = visibility;
                    self.method_key = method_key;
                }
            }
            DeclarationAst::Objc(objc) => self.bind_objc_declaration(objc),
            DeclarationAst::Qt(qt) => self.bind_qt_declaration(qt),
        }
        self.leave();
    }

    /// Allocates `kind` as a symbol enclosed by the current scope, copying
    /// the active visibility across only when the current scope is a
    /// class — exactly the gating the original binder applies to every
    /// member it constructs.
    pub(crate) fn alloc_symbol(&self, token_index: u32, name: Option<&'ctrl cpplang_control::Name<'ctrl>>, kind: SymbolKind<'ctrl>) -> &'ctrl Symbol<'ctrl> {
        let mut symbol = Symbol::new(token_index, name, self.scope, kind);
        if self.current_scope_is_class() {
            symbol.visibility = self.visibility;
        }
        self.control.arena().alloc(symbol)
    }

    fn bind_simple_declaration(&mut self, specifiers: &'ctrl [&'ctrl SpecifierAst<'ctrl>], declarators: &'ctrl [InitDeclaratorAst<'ctrl>]) {
        if declarators.is_empty() {
            for specifier in specifiers.iter().copied() {
                if let SpecifierAst::ElaboratedType { name, span, .. } = *specifier {
                    let resolved = self.ensure_valid_class_name(Some(name), span.start);
                    let symbol = self.alloc_symbol(span.start, resolved, SymbolKind::ForwardClassDeclaration);
                    self.add_to_current_scope(symbol);
                    return;
                }
            }
        }

        let base_type = self.bind_specifiers(specifiers);
        let is_virtual = base_type.has(Qualifiers::VIRTUAL);
        for declarator in declarators {
            if let Some(initializer) = declarator.initializer {
                self.bind_expression(initializer);
            }
            let (layered, name) = self.bind_declarator(declarator.declarator, base_type);
            let resolved_name = name.map(|n| self.resolve_name(n));
            let token_index = name.map_or(declarator.span.start, |n| n.span().start);

            if let Some(shape) = layered.function {
                let is_pure_virtual = is_virtual && self.is_pure_specifier(declarator.initializer);
                let function_data = FunctionSymbol {
                    scope: Scope::new(),
                    return_type: shape.return_type,
                    parameters: shape.parameters.clone(),
                    is_variadic: shape.is_variadic,
                    method_key: self.method_key,
                    is_pure_virtual,
                };
                let symbol = self.alloc_symbol(token_index, resolved_name, SymbolKind::Function(Box::new(function_data)));
                for parameter in &shape.parameters {
                    symbol.scope().expect("function scope").add_member(parameter);
                }
                self.add_to_current_scope(symbol);
            } else {
                let is_auto = layered.ty.has(Qualifiers::AUTO);
                if is_auto && declarator.initializer.is_none() {
                    self.error(token_index, "declaration of a variable with type 'auto' requires an initializer");
                }
                let kind = SymbolKind::Declaration { ty: layered.ty, is_auto_initialized: is_auto && declarator.initializer.is_some() };
                let symbol = self.alloc_symbol(token_index, resolved_name, kind);
                self.add_to_current_scope(symbol);
            }
        }
    }

    fn is_pure_specifier(&self, initializer: Option<&'ctrl ExpressionAst<'ctrl>>) -> bool {
        matches!(initializer, Some(ExpressionAst::Literal(span)) if self.tu.spelling(span.start) == "0")
    }

    fn bind_function_definition(
        &mut self,
        span: Span,
        specifiers: &'ctrl [&'ctrl SpecifierAst<'ctrl>],
        declarator: &'ctrl cpplang_ast::DeclaratorAst<'ctrl>,
        member_initializers: &'ctrl [cpplang_ast::MemberInitializerAst<'ctrl>],
        body: &'ctrl StatementAst<'ctrl>,
    ) {
        let base_type = self.bind_specifiers(specifiers);
        let (layered, name) = self.bind_declarator(declarator, base_type);
        let resolved_name = name.map(|n| self.resolve_name(n));
        let token_index = name.map_or(span.start, |n| n.span().start);

        match layered.function {
            Some(shape) => {
                let function_data = FunctionSymbol {
                    scope: Scope::new(),
                    return_type: shape.return_type,
                    parameters: shape.parameters.clone(),
                    is_variadic: shape.is_variadic,
                    method_key: self.method_key,
                    is_pure_virtual: false,
                };
                let symbol = self.alloc_symbol(token_index, resolved_name, SymbolKind::Function(Box::new(function_data)));
                for parameter in &shape.parameters {
                    symbol.scope().expect("function scope").add_member(parameter);
                }
                self.add_to_current_scope(symbol);
                for initializer in member_initializers {
                    for argument in initializer.arguments {
                        self.bind_expression(argument);
                    }
                }
                self.with_scope(symbol, |binder| binder.bind_statement(body));
            }
            None => {
                self.error(token_index, "expected a function declarator");
                self.bind_statement(body);
            }
        }
    }

    pub(crate) fn bind_statement(&mut self, statement: &'ctrl StatementAst<'ctrl>) {
        if !self.enter() {
            return;
        }
        match statement {
            StatementAst::Compound { statements, span } => {
                let block = self.alloc_symbol(span.start, None, SymbolKind::Block { scope: Scope::new() });
                self.with_scope(block, |binder| {
                    for inner in *statements {
                        binder.bind_statement(inner);
                    }
                });
            }
            StatementAst::Expression { expression, .. } => {
                if let Some(expression) = expression {
                    self.bind_expression(expression);
                }
            }
            StatementAst::Declaration { declaration, .. } => self.bind_declaration(declaration),
            StatementAst::If { condition, then_branch, else_branch, .. } => {
                self.bind_expression(condition);
                self.bind_statement(then_branch);
                if let Some(else_branch) = else_branch {
                    self.bind_statement(else_branch);
                }
            }
            StatementAst::While { condition, body, .. } | StatementAst::Switch { condition, body, .. } => {
                self.bind_expression(condition);
                self.bind_statement(body);
            }
            StatementAst::DoWhile { body, condition, .. } => {
                self.bind_statement(body);
                self.bind_expression(condition);
            }
            StatementAst::For { init, condition, step, body, .. } => {
                if let Some(init) = init {
                    self.bind_statement(init);
                }
                if let Some(condition) = condition {
                    self.bind_expression(condition);
                }
                if let Some(step) = step {
                    self.bind_expression(step);
                }
                self.bind_statement(body);
            }
            StatementAst::RangeBasedFor { declaration, range, body, .. } => {
                self.bind_declaration(declaration);
                self.bind_expression(range);
                self.bind_statement(body);
            }
            StatementAst::Case { value, body, .. } => {
                self.bind_expression(value);
                self.bind_statement(body);
            }
            StatementAst::Default { body, .. } | StatementAst::Labeled { body, .. } => self.bind_statement(body),
            StatementAst::Break(_) | StatementAst::Continue(_) | StatementAst::Goto { .. } => {}
            StatementAst::Return { value, .. } => {
                if let Some(value) = value {
                    self.bind_expression(value);
                }
            }
            StatementAst::Try { body, handlers, .. } => {
                self.bind_statement(body);
                for handler in *handlers {
                    if let Some(exception_declaration) = handler.exception_declaration {
                        self.bind_declaration(exception_declaration);
                    }
                    self.bind_statement(handler.body);
                }
            }
        }
        self.leave();
    }

    pub(crate) fn bind_class_specifier(&mut self, class_spec: &'ctrl ClassSpecifierAst<'ctrl>) -> &'ctrl Symbol<'ctrl> {
        let class_key = match self.tu.token(class_spec.class_key.start).kind {
            TokenKind::KwStruct => ClassKey::Struct,
            TokenKind::KwUnion => ClassKey::Union,
            _ => ClassKey::Class,
        };
        let name = self.ensure_valid_class_name(class_spec.name, class_spec.span.start);
        let class_data = ClassSymbol::new(Scope::new(), class_key);
        let symbol = self.alloc_symbol(class_spec.span.start, name, SymbolKind::Class(Box::new(class_data)));
        self.add_to_current_scope(symbol);

        let default_visibility = if class_key == ClassKey::Class { Visibility::Private } else { Visibility::Public };

        self.with_scope(symbol, |binder| {
            binder.with_visibility(default_visibility, |binder| {
                binder.with_method_key(MethodKey::Normal, |binder| {
                    for base in class_spec.bases {
                        binder.bind_base_class(base, symbol);
                    }
                    for member in class_spec.members {
                        binder.bind_declaration(member);
                    }
                });
            });
        });
        symbol
    }

    fn bind_base_class(&mut self, base: &'ctrl BaseClassAst<'ctrl>, owner: &'ctrl Symbol<'ctrl>) {
        let resolved = self.resolve_name(base.name);
        let symbol = self.alloc_symbol(base.span.start, Some(resolved), SymbolKind::BaseClass { class: None });
        if let Some(class_data) = owner.as_class() {
            class_data.add_base_class(symbol);
        }
    }

    pub(crate) fn bind_enum_specifier(&mut self, enum_spec: &'ctrl EnumSpecifierAst<'ctrl>) -> &'ctrl Symbol<'ctrl> {
        let name = enum_spec.name.map(|n| self.resolve_name(n));
        let enum_data = EnumSymbol { scope: Scope::new(), is_scoped: enum_spec.is_scoped };
        let symbol = self.alloc_symbol(enum_spec.span.start, name, SymbolKind::Enum(Box::new(enum_data)));
        self.add_to_current_scope(symbol);
        self.with_scope(symbol, |binder| {
            for enumerator in enum_spec.enumerators {
                binder.bind_enumerator(enumerator, symbol);
            }
        });
        symbol
    }

    fn bind_enumerator(&mut self, enumerator: &'ctrl EnumeratorAst<'ctrl>, enum_symbol: &'ctrl Symbol<'ctrl>) {
        if let Some(expression) = enumerator.expression {
            self.bind_expression(expression);
        }
        let constant_value = match enumerator.expression {
            Some(ExpressionAst::Literal(span)) => self.tu.spelling(span.start).to_string(),
            _ => {
                let scope = enum_symbol.scope().expect("enum always owns a scope");
                match scope.find_last(|_| true).map(|m| &m.kind) {
                    Some(SymbolKind::EnumeratorDeclaration { constant_value }) => increment_constant_value(constant_value),
                    _ => "0".to_string(),
                }
            }
        };
        let name = self.identifier_name(enumerator.name);
        let symbol = self.alloc_symbol(enumerator.span.start, Some(name), SymbolKind::EnumeratorDeclaration { constant_value });
        self.add_to_current_scope(symbol);
    }

    fn bind_template(&mut self, span: Span, parameters: &'ctrl [TemplateParameterAst<'ctrl>], declaration: &'ctrl DeclarationAst<'ctrl>) {
        let symbol = self.alloc_symbol(span.start, None, SymbolKind::Template { scope: Scope::new(), declaration: RefCell::new(None) });
        self.with_scope(symbol, |binder| {
            for parameter in parameters {
                binder.bind_template_parameter(parameter);
            }
            binder.bind_declaration(declaration);
        });
        if let SymbolKind::Template { scope, declaration: wrapped } = &symbol.kind {
            let real_declaration = scope.find_last(|m| !matches!(m.kind, SymbolKind::TypenameArgument { .. } | SymbolKind::Argument { .. }));
            *wrapped.borrow_mut() = real_declaration;
        }
        self.add_to_current_scope(symbol);
    }

    fn bind_template_parameter(&mut self, parameter: &'ctrl TemplateParameterAst<'ctrl>) {
        match parameter {
            TemplateParameterAst::Type { span, name, default_value, .. } => {
                if let Some(default_value) = default_value {
                    self.bind_type_id(default_value);
                }
                let resolved_name = name.map(|n| self.identifier_name(n));
                let symbol = self.alloc_symbol(span.start, resolved_name, SymbolKind::TypenameArgument { is_class_declarator: true });
                self.add_to_current_scope(symbol);
            }
            TemplateParameterAst::NonType { parameter, .. } => {
                let base = self.bind_specifiers(parameter.specifiers);
                let (layered, name) = match parameter.declarator {
                    Some(declarator) => self.bind_declarator(declarator, base),
                    None => (Layered::plain(base), None),
                };
                if let Some(default_value) = parameter.default_value {
                    self.bind_expression(default_value);
                }
                let resolved_name = name.map(|n| self.resolve_name(n));
                let token_index = name.map_or(parameter.span.start, |n| n.span().start);
                let symbol = self.alloc_symbol(token_index, resolved_name, SymbolKind::Argument { ty: layered.ty });
                self.add_to_current_scope(symbol);
            }
            TemplateParameterAst::Template { span, parameters, name, .. } => {
                let resolved_name = name.map(|n| self.identifier_name(n));
                let symbol = self.alloc_symbol(span.start, resolved_name, SymbolKind::Template { scope: Scope::new(), declaration: RefCell::new(None) });
                self.with_scope(symbol, |binder| {
                    for parameter in *parameters {
                        binder.bind_template_parameter(parameter);
                    }
                });
                self.add_to_current_scope(symbol);
            }
        }
    }

    fn bind_namespace(&mut self, span: Span, name: Option<Span>, is_inline: bool, members: &'ctrl [&'ctrl DeclarationAst<'ctrl>]) {
        let resolved_name = name.map(|n| self.identifier_name(n));
        let symbol = self.alloc_symbol(span.start, resolved_name, SymbolKind::Namespace { scope: Scope::new(), is_inline });
        self.add_to_current_scope(symbol);
        self.with_scope(symbol, |binder| {
            for member in members {
                binder.bind_declaration(member);
            }
        });
    }
}

/// Derives the next enumerator's constant-value spelling from the
/// previous one: integer literals increment in the obvious way; anything
/// else (a computed initializer this front-end doesn't evaluate) resets
/// to the same increment-from-previous fallback the original binder uses
/// when it can't evaluate an enumerator's initializer either.
fn increment_constant_value(previous: &str) -> String {
    let value = if let Some(hex) = previous.strip_prefix("0x").or_else(|| previous.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).unwrap_or(0)
    } else {
        previous.parse::<i64>().unwrap_or(0)
    };
    (value + 1).to_string()
}

#[cfg(test)]
mod tests {
    use cpplang_arena::Arena;
    use cpplang_common::FrontendOptions;
    use cpplang_control::Control;
    use cpplang_tu::TranslationUnit;

    use crate::symbol::{SymbolKind, Visibility};

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
    fn base_class_is_recorded_on_the_derived_class_symbol() {
        bind!(top_level, "class Widget : public Base { public: int value; void tick(); };");
        let class = top_level.members()[0];
        let class_data = class.as_class().expect("Widget bound as a class");
        let bases = class_data.base_classes();
        assert_eq!(bases.len(), 1);
        assert!(matches!(bases[0].kind, SymbolKind::BaseClass { .. }));
    }

    #[test]
    fn struct_members_default_to_public_class_members_default_to_private() {
        bind!(struct_top, "struct S { int a; };");
        let struct_field = struct_top.members()[0].as_class().unwrap().scope.members()[0];
        assert_eq!(struct_field.visibility, Visibility::Public);

        bind!(class_top, "class C { int a; };");
        let class_field = class_top.members()[0].as_class().unwrap().scope.members()[0];
        assert_eq!(class_field.visibility, Visibility::Private);
    }

    #[test]
    fn using_declaration_and_directive_bind_distinct_symbol_kinds() {
        bind!(top_level, "using std::vector; using namespace std;");
        assert_eq!(top_level.member_count(), 2);
        assert!(matches!(top_level.members()[0].kind, SymbolKind::UsingDeclaration));
        assert!(matches!(top_level.members()[1].kind, SymbolKind::UsingNamespaceDirective));
    }
}
