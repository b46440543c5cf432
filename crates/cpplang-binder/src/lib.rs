//! Semantic binding: walks a parsed translation unit and builds the
//! symbol/scope graph [`symbol`] describes. A hand-rolled recursive walk
//! rather than a [`cpplang_ast::visitor::Visitor`] impl, since binding
//! threads accumulated state (the specifier list's folded type, the
//! declarator's function shape, the active visibility/method-key) through
//! sibling nodes in a way a generic visitor's per-node callbacks don't
//! give an easy home to — the original front-end's own binder is a
//! dedicated walker for the same reason.

mod decl;
mod objc;
mod qt;
mod ty;

pub mod symbol;

use cpplang_ast::{ExpressionAst, NameAst as AstNameAst, TranslationUnitAst};
use cpplang_common::limits::MAX_BINDER_RECURSION_DEPTH;
use cpplang_common::DiagnosticCategory;
use cpplang_control::{Control, Name};
use cpplang_tu::TranslationUnit;
use symbol::{MethodKey, Scope, Symbol, Visibility};

/// Binds `ast` against `tu`/`control`, returning the translation unit's
/// top-level scope (namespaces, classes, functions, and so on declared at
/// file scope).
#[must_use]
pub fn bind_translation_unit<'ctrl>(ast: &TranslationUnitAst<'ctrl>, tu: &TranslationUnit<'ctrl>, control: &Control<'ctrl>) -> Scope<'ctrl> {
    let mut binder = Binder::new(tu, control);
    for declaration in ast.declarations {
        binder.bind_declaration(declaration, None);
    }
    binder.top_level
}

pub struct Binder<'tu, 'ctrl> {
    tu: &'tu TranslationUnit<'ctrl>,
    control: &'tu Control<'ctrl>,
    top_level: Scope<'ctrl>,
    scope: Option<&'ctrl Symbol<'ctrl>>,
    visibility: Visibility,
    objc_visibility: Visibility,
    method_key: MethodKey,
    depth: u32,
}

impl<'tu, 'ctrl> Binder<'tu, 'ctrl> {
    fn new(tu: &'tu TranslationUnit<'ctrl>, control: &'tu Control<'ctrl>) -> Self {
        Binder {
            tu,
            control,
            top_level: Scope::new(),
            scope: None,
            visibility: Visibility::Public,
            objc_visibility: Visibility::Public,
            method_key: MethodKey::Normal,
            depth: 0,
        }
    }

    pub(crate) fn error(&self, token_index: u32, message: impl Into<String>) {
        let index = token_index.min(self.tu.token_count().saturating_sub(1));
        self.tu.report(self.control, DiagnosticCategory::Error, self.tu.token(index).utf16_offset, message);
    }

    /// Guards a recursive production the same way the parser does: reports
    /// and refuses once nesting passes the bound, instead of overflowing
    /// the stack on a pathologically deep tree.
    pub(crate) fn enter(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_BINDER_RECURSION_DEPTH {
            self.error(0, "exceeded maximum binder nesting depth");
            false
        } else {
            true
        }
    }

    pub(crate) fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Adds `symbol` to the current scope — the top-level scope if
    /// `self.scope` is `None`, else whatever scope `self.scope` owns.
    pub(crate) fn add_to_current_scope(&self, symbol: &'ctrl Symbol<'ctrl>) {
        match self.scope.and_then(Symbol::scope) {
            Some(scope) => scope.add_member(symbol),
            None => self.top_level.add_member(symbol),
        }
    }

    pub(crate) fn current_scope_is_class(&self) -> bool {
        self.scope.is_some_and(Symbol::is_class)
    }

    /// Runs `body` with `self.scope` switched to `new_scope`, restoring
    /// the previous scope afterward. Mirrors the original binder's
    /// `switchScope`/restore pairing around every scope-owning node.
    pub(crate) fn with_scope<R>(&mut self, new_scope: &'ctrl Symbol<'ctrl>, body: impl FnOnce(&mut Self) -> R) -> R {
        let previous = self.scope.replace(new_scope);
        let result = body(self);
        self.scope = previous;
        result
    }

    pub(crate) fn with_visibility<R>(&mut self, new_visibility: Visibility, body: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.visibility, new_visibility);
        let result = body(self);
        self.visibility = previous;
        result
    }

    pub(crate) fn with_method_key<R>(&mut self, new_method_key: MethodKey, body: impl FnOnce(&mut Self) -> R) -> R {
        let previous = std::mem::replace(&mut self.method_key, new_method_key);
        let result = body(self);
        self.method_key = previous;
        result
    }

    /// Resolves an AST name to its canonical, interned form. Never fails:
    /// an unresolvable qualifier falls back to the innermost simple name,
    /// matching how the original binder tolerates incomplete lookup.
    pub(crate) fn resolve_name(&mut self, name: &'ctrl AstNameAst<'ctrl>) -> &'ctrl Name<'ctrl> {
        let arena = self.control.arena();
        match name {
            AstNameAst::Simple(span) => {
                let id = self.control.intern_identifier(self.tu.spelling(span.start));
                self.control.names().identifier(arena, id)
            }
            AstNameAst::Destructor { name, .. } => {
                let inner = self.resolve_name(name);
                self.control.names().destructor_name_id(arena, inner)
            }
            AstNameAst::TemplateId { name_token, arguments, is_specialization, .. } => {
                let id = self.control.intern_identifier(self.tu.spelling(*name_token));
                let base = self.control.names().identifier(arena, id);
                let mut args = arena.new_list();
                for argument in *arguments {
                    args.push(self.bind_type_id(argument).ty);
                }
                self.control.names().template_name_id(arena, base, args.into_bump_slice(), *is_specialization)
            }
            AstNameAst::Operator { kind, .. } => self.control.names().operator_name_id(arena, *kind),
            AstNameAst::ConversionFunctionId { type_id, .. } => {
                let ty = self.bind_type_id(type_id);
                self.control.names().conversion_name_id(arena, ty.ty)
            }
            AstNameAst::Qualified { base, name, .. } => {
                let inner = self.resolve_name(name);
                match base {
                    Some(base_name) => {
                        let base = self.resolve_name(base_name);
                        self.control.names().qualified_name_id(arena, base, inner)
                    }
                    None => inner,
                }
            }
            AstNameAst::Selector { parts, has_arguments, .. } => {
                let mut names = arena.new_list();
                for part in *parts {
                    let id = self.control.intern_identifier(self.tu.spelling(part.start));
                    names.push(id);
                }
                self.control.names().selector_name_id(arena, names.into_bump_slice(), *has_arguments)
            }
        }
    }

    /// A plain identifier name out of a token span, used by the
    /// "expected a class-name" fallback and similar recovery spots.
    pub(crate) fn identifier_name(&self, span: cpplang_common::Span) -> &'ctrl Name<'ctrl> {
        let id = self.control.intern_identifier(self.tu.spelling(span.start));
        self.control.names().identifier(self.control.arena(), id)
    }

    /// Class names must be a plain identifier or a template-id; anything
    /// else (an operator-id, a destructor-id reached through a typo) is
    /// diagnosed and recovered to its trailing simple name, the same
    /// fallback the original front-end's `ensureValidClassName` performs.
    pub(crate) fn ensure_valid_class_name(&mut self, name: Option<&'ctrl AstNameAst<'ctrl>>, token_index: u32) -> Option<&'ctrl Name<'ctrl>> {
        let name_ast = name?;
        let resolved = self.resolve_name(name_ast);
        if matches!(resolved, Name::Identifier(_) | Name::TemplateNameId { .. }) {
            return Some(resolved);
        }
        self.error(token_index, "expected a class-name");
        match name_ast.trailing_simple_name() {
            Some(span) => Some(self.identifier_name(span)),
            None => Some(resolved),
        }
    }

    /// Walks an expression purely for its nested declarations: lambdas
    /// introduce a function scope of their own, everything else is only
    /// descended into looking for lambdas buried inside.
    pub(crate) fn bind_expression(&mut self, expression: &'ctrl ExpressionAst<'ctrl>) {
        if !self.enter() {
            return;
        }
        match expression {
            ExpressionAst::Lambda(lambda) => self.bind_lambda(lambda),
            ExpressionAst::Nested { inner: expression, .. }
            | ExpressionAst::Unary { operand: expression, .. }
            | ExpressionAst::PostIncrDecr { operand: expression, .. }
            | ExpressionAst::Sizeof { operand: cpplang_ast::SizeofOperandAst::Expression(expression), .. }
            | ExpressionAst::Throw { operand: Some(expression), .. }
            | ExpressionAst::Delete { operand: expression, .. } => self.bind_expression(expression),
            ExpressionAst::Binary { left, right, .. } | ExpressionAst::Comma { left, right, .. } => {
                self.bind_expression(left);
                self.bind_expression(right);
            }
            ExpressionAst::Assignment { target, value, .. } => {
                self.bind_expression(target);
                self.bind_expression(value);
            }
            ExpressionAst::Conditional { condition, then_branch, else_branch, .. } => {
                self.bind_expression(condition);
                self.bind_expression(then_branch);
                self.bind_expression(else_branch);
            }
            ExpressionAst::Call { callee, arguments, .. } => {
                self.bind_expression(callee);
                for argument in *arguments {
                    self.bind_expression(argument);
                }
            }
            ExpressionAst::FunctionalCast { arguments, .. } => {
                for argument in *arguments {
                    self.bind_expression(argument);
                }
            }
            ExpressionAst::ArraySubscript { object, index, .. } => {
                self.bind_expression(object);
                self.bind_expression(index);
            }
            ExpressionAst::Member { object, .. } => self.bind_expression(object),
            ExpressionAst::Cast { operand, .. } => self.bind_expression(operand),
            ExpressionAst::New { placement, initializer, .. } => {
                for argument in *placement {
                    self.bind_expression(argument);
                }
                if let Some(initializer) = initializer {
                    self.bind_expression(initializer);
                }
            }
            ExpressionAst::BracedInitList { elements, .. } => {
                for element in *elements {
                    self.bind_expression(element);
                }
            }
            _ => {}
        }
        self.leave();
    }

    fn bind_lambda(&mut self, lambda: &'ctrl cpplang_ast::LambdaExpressionAst<'ctrl>) {
        let return_type = match lambda.trailing_return_type {
            Some(type_id) => self.bind_type_id(type_id),
            None => cpplang_control::FullySpecifiedType::new(self.control.types().undefined(self.control.arena())),
        };
        let parameters = self.bind_parameters(lambda.parameters);
        let function = symbol::FunctionSymbol {
            scope: Scope::new(),
            return_type,
            parameters: parameters.clone(),
            is_variadic: false,
            method_key: MethodKey::Normal,
            is_pure_virtual: false,
        };
        let symbol = self.control.arena().alloc(Symbol::new(
            lambda.span.start,
            None,
            self.scope,
            symbol::SymbolKind::Function(Box::new(function)),
        ));
        for parameter in &parameters {
            symbol.scope().expect("just constructed with a scope").add_member(parameter);
        }
        self.with_scope(symbol, |binder| binder.bind_statement(lambda.body));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_arena::Arena;
    use cpplang_common::FrontendOptions;
    use symbol::SymbolKind;

    macro_rules! bind {
        ($scope:ident, $source:expr) => {
            let arena = Arena::new();
            let control = Control::new(&arena);
            let options = FrontendOptions::default();
            let mut tu = TranslationUnit::new("test.cpp", $source, &control, options.lexer_flags);
            let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
            let $scope = bind_translation_unit(&ast, &tu, &control);
        };
    }

    #[test]
    fn namespace_members_nest_under_the_namespace_scope() {
        bind!(top_level, "namespace app { int counter; }");
        assert_eq!(top_level.member_count(), 1);
        let ns = top_level.members()[0];
        let SymbolKind::Namespace { scope, .. } = &ns.kind else { panic!("expected a namespace") };
        assert_eq!(scope.member_count(), 1);
        assert!(matches!(scope.members()[0].kind, SymbolKind::Declaration { .. }));
    }

    #[test]
    fn namespace_alias_resolves_its_target_name() {
        bind!(top_level, "namespace app {} namespace shortcut = app;");
        let alias = top_level.members().into_iter().find(|s| matches!(s.kind, SymbolKind::NamespaceAlias { .. })).expect("alias bound");
        let SymbolKind::NamespaceAlias { target } = &alias.kind else { unreachable!() };
        assert!(matches!(target, Name::Identifier(_)));
    }

    #[test]
    fn class_forward_declaration_binds_without_a_scope() {
        bind!(top_level, "class Thing;");
        assert_eq!(top_level.member_count(), 1);
        let symbol = top_level.members()[0];
        assert!(matches!(symbol.kind, SymbolKind::ForwardClassDeclaration));
        assert!(symbol.scope().is_none());
    }
}
