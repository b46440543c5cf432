//! Specifier-list and declarator type construction.
//!
//! Mirrors the original front-end's `Bind::declarator`: a declarator's
//! `ptr_operators` apply to the accumulated type first, then its `postfix`
//! operators wrap the result, and only then does the core declarator (an
//! id, an abstract slot, or a parenthesized sub-declarator) get visited.
//! Parens only change *evaluation order*, not the shape of the algorithm:
//! a `Nested` core just re-enters the same function with the accumulated
//! type so far.

use crate::symbol::{MethodKey, Symbol};
use crate::Binder;
use cpplang_ast::{CoreDeclaratorAst, DeclaratorAst, NameAst, ParameterAst, PostfixDeclaratorAst, PtrOperatorAst, SpecifierAst, TypeIdAst};
use cpplang_control::{FloatKind, FullySpecifiedType, IntegerKind, Qualifiers};
use cpplang_lexer::TokenKind;

/// A function declarator's shape, held separately from `FullySpecifiedType`
/// since the canonical `Type` pool has no function variant: a function's
/// identity lives in its `Symbol`, not in `Type`.
#[derive(Debug)]
pub(crate) struct FunctionShape<'ctrl> {
    pub return_type: FullySpecifiedType<'ctrl>,
    pub parameters: Vec<&'ctrl Symbol<'ctrl>>,
    pub is_variadic: bool,
}

/// The type accumulated while walking a declarator, plus the function
/// shape if the declarator's outermost, not-yet-wrapped form is directly a
/// function (as opposed to a pointer/array/reference wrapping one).
#[derive(Debug)]
pub(crate) struct Layered<'ctrl> {
    pub ty: FullySpecifiedType<'ctrl>,
    pub function: Option<FunctionShape<'ctrl>>,
}

impl<'ctrl> Layered<'ctrl> {
    pub(crate) fn plain(ty: FullySpecifiedType<'ctrl>) -> Self {
        Layered { ty, function: None }
    }
}

impl<'tu, 'ctrl> Binder<'tu, 'ctrl> {
    /// Decl-specifier-seq to `FullySpecifiedType`. Handles the
    /// storage/cv-qualifier keywords, the signed/unsigned + short/long +
    /// int/char/float/double combinations, named/elaborated types, and
    /// nested class/enum specifiers (which this also binds as a side
    /// effect, exactly as the original's `specifier()` visit does).
    pub(crate) fn bind_specifiers(&mut self, specifiers: &'ctrl [&'ctrl SpecifierAst<'ctrl>]) -> FullySpecifiedType<'ctrl> {
        let mut qualifiers = Qualifiers::empty();
        let mut base: Option<FullySpecifiedType<'ctrl>> = None;
        let (mut saw_char, mut saw_short, mut saw_int, mut saw_float, mut saw_double, mut saw_void) = (false, false, false, false, false, false);
        let mut long_count = 0u32;

        for specifier in specifiers {
            match specifier {
                SpecifierAst::Simple(span) => match self.tu.token(span.start).kind {
                    TokenKind::KwConst => {
                        qualifiers |= Qualifiers::CONST;
                    }
                    TokenKind::KwVolatile => qualifiers |= Qualifiers::VOLATILE,
                    TokenKind::KwStatic => qualifiers |= Qualifiers::STATIC,
                    TokenKind::KwExtern => qualifiers |= Qualifiers::EXTERN,
                    TokenKind::KwMutable => qualifiers |= Qualifiers::MUTABLE,
                    TokenKind::KwTypedef => qualifiers |= Qualifiers::TYPEDEF,
                    TokenKind::KwInline => qualifiers |= Qualifiers::INLINE,
                    TokenKind::KwVirtual => qualifiers |= Qualifiers::VIRTUAL,
                    TokenKind::KwExplicit => qualifiers |= Qualifiers::EXPLICIT,
                    TokenKind::KwFriend => qualifiers |= Qualifiers::FRIEND,
                    TokenKind::KwRegister => qualifiers |= Qualifiers::REGISTER,
                    TokenKind::KwSigned => qualifiers |= Qualifiers::SIGNED,
                    TokenKind::KwUnsigned => qualifiers |= Qualifiers::UNSIGNED,
                    TokenKind::KwAuto => qualifiers |= Qualifiers::AUTO,
                    TokenKind::KwVoid => saw_void = true,
                    TokenKind::KwChar => saw_char = true,
                    TokenKind::KwShort => saw_short = true,
                    TokenKind::KwInt => saw_int = true,
                    TokenKind::KwLong => long_count += 1,
                    TokenKind::KwFloat => saw_float = true,
                    TokenKind::KwDouble => saw_double = true,
                    _ => {}
                },
                SpecifierAst::NamedType { name, .. } | SpecifierAst::ElaboratedType { name, .. } => {
                    let resolved = self.resolve_name(name);
                    base = Some(FullySpecifiedType::new(self.control.types().named(self.control.arena(), resolved)));
                }
                SpecifierAst::Class(class_spec) => {
                    let class_symbol = self.bind_class_specifier(class_spec);
                    let name = class_symbol.name.unwrap_or_else(|| self.control.names().anonymous_name_id(self.control.arena()));
                    base = Some(FullySpecifiedType::new(self.control.types().named(self.control.arena(), name)));
                }
                SpecifierAst::Enum(enum_spec) => {
                    let enum_symbol = self.bind_enum_specifier(enum_spec);
                    let name = enum_symbol.name.unwrap_or_else(|| self.control.names().anonymous_name_id(self.control.arena()));
                    base = Some(FullySpecifiedType::new(self.control.types().named(self.control.arena(), name)));
                }
                SpecifierAst::Typeof { expression, .. } => {
                    self.bind_expression(expression);
                    base = Some(FullySpecifiedType::new(self.control.types().undefined(self.control.arena())));
                }
                SpecifierAst::Attribute(span) => {
                    let spelling = self.tu.spelling(span.start);
                    if spelling == "deprecated" {
                        qualifiers |= Qualifiers::DEPRECATED;
                    } else if spelling == "unavailable" {
                        qualifiers |= Qualifiers::UNAVAILABLE;
                    }
                }
            }
        }

        let mut result = base.unwrap_or_else(|| {
            let ty = if saw_void {
                self.control.types().void(self.control.arena())
            } else if saw_double {
                self.control.types().float(self.control.arena(), if long_count >= 1 { FloatKind::LongDouble } else { FloatKind::Double })
            } else if saw_float {
                self.control.types().float(self.control.arena(), FloatKind::Float)
            } else if saw_char {
                self.control.types().integer(self.control.arena(), IntegerKind::Char)
            } else if saw_short {
                self.control.types().integer(self.control.arena(), IntegerKind::Short)
            } else if long_count >= 2 {
                self.control.types().integer(self.control.arena(), IntegerKind::LongLong)
            } else if long_count == 1 {
                self.control.types().integer(self.control.arena(), IntegerKind::Long)
            } else if saw_int || qualifiers.intersects(Qualifiers::SIGNED | Qualifiers::UNSIGNED) {
                self.control.types().integer(self.control.arena(), IntegerKind::Int)
            } else {
                self.control.types().undefined(self.control.arena())
            };
            FullySpecifiedType::new(ty)
        });
        result.set(qualifiers);
        result
    }

    fn apply_cv_run(&self, ty: &mut FullySpecifiedType<'ctrl>, cv_qualifiers: &[cpplang_common::Span]) {
        for span in cv_qualifiers {
            match self.tu.token(span.start).kind {
                TokenKind::KwConst => {
                    ty.set(Qualifiers::CONST);
                }
                TokenKind::KwVolatile => {
                    ty.set(Qualifiers::VOLATILE);
                }
                _ => {}
            }
        }
    }

    pub(crate) fn bind_type_id(&mut self, type_id: &'ctrl TypeIdAst<'ctrl>) -> FullySpecifiedType<'ctrl> {
        let base = self.bind_specifiers(type_id.specifiers);
        match type_id.declarator {
            Some(declarator) => self.bind_declarator(declarator, base).0.ty,
            None => base,
        }
    }

    /// Walks one declarator, returning the accumulated type (plus a
    /// function shape if it names a function directly) and the innermost
    /// declarator-id, if any.
    pub(crate) fn bind_declarator(&mut self, declarator: &'ctrl DeclaratorAst<'ctrl>, base: FullySpecifiedType<'ctrl>) -> (Layered<'ctrl>, Option<&'ctrl NameAst<'ctrl>>) {
        self.bind_declarator_layered(declarator, Layered::plain(base))
    }

    fn bind_declarator_layered(&mut self, declarator: &'ctrl DeclaratorAst<'ctrl>, base: Layered<'ctrl>) -> (Layered<'ctrl>, Option<&'ctrl NameAst<'ctrl>>) {
        let mut layered = base;
        for op in declarator.ptr_operators {
            layered = self.bind_ptr_operator_layer(op, layered);
        }
        for postfix in declarator.postfix {
            layered = self.bind_postfix_layer(postfix, layered);
        }
        match &declarator.core {
            CoreDeclaratorAst::Id(name) => (layered, Some(*name)),
            CoreDeclaratorAst::Abstract => (layered, None),
            CoreDeclaratorAst::Nested(inner) => self.bind_declarator_layered(inner, layered),
        }
    }

    fn bind_ptr_operator_layer(&mut self, op: &'ctrl PtrOperatorAst<'ctrl>, prev: Layered<'ctrl>) -> Layered<'ctrl> {
        let ty = match op {
            PtrOperatorAst::Pointer { cv_qualifiers, .. } => {
                let mut t = FullySpecifiedType::new(self.control.types().pointer(self.control.arena(), prev.ty.ty));
                self.apply_cv_run(&mut t, cv_qualifiers);
                t
            }
            PtrOperatorAst::Reference { is_rvalue, .. } => FullySpecifiedType::new(self.control.types().reference(self.control.arena(), prev.ty.ty, *is_rvalue)),
            PtrOperatorAst::PointerToMember { nested_name, cv_qualifiers, .. } => {
                let name = self.resolve_name(nested_name);
                let mut t = FullySpecifiedType::new(self.control.types().pointer_to_member(self.control.arena(), name, prev.ty.ty));
                self.apply_cv_run(&mut t, cv_qualifiers);
                t
            }
        };
        Layered::plain(ty)
    }

    fn bind_postfix_layer(&mut self, postfix: &'ctrl PostfixDeclaratorAst<'ctrl>, prev: Layered<'ctrl>) -> Layered<'ctrl> {
        match postfix {
            PostfixDeclaratorAst::Array { size, .. } => {
                if let Some(size_expr) = size {
                    self.bind_expression(size_expr);
                }
                let ty = FullySpecifiedType::new(self.control.types().array(self.control.arena(), prev.ty.ty, None));
                Layered::plain(ty)
            }
            PostfixDeclaratorAst::Function { parameters, is_variadic, trailing_return_type, .. } => {
                let return_type = match trailing_return_type {
                    Some(trailing) => self.bind_type_id(trailing),
                    None => prev.ty,
                };
                let bound_parameters = self.bind_parameters(parameters);
                Layered {
                    ty: FullySpecifiedType::new(self.control.types().undefined(self.control.arena())),
                    function: Some(FunctionShape { return_type, parameters: bound_parameters, is_variadic: *is_variadic }),
                }
            }
        }
    }

    pub(crate) fn bind_parameters(&mut self, parameters: &'ctrl [ParameterAst<'ctrl>]) -> Vec<&'ctrl Symbol<'ctrl>> {
        parameters
            .iter()
            .map(|parameter| {
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
                let symbol = Symbol::new(
                    token_index,
                    resolved_name,
                    self.scope,
                    crate::symbol::SymbolKind::Argument { ty: layered.ty },
                );
                self.control.arena().alloc(symbol) as &Symbol<'ctrl>
            })
            .collect()
    }

    /// Maps a Qt invokable-method token to the method-key it implies.
    /// `Q_INVOKABLE`/`Q_SIGNAL`/`Q_SLOT` aren't surfaced as a dedicated
    /// `DeclarationAst` field by this front-end's parser, so this is
    /// currently reached only through `signals:`/`slots:` access labels.
    pub(crate) fn method_key_for_access_label(&self, label_span: cpplang_common::Span) -> Option<(crate::symbol::Visibility, MethodKey)> {
        let mut visibility = None;
        let mut method_key = MethodKey::Normal;
        for index in label_span.start..label_span.end.saturating_sub(1) {
            match self.tu.token(index).kind {
                TokenKind::KwPublic => visibility = Some(crate::symbol::Visibility::Public),
                TokenKind::KwProtected => visibility = Some(crate::symbol::Visibility::Protected),
                TokenKind::KwPrivate => visibility = Some(crate::symbol::Visibility::Private),
                TokenKind::KwSignals => {
                    visibility.get_or_insert(crate::symbol::Visibility::Protected);
                    method_key = MethodKey::Signal;
                }
                TokenKind::KwSlots => method_key = MethodKey::Slot,
                _ => {}
            }
        }
        visibility.map(|v| (v, method_key))
    }
}

#[cfg(test)]
mod tests {
    use crate::symbol::SymbolKind;
    use cpplang_arena::Arena;
    use cpplang_common::FrontendOptions;
    use cpplang_control::{Control, IntegerKind, Qualifiers, Type};
    use cpplang_tu::TranslationUnit;

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
    fn pointer_declarator_wraps_the_base_type() {
        bind!(top_level, "int* p;");
        let SymbolKind::Declaration { ty, .. } = &top_level.members()[0].kind else { panic!("expected a declaration") };
        match ty.ty {
            Type::Pointer(inner) => assert!(matches!(inner, Type::Integer(IntegerKind::Int))),
            other => panic!("expected a pointer type, got {other:?}"),
        }
    }

    #[test]
    fn long_long_combines_to_the_widest_integer_kind() {
        bind!(top_level, "long long x;");
        let SymbolKind::Declaration { ty, .. } = &top_level.members()[0].kind else { panic!("expected a declaration") };
        assert!(matches!(ty.ty, Type::Integer(IntegerKind::LongLong)));
    }

    #[test]
    fn const_qualifier_is_recorded_on_the_declaration_type() {
        bind!(top_level, "const int c;");
        let SymbolKind::Declaration { ty, .. } = &top_level.members()[0].kind else { panic!("expected a declaration") };
        assert!(ty.has(Qualifiers::CONST));
        assert!(matches!(ty.ty, Type::Integer(IntegerKind::Int)));
    }

    #[test]
    fn array_declarator_wraps_the_element_type() {
        bind!(top_level, "int values[10];");
        let SymbolKind::Declaration { ty, .. } = &top_level.members()[0].kind else { panic!("expected a declaration") };
        match ty.ty {
            Type::Array { element, .. } => assert!(matches!(element, Type::Integer(IntegerKind::Int))),
            other => panic!("expected an array type, got {other:?}"),
        }
    }
}
