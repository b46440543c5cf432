//! Crate-level boundary scenarios for the binder: a plain class with a
//! field and a declaration of that class, a class template with a
//! pointer-to-parameter field, and an enum whose enumerators mix implicit
//! and explicit constant values.

use cpplang_arena::Arena;
use cpplang_binder::symbol::SymbolKind;
use cpplang_common::LexerFeatureFlags;
use cpplang_control::{Control, Type};
use cpplang_tu::TranslationUnit;

fn as_named<'ctrl>(ty: &'ctrl Type<'ctrl>) -> Option<&'ctrl cpplang_control::Name<'ctrl>> {
    match ty {
        Type::Named(name) => Some(*name),
        _ => None,
    }
}

fn as_pointee<'ctrl>(ty: &'ctrl Type<'ctrl>) -> Option<&'ctrl Type<'ctrl>> {
    match ty {
        Type::Pointer(referee) => Some(*referee),
        _ => None,
    }
}

#[test]
fn struct_member_and_declaration_share_interned_class_name() {
    let arena = Arena::new();
    let control = Control::new(&arena);
    let mut tu = TranslationUnit::new("a.cpp", "struct S { int x; }; S s;", &control, LexerFeatureFlags::default());
    let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
    let top_level = cpplang_binder::bind_translation_unit(&ast, &tu, &control);

    let members = top_level.members();
    let class_symbol = members.iter().find(|s| s.is_class()).expect("class S bound");
    let class_name = class_symbol.name.expect("class S is named");

    let class_scope = class_symbol.scope().expect("class owns a scope");
    assert!(class_scope.members().iter().any(|m| matches!(m.kind, SymbolKind::Declaration { .. })), "member x bound");

    let declaration_s = members.iter().find(|s| matches!(s.kind, SymbolKind::Declaration { .. })).expect("declaration s bound");
    let SymbolKind::Declaration { ty, .. } = &declaration_s.kind else { unreachable!() };
    let named = as_named(ty.ty).expect("s has a named type");
    assert_eq!(named, class_name, "s's type should reference the same interned class name as S's declaration");
}

#[test]
fn template_parameter_name_matches_pointee_of_member_field() {
    let arena = Arena::new();
    let control = Control::new(&arena);
    let mut tu = TranslationUnit::new("a.cpp", "template<class T> class V { T* p; };", &control, LexerFeatureFlags::default());
    let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
    let top_level = cpplang_binder::bind_translation_unit(&ast, &tu, &control);

    let template_symbol = top_level.members().into_iter().find(|s| matches!(s.kind, SymbolKind::Template { .. })).expect("template V bound");
    let SymbolKind::Template { scope: template_scope, declaration } = &template_symbol.kind else { unreachable!() };

    let typename_t = template_scope.members().into_iter().find(|s| matches!(s.kind, SymbolKind::TypenameArgument { .. })).expect("typename T bound");
    let t_name = typename_t.name.expect("T is named");

    let class_v = declaration.borrow().expect("template wraps the bound class V");
    assert!(class_v.is_class());

    let class_scope = class_v.scope().expect("class owns a scope");
    let field_p = class_scope.members().into_iter().find(|m| matches!(m.kind, SymbolKind::Declaration { .. })).expect("member p bound");
    let SymbolKind::Declaration { ty, .. } = &field_p.kind else { unreachable!() };
    let pointee = as_pointee(ty.ty).expect("p has pointer type");
    let pointee_name = as_named(pointee).expect("p points to a named type");

    assert_eq!(pointee_name, t_name, "p's pointee should reference the template's own T");
}

#[test]
fn enum_constants_default_and_explicit_values() {
    let arena = Arena::new();
    let control = Control::new(&arena);
    let mut tu = TranslationUnit::new("a.cpp", "enum E { A, B = 5, C };", &control, LexerFeatureFlags::default());
    let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
    let top_level = cpplang_binder::bind_translation_unit(&ast, &tu, &control);

    let enum_symbol = top_level.members().into_iter().find(|s| matches!(s.kind, SymbolKind::Enum(_))).expect("enum E bound");
    let enum_scope = enum_symbol.scope().expect("enum owns a scope");
    let values: Vec<String> = enum_scope
        .members()
        .into_iter()
        .map(|m| match &m.kind {
            SymbolKind::EnumeratorDeclaration { constant_value } => constant_value.clone(),
            other => panic!("unexpected enum member kind: {other:?}"),
        })
        .collect();

    assert_eq!(values, vec!["0".to_string(), "5".to_string(), "6".to_string()]);
}
