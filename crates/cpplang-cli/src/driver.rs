//! Ties the pipeline together for one translation unit: preprocess, scan,
//! parse, bind, then report whatever came out the other end. Mirrors
//! `tsz-cli::driver`'s role as the one place that knows the full stage
//! order, just for a pipeline with four stages instead of tsz's many.

use crate::includes::FsIncludes;
use anyhow::{Context, Result};
use cpplang_arena::Arena;
use cpplang_binder::symbol::{Scope, Symbol, SymbolKind};
use cpplang_common::diagnostics::CollectingDiagnosticClient;
use cpplang_common::FrontendOptions;
use cpplang_control::{Control, Name, OperatorKind};
use std::path::{Path, PathBuf};

/// Preprocesses, scans, parses and binds `path`, printing diagnostics to
/// stderr (and, if `dump_symbols` is set, the bound top-level symbol tree
/// to stdout). Returns `true` if any diagnostic at `Error` or `Fatal`
/// severity was reported.
pub fn process_file(path: &Path, options: &FrontendOptions, dump_symbols: bool) -> Result<bool> {
    let source = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let file_name = path.to_string_lossy().into_owned();

    let arena = Arena::new();
    let control = Control::new(&arena);
    let diagnostics = CollectingDiagnosticClient::new();
    control.diagnostic_client_set(&*diagnostics);

    let mut includes = FsIncludes::new(
        options.quote_include_paths.iter().map(|s| PathBuf::from(s.as_str())).collect(),
        options.system_include_paths.iter().map(|s| PathBuf::from(s.as_str())).collect(),
    );
    let mut preprocessor = cpplang_preprocessor::Preprocessor::new(&control, options);
    let preprocessed = preprocessor.preprocess(&source, &file_name, &mut includes);

    let mut tu = cpplang_tu::TranslationUnit::new(file_name.clone(), preprocessed.buffer, &control, options.lexer_flags);
    let ast = cpplang_parser::parse_translation_unit(&mut tu, &control);
    let top_level = cpplang_binder::bind_translation_unit(&ast, &tu, &control);

    for diagnostic in diagnostics.take() {
        eprintln!("{diagnostic}");
    }

    if dump_symbols {
        println!("{file_name}:");
        dump_scope(&top_level, 1);
    }

    Ok(diagnostics.has_errors())
}

fn dump_scope(scope: &Scope, indent: usize) {
    let pad = "  ".repeat(indent);
    for symbol in scope.members() {
        println!("{pad}{}", describe_symbol(symbol));
        if let Some(nested) = symbol.scope() {
            dump_scope(nested, indent + 1);
        }
    }
}

fn describe_symbol(symbol: &Symbol) -> String {
    let name = symbol.name.map_or_else(|| "<anonymous>".to_string(), describe_name);
    format!("{} {name}", kind_label(&symbol.kind))
}

fn kind_label(kind: &SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Declaration { .. } => "declaration",
        SymbolKind::EnumeratorDeclaration { .. } => "enumerator",
        SymbolKind::Argument { .. } => "argument",
        SymbolKind::TypenameArgument { .. } => "template-typename",
        SymbolKind::Function(_) => "function",
        SymbolKind::Namespace { .. } => "namespace",
        SymbolKind::NamespaceAlias { .. } => "namespace-alias",
        SymbolKind::Template { .. } => "template",
        SymbolKind::BaseClass { .. } => "base-class",
        SymbolKind::Class(_) => "class",
        SymbolKind::Enum(_) => "enum",
        SymbolKind::Block { .. } => "block",
        SymbolKind::UsingNamespaceDirective => "using-namespace",
        SymbolKind::UsingDeclaration => "using-declaration",
        SymbolKind::ForwardClassDeclaration => "forward-class-declaration",
        SymbolKind::QtPropertyDeclaration { .. } => "qt-property",
        SymbolKind::QtEnum { .. } => "qt-enum",
        SymbolKind::ObjCClass(_) => "objc-class",
        SymbolKind::ObjCProtocol { .. } => "objc-protocol",
        SymbolKind::ObjCMethod { .. } => "objc-method",
        SymbolKind::ObjCPropertyDeclaration { .. } => "objc-property",
        SymbolKind::ObjCBaseClass => "objc-base-class",
        SymbolKind::ObjCBaseProtocol => "objc-base-protocol",
        SymbolKind::ForwardObjCClassDeclaration => "forward-objc-class-declaration",
        SymbolKind::ForwardObjCProtocolDeclaration => "forward-objc-protocol-declaration",
    }
}

fn describe_name(name: &Name) -> String {
    match name {
        Name::Identifier(id) => id.as_str().to_string(),
        Name::TemplateNameId { id, .. } => format!("{}<...>", describe_name(id)),
        Name::DestructorNameId(inner) => format!("~{}", describe_name(inner)),
        Name::OperatorNameId(op) => format!("operator{}", describe_operator(*op)),
        Name::ConversionNameId(_) => "operator <conversion>".to_string(),
        Name::QualifiedNameId { base, name } => format!("{}::{}", describe_name(base), describe_name(name)),
        Name::SelectorNameId { names, .. } => names.iter().map(|id| id.as_str()).collect::<Vec<_>>().join(":"),
        Name::AnonymousNameId(id) => format!("<anonymous#{id}>"),
    }
}

fn describe_operator(op: OperatorKind) -> String {
    format!("{op:?}")
}
