//! The preprocessing engine: directive dispatch, conditional-compilation
//! skipping, include recursion, header-guard short-circuiting, and
//! emission of the `# line`/`# expansion` markers `cpplang-lexer` resolves
//! original positions from.

use crate::cond::ConditionalStack;
use crate::include::{IncludeKind, SourceProvider};
use crate::macro_env::{MacroEnvironment, PpMacro};
use crate::macro_expand;
use crate::pp_token::{scan, PpToken, PpTokenKind};
use cpplang_common::limits::MAX_INCLUDE_DEPTH;
use cpplang_common::options::FrontendOptions;
use cpplang_common::{DiagnosticCategory, Position};
use cpplang_control::Control;
use rustc_hash::FxHashMap;

/// The fully preprocessed output a translation unit is lexed from.
pub struct PreprocessedOutput {
    pub buffer: String,
}

pub struct Preprocessor<'a, 'ctrl> {
    control: &'a Control<'ctrl>,
    macros: MacroEnvironment,
    /// File name -> detected header-guard macro name, once seen.
    guards: FxHashMap<String, String>,
}

impl<'a, 'ctrl> Preprocessor<'a, 'ctrl> {
    #[must_use]
    pub fn new(control: &'a Control<'ctrl>, options: &FrontendOptions) -> Self {
        let mut macros = MacroEnvironment::new();
        for (name, value) in &options.predefined_macros {
            macros.define(PpMacro::object_like(name.clone(), value.clone().unwrap_or_else(|| "1".to_string()), "<command-line>"));
        }
        for name in &options.undefined_macros {
            macros.undefine(name);
        }
        Preprocessor { control, macros, guards: FxHashMap::default() }
    }

    #[must_use]
    pub fn macros(&self) -> &MacroEnvironment {
        &self.macros
    }

    /// Preprocesses one top-level translation unit's source text.
    pub fn preprocess(&mut self, source: &str, file_name: &str, includes: &mut dyn SourceProvider) -> PreprocessedOutput {
        let mut buffer = String::new();
        let mut conditionals = ConditionalStack::new();
        self.process_file(source, file_name, includes, &mut buffer, &mut conditionals, 0);
        tracing::debug!(
            target: "cpplang::preprocessor",
            file = file_name,
            input_bytes = source.len(),
            output_bytes = buffer.len(),
            "translation unit preprocessed"
        );
        PreprocessedOutput { buffer }
    }

    fn report(&self, file_name: &str, line: u32, message: impl Into<String>) {
        self.control.report(DiagnosticCategory::Error, file_name.to_string(), Position::new(line, 1), message);
    }

    fn process_file(
        &mut self,
        source: &str,
        file_name: &str,
        includes: &mut dyn SourceProvider,
        out: &mut String,
        conditionals: &mut ConditionalStack,
        include_depth: u32,
    ) {
        if let Some(guard) = self.guards.get(file_name) {
            if self.macros.is_defined(guard) {
                return;
            }
        }

        let tokens = scan(source);
        let mut i = 0usize;
        let mut copy_from = 0usize;
        let mut directive_count = 0u32;
        let mut guard_candidate: Option<String> = None;
        let mut detected_guard: Option<String> = None;

        while i < tokens.len() {
            let token = tokens[i];
            if token.kind == PpTokenKind::Eof {
                break;
            }
            if token.kind != PpTokenKind::Hash || !token.is_line_start {
                i += 1;
                continue;
            }

            self.flush_ordinary(source, copy_from, token.start as usize, conditionals, out, file_name);

            let mut j = i + 1;
            while j < tokens.len() && !tokens[j].is_line_start && tokens[j].kind != PpTokenKind::Eof {
                j += 1;
            }
            let directive_tokens = tokens[i + 1..j].to_vec();
            let line = token.line;

            self.handle_directive(
                source,
                &directive_tokens,
                file_name,
                line,
                includes,
                out,
                conditionals,
                include_depth,
                directive_count,
                &mut guard_candidate,
                &mut detected_guard,
            );

            copy_from = tokens[j].start as usize;
            i = j;
            directive_count += 1;
        }

        self.flush_ordinary(source, copy_from, source.len(), conditionals, out, file_name);

        if let Some(guard) = detected_guard {
            self.guards.insert(file_name.to_string(), guard);
        }
    }

    /// Copies or macro-expands a run of ordinary (non-directive) text.
    /// Skipped (conditionally-excluded) text contributes only its
    /// newlines, so line numbers in the output stay aligned with the
    /// original file for everything that isn't actually expanded.
    fn flush_ordinary(&mut self, source: &str, start: usize, end: usize, conditionals: &ConditionalStack, out: &mut String, file_name: &str) {
        if start >= end {
            return;
        }
        let slice = &source[start..end];
        if conditionals.is_skipping() {
            let newlines = slice.bytes().filter(|&b| b == b'\n').count();
            out.push_str(&"\n".repeat(newlines));
            return;
        }
        match macro_expand::expand(&mut self.macros, slice) {
            Ok(expanded) => {
                if expanded == slice {
                    out.push_str(slice);
                    return;
                }
                let token_count = scan(&expanded).len().saturating_sub(1);
                out.push_str(&format!("# expansion 0,{}\n~{}\n", slice.len(), token_count));
                out.push_str(&expanded);
                if !expanded.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str("# expansion end\n");
            }
            Err(message) => {
                self.report(file_name, 1, message);
                out.push_str(slice);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn handle_directive(
        &mut self,
        source: &str,
        directive_tokens: &[PpToken],
        file_name: &str,
        line: u32,
        includes: &mut dyn SourceProvider,
        out: &mut String,
        conditionals: &mut ConditionalStack,
        include_depth: u32,
        directive_index: u32,
        guard_candidate: &mut Option<String>,
        detected_guard: &mut Option<String>,
    ) {
        let keyword = directive_tokens.first().map(|t| t.text(source)).unwrap_or("");

        // Directives besides the conditional family are no-ops while an
        // enclosing branch is being skipped.
        let is_conditional_directive = matches!(keyword, "if" | "ifdef" | "ifndef" | "elif" | "else" | "endif");
        if conditionals.is_skipping() && !is_conditional_directive {
            return;
        }

        match keyword {
            "define" => self.directive_define(source, directive_tokens, file_name),
            "undef" => {
                if let Some(name_tok) = directive_tokens.get(1) {
                    self.macros.undefine(name_tok.text(source));
                }
            }
            "include" => self.directive_include(source, directive_tokens, file_name, includes, out, include_depth),
            "if" => {
                let text = directive_rest_text(source, directive_tokens, 1);
                let value = self.evaluate_condition(&text, file_name, line);
                conditionals.push_if(value != 0);
            }
            "ifdef" => {
                let defined = directive_tokens.get(1).is_some_and(|t| self.macros.is_defined(t.text(source)));
                conditionals.push_if(defined);
            }
            "ifndef" => {
                let defined = directive_tokens.get(1).is_some_and(|t| self.macros.is_defined(t.text(source)));
                if directive_index == 0 {
                    if let Some(name_tok) = directive_tokens.get(1) {
                        *guard_candidate = Some(name_tok.text(source).to_string());
                    }
                }
                conditionals.push_if(!defined);
            }
            "elif" => {
                let text = directive_rest_text(source, directive_tokens, 1);
                let value = self.evaluate_condition(&text, file_name, line);
                if conditionals.elif(value != 0).is_err() {
                    self.report(file_name, line, "'#elif' without a matching '#if'");
                }
            }
            "else" => {
                if conditionals.else_branch().is_err() {
                    self.report(file_name, line, "'#else' without a matching '#if'");
                }
            }
            "endif" => {
                if conditionals.endif().is_err() {
                    self.report(file_name, line, "'#endif' without a matching '#if'");
                }
            }
            "line" => {
                // `#line` is re-emitted verbatim; `cpplang-lexer` resolves
                // it the same way it resolves our own generated markers.
                out.push_str("# line ");
                out.push_str(&directive_rest_text(source, directive_tokens, 1));
                out.push('\n');
            }
            "error" => {
                let message = directive_rest_text(source, directive_tokens, 1);
                self.report(file_name, line, format!("#error {message}"));
            }
            "pragma" | "" => {}
            _ => {
                // Unknown directive: tolerant mode skips to end-of-line.
            }
        }

        // A second directive confirming the header-guard pattern
        // (`#ifndef NAME` at index 0 immediately followed by `#define
        // NAME` at index 1) marks this file's guard.
        if directive_index == 1 && detected_guard.is_none() {
            if let (Some(candidate), "define") = (guard_candidate.as_deref(), keyword) {
                if directive_tokens.get(1).map(|t| t.text(source)) == Some(candidate) {
                    *detected_guard = Some(candidate.to_string());
                }
            }
        }
    }

    fn directive_define(&mut self, source: &str, directive_tokens: &[PpToken], file_name: &str) {
        let Some(name_tok) = directive_tokens.get(1) else {
            self.report(file_name, directive_tokens.first().map_or(1, |t| t.line), "'#define' with no macro name");
            return;
        };
        let name = name_tok.text(source).to_string();

        // Function-like iff `(` immediately follows the name with no
        // intervening whitespace.
        let is_function_like = directive_tokens.get(2).is_some_and(|t| t.kind == PpTokenKind::LParen && !t.whitespace_before);

        if !is_function_like {
            let body_start = directive_tokens.get(2).map_or(name_tok.end, |t| t.start);
            let body_end = directive_tokens.last().map_or(body_start, |t| t.end);
            let definition = source[body_start as usize..body_end as usize].trim().to_string();
            self.macros.define(PpMacro::object_like(name, definition, file_name));
            return;
        }

        let mut idx = 3usize; // past name, '('
        let mut formals = Vec::new();
        let mut variadic = false;
        if directive_tokens.get(idx).map(|t| t.kind) != Some(PpTokenKind::RParen) {
            loop {
                match directive_tokens.get(idx) {
                    Some(t) if t.kind == PpTokenKind::Ellipsis => {
                        variadic = true;
                        idx += 1;
                    }
                    Some(t) if t.kind == PpTokenKind::Identifier => {
                        formals.push(t.text(source).to_string());
                        idx += 1;
                    }
                    _ => break,
                }
                match directive_tokens.get(idx) {
                    Some(t) if t.kind == PpTokenKind::Comma => {
                        idx += 1;
                    }
                    _ => break,
                }
            }
        }
        // Skip to the matching ')'.
        while directive_tokens.get(idx).map(|t| t.kind) != Some(PpTokenKind::RParen) && idx < directive_tokens.len() {
            idx += 1;
        }
        idx += 1; // past ')'

        let body_start = directive_tokens.get(idx).map_or(name_tok.end, |t| t.start);
        let body_end = directive_tokens.last().map_or(body_start, |t| t.end);
        let definition = source[body_start as usize..body_end as usize].trim().to_string();

        self.macros.define(PpMacro {
            name,
            formals,
            definition,
            function_like: true,
            variadic,
            origin_file: file_name.to_string(),
        });
    }

    fn directive_include(
        &mut self,
        source: &str,
        directive_tokens: &[PpToken],
        file_name: &str,
        includes: &mut dyn SourceProvider,
        out: &mut String,
        include_depth: u32,
    ) {
        let line = directive_tokens.first().map_or(1, |t| t.line);
        if include_depth >= MAX_INCLUDE_DEPTH {
            self.report(file_name, line, "#include nesting too deep");
            return;
        }

        let rest = directive_rest_text(source, directive_tokens, 1);
        let Some((mut included_name, kind)) = parse_include_target(rest.trim()) else {
            self.report(file_name, line, "malformed '#include' directive");
            return;
        };

        let Some(included_source) = includes.source_needed(&mut included_name, kind) else {
            self.report(file_name, line, format!("'{included_name}' file not found"));
            return;
        };

        tracing::trace!(target: "cpplang::preprocessor", file = %included_name, depth = include_depth + 1, "entering include");
        out.push_str(&format!("# line 1 \"{included_name}\"\n"));
        let mut nested_conditionals = ConditionalStack::new();
        self.process_file(&included_source, &included_name, includes, out, &mut nested_conditionals, include_depth + 1);
        out.push_str(&format!("# line {} \"{file_name}\"\n", line + 1));
    }

    /// Resolves `defined NAME`/`defined(NAME)` to a literal `1`/`0` before
    /// macro-expanding the remainder and handing the result to the
    /// arithmetic evaluator: the `defined` operand must not itself be
    /// macro-expanded, so this has to run as a distinct pass ahead of
    /// ordinary expansion.
    fn evaluate_condition(&mut self, text: &str, file_name: &str, line: u32) -> i64 {
        let resolved = self.resolve_defined_operator(text);
        match macro_expand::expand(&mut self.macros, &resolved) {
            Ok(expanded) => match crate::expr::evaluate(&expanded) {
                Ok(value) => value,
                Err(message) => {
                    self.report(file_name, line, message);
                    0
                }
            },
            Err(message) => {
                self.report(file_name, line, message);
                0
            }
        }
    }

    fn resolve_defined_operator(&self, text: &str) -> String {
        let tokens = scan(text);
        let mut out = String::new();
        let mut i = 0usize;
        while i < tokens.len() {
            let token = tokens[i];
            if token.kind == PpTokenKind::Eof {
                break;
            }
            if token.kind == PpTokenKind::Identifier && token.text(text) == "defined" {
                let (name, next_index) = if tokens.get(i + 1).map(|t| t.kind) == Some(PpTokenKind::LParen) {
                    let name = tokens.get(i + 2).map(|t| t.text(text)).unwrap_or("");
                    (name, i + 4) // defined ( NAME )
                } else {
                    let name = tokens.get(i + 1).map(|t| t.text(text)).unwrap_or("");
                    (name, i + 2) // defined NAME
                };
                if token.whitespace_before && !out.is_empty() && !out.ends_with(' ') {
                    out.push(' ');
                }
                out.push_str(if self.macros.is_defined(name) { "1" } else { "0" });
                i = next_index;
                continue;
            }
            if token.whitespace_before && !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
            out.push_str(token.text(text));
            i += 1;
        }
        out
    }
}

/// Joins the raw source text spanned by `directive_tokens[from..]`, i.e.
/// everything on a directive line after its keyword.
fn directive_rest_text(source: &str, directive_tokens: &[PpToken], from: usize) -> String {
    let Some(first) = directive_tokens.get(from) else {
        return String::new();
    };
    let last = directive_tokens.last().unwrap_or(first);
    source[first.start as usize..last.end as usize].to_string()
}

fn parse_include_target(text: &str) -> Option<(String, IncludeKind)> {
    if let Some(rest) = text.strip_prefix('"') {
        let end = rest.find('"')?;
        Some((rest[..end].to_string(), IncludeKind::Local))
    } else if let Some(rest) = text.strip_prefix('<') {
        let end = rest.find('>')?;
        Some((rest[..end].to_string(), IncludeKind::Global))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_arena::Arena;

    struct NoIncludes;
    impl SourceProvider for NoIncludes {
        fn source_needed(&mut self, _file_name: &mut String, _kind: IncludeKind) -> Option<String> {
            None
        }
    }

    struct MapIncludes(FxHashMap<String, String>);
    impl SourceProvider for MapIncludes {
        fn source_needed(&mut self, file_name: &mut String, _kind: IncludeKind) -> Option<String> {
            self.0.get(file_name).cloned()
        }
    }

    #[test]
    fn object_like_macro_is_expanded_in_ordinary_text() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let mut pp = Preprocessor::new(&control, &FrontendOptions::default());
        let out = pp.preprocess("#define N 3\nint x = N;\n", "a.cpp", &mut NoIncludes);
        assert!(out.buffer.contains("int x = 3"));
    }

    #[test]
    fn skipped_if_0_branch_contributes_no_tokens() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let mut pp = Preprocessor::new(&control, &FrontendOptions::default());
        let out = pp.preprocess("#if 0\nint dead = 1;\n#endif\nint alive = 2;\n", "a.cpp", &mut NoIncludes);
        assert!(!out.buffer.contains("dead"));
        assert!(out.buffer.contains("alive"));
    }

    #[test]
    fn header_guard_short_circuits_second_inclusion() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let mut pp = Preprocessor::new(&control, &FrontendOptions::default());
        let mut includes = MapIncludes(FxHashMap::default());
        includes.0.insert(
            "guard.h".to_string(),
            "#ifndef GUARD_H\n#define GUARD_H\nint once;\n#endif\n".to_string(),
        );
        let source = "#include \"guard.h\"\n#include \"guard.h\"\n";
        let out = pp.preprocess(source, "a.cpp", &mut includes);
        assert_eq!(out.buffer.matches("once").count(), 1);
    }

    #[test]
    fn defined_operator_is_resolved_before_expansion() {
        let arena = Arena::new();
        let control = Control::new(&arena);
        let mut pp = Preprocessor::new(&control, &FrontendOptions::default());
        let out = pp.preprocess("#define FEATURE 1\n#if defined(FEATURE)\nint on = 1;\n#else\nint on = 0;\n#endif\n", "a.cpp", &mut NoIncludes);
        assert!(out.buffer.contains("on = 1"));
        assert!(!out.buffer.contains("on = 0"));
    }
}
