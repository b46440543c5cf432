//! Macro substitution: object-like and function-like invocation, argument
//! prescan, `#` stringification, `##` token pasting, and the
//! rescan-and-hide recursion guard.

use crate::macro_env::MacroEnvironment;
use crate::pp_token::{scan, PpTokenKind};
use cpplang_common::limits::MAX_MACRO_EXPANSION_ROUNDS;

/// Expands every macro invocation found in `text`, recursively rescanning
/// substituted output until a fixed point (or the round budget runs out,
/// at which point the remaining text is returned un-expanded rather than
/// looping forever on a pathological definition).
pub fn expand(env: &mut MacroEnvironment, text: &str) -> Result<String, String> {
    let mut rounds = 0u32;
    expand_bounded(env, text, &mut rounds)
}

fn expand_bounded(env: &mut MacroEnvironment, text: &str, rounds: &mut u32) -> Result<String, String> {
    let tokens = scan(text);
    let mut out = String::new();
    let mut i = 0usize;

    while i < tokens.len() {
        let token = tokens[i];
        if token.kind == PpTokenKind::Eof {
            break;
        }
        if token.kind != PpTokenKind::Identifier {
            push_piece(&mut out, token.text(text), token.whitespace_before);
            i += 1;
            continue;
        }

        let name = token.text(text);
        let Some(definition) = env.lookup(name).cloned() else {
            push_piece(&mut out, name, token.whitespace_before);
            i += 1;
            continue;
        };
        if env.is_hidden(name) {
            push_piece(&mut out, name, token.whitespace_before);
            i += 1;
            continue;
        }

        if !definition.function_like {
            *rounds += 1;
            if *rounds > MAX_MACRO_EXPANSION_ROUNDS {
                push_piece(&mut out, name, token.whitespace_before);
                i += 1;
                continue;
            }
            env.hide(name);
            let expanded = expand_bounded(env, &definition.definition, rounds)?;
            env.unhide(name);
            push_piece(&mut out, &expanded, token.whitespace_before);
            i += 1;
            continue;
        }

        // Function-like: only a genuine invocation if '(' follows.
        if tokens.get(i + 1).map(|t| t.kind) != Some(PpTokenKind::LParen) {
            push_piece(&mut out, name, token.whitespace_before);
            i += 1;
            continue;
        }

        let open_paren = tokens[i + 1];
        let (inner_start, close_idx) = find_matching_paren(&tokens, i + 1)?;
        let inner_end = tokens[close_idx].start as usize;
        let raw_args_text = &text[inner_start..inner_end];
        let raw_args = split_top_level(raw_args_text);

        let actual_count = definition.formals.len();
        if !definition.variadic && raw_args.len() != actual_count && !(actual_count == 0 && raw_args.len() == 1 && raw_args[0].trim().is_empty()) {
            return Err(format!("macro '{name}' expects {actual_count} argument(s), got {}", raw_args.len()));
        }
        if definition.variadic && raw_args.len() < actual_count {
            return Err(format!("macro '{name}' expects at least {actual_count} argument(s), got {}", raw_args.len()));
        }

        let mut raw_by_formal: std::collections::HashMap<&str, String> = std::collections::HashMap::new();
        let mut expanded_by_formal: std::collections::HashMap<&str, String> = std::collections::HashMap::new();
        for (formal, actual) in definition.formals.iter().zip(raw_args.iter()) {
            raw_by_formal.insert(formal.as_str(), actual.trim().to_string());
            *rounds += 1;
            if *rounds > MAX_MACRO_EXPANSION_ROUNDS {
                return Err(format!("macro '{name}' exceeded expansion round budget"));
            }
            expanded_by_formal.insert(formal.as_str(), expand_bounded(env, actual.trim(), rounds)?);
        }
        if definition.variadic {
            let variadic_raw = raw_args[actual_count..].join(", ");
            *rounds += 1;
            let variadic_expanded = expand_bounded(env, &variadic_raw, rounds)?;
            raw_by_formal.insert("__VA_ARGS__", variadic_raw);
            expanded_by_formal.insert("__VA_ARGS__", variadic_expanded);
        }

        let substituted = substitute_body(&definition.definition, &raw_by_formal, &expanded_by_formal);

        env.hide(name);
        let rescanned = expand_bounded(env, &substituted, rounds)?;
        env.unhide(name);

        push_piece(&mut out, &rescanned, token.whitespace_before);
        let _ = open_paren;
        i = close_idx + 1;
    }

    Ok(out)
}

fn push_piece(out: &mut String, piece: &str, whitespace_before: bool) {
    if whitespace_before && !out.is_empty() && !out.ends_with(' ') {
        out.push(' ');
    }
    out.push_str(piece);
}

/// Given the index of a `(` token, returns `(byte offset just past '(',
/// index of the matching ')')`.
fn find_matching_paren(tokens: &[crate::pp_token::PpToken], open_idx: usize) -> Result<(usize, usize), String> {
    let mut depth = 0i32;
    let inner_start = tokens[open_idx].end as usize;
    for (idx, token) in tokens.iter().enumerate().skip(open_idx) {
        match token.kind {
            PpTokenKind::LParen => depth += 1,
            PpTokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Ok((inner_start, idx));
                }
            }
            PpTokenKind::Eof => break,
            _ => {}
        }
    }
    Err("unterminated macro argument list".to_string())
}

/// Splits `text` on top-level (paren-depth 0) commas.
fn split_top_level(text: &str) -> Vec<String> {
    let tokens = scan(text);
    let mut args = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for token in &tokens {
        match token.kind {
            PpTokenKind::LParen => depth += 1,
            PpTokenKind::RParen => depth -= 1,
            PpTokenKind::Comma if depth == 0 => {
                args.push(text[start..token.start as usize].to_string());
                start = token.end as usize;
            }
            PpTokenKind::Eof => {
                args.push(text[start..token.start as usize].to_string());
                return args;
            }
            _ => {}
        }
    }
    args
}

/// Substitutes formal-parameter references in a macro's replacement list,
/// honoring `#formal` stringification and `a ## b` pasting.
fn substitute_body(definition: &str, raw: &std::collections::HashMap<&str, String>, expanded: &std::collections::HashMap<&str, String>) -> String {
    let tokens = scan(definition);
    let mut out = String::new();
    let mut i = 0usize;
    let mut just_pasted = false;

    while i < tokens.len() {
        let token = tokens[i];
        if token.kind == PpTokenKind::Eof {
            break;
        }

        if token.kind == PpTokenKind::Hash {
            if let Some(next) = tokens.get(i + 1) {
                if next.kind == PpTokenKind::Identifier {
                    let name = next.text(definition);
                    if let Some(actual) = raw.get(name) {
                        push_piece(&mut out, &stringify(actual), token.whitespace_before);
                        i += 2;
                        just_pasted = false;
                        continue;
                    }
                }
            }
            push_piece(&mut out, "#", token.whitespace_before);
            i += 1;
            continue;
        }

        if token.kind == PpTokenKind::HashHash {
            just_pasted = true;
            i += 1;
            continue;
        }

        let piece_owned;
        let piece: &str = if token.kind == PpTokenKind::Identifier {
            let name = token.text(definition);
            let pasting = just_pasted || tokens.get(i + 1).map(|t| t.kind) == Some(PpTokenKind::HashHash);
            if pasting {
                if let Some(value) = raw.get(name) {
                    piece_owned = value.clone();
                    &piece_owned
                } else {
                    name
                }
            } else if let Some(value) = expanded.get(name) {
                piece_owned = value.clone();
                &piece_owned
            } else {
                name
            }
        } else {
            token.text(definition)
        };

        if just_pasted && !out.is_empty() {
            // Pasting: concatenate with no separating space.
            out.push_str(piece);
        } else {
            push_piece(&mut out, piece, token.whitespace_before);
        }
        just_pasted = false;
        i += 1;
    }

    out
}

/// `#formal` stringification: condense internal whitespace to single
/// spaces, trim the ends, and escape embedded `"`/`\`.
fn stringify(raw_argument_text: &str) -> String {
    let collapsed = raw_argument_text.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut escaped = String::with_capacity(collapsed.len() + 2);
    escaped.push('"');
    for c in collapsed.chars() {
        if c == '"' || c == '\\' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('"');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::macro_env::PpMacro;

    #[test]
    fn object_like_macro_substitutes_its_definition() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro::object_like("FOO", "1 + 1", "a.h"));
        assert_eq!(expand(&mut env, "x = FOO;").unwrap(), "x = 1 + 1;");
    }

    #[test]
    fn function_like_macro_substitutes_arguments() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro {
            name: "ADD".to_string(),
            formals: vec!["a".to_string(), "b".to_string()],
            definition: "((a) + (b))".to_string(),
            function_like: true,
            variadic: false,
            origin_file: "a.h".to_string(),
        });
        assert_eq!(expand(&mut env, "ADD(1, 2)").unwrap(), "((1) + (2))");
    }

    #[test]
    fn stringify_operator_quotes_the_unexpanded_actual() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro {
            name: "STR".to_string(),
            formals: vec!["x".to_string()],
            definition: "#x".to_string(),
            function_like: true,
            variadic: false,
            origin_file: "a.h".to_string(),
        });
        assert_eq!(expand(&mut env, "STR(hello)").unwrap(), "\"hello\"");
    }

    #[test]
    fn paste_operator_concatenates_adjacent_tokens() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro {
            name: "CAT".to_string(),
            formals: vec!["a".to_string(), "b".to_string()],
            definition: "a ## b".to_string(),
            function_like: true,
            variadic: false,
            origin_file: "a.h".to_string(),
        });
        assert_eq!(expand(&mut env, "CAT(foo, bar)").unwrap(), "foobar");
    }

    #[test]
    fn recursive_macro_reference_is_left_as_a_plain_identifier() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro::object_like("FOO", "1 + FOO", "a.h"));
        assert_eq!(expand(&mut env, "FOO").unwrap(), "1 + FOO");
    }

    #[test]
    fn variadic_macro_joins_trailing_actuals_into_va_args() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro {
            name: "LOG".to_string(),
            formals: vec!["fmt".to_string()],
            definition: "printf(fmt, __VA_ARGS__)".to_string(),
            function_like: true,
            variadic: true,
            origin_file: "a.h".to_string(),
        });
        assert_eq!(expand(&mut env, "LOG(\"x\", 1, 2)").unwrap(), "printf(\"x\", 1, 2)");
    }
}
