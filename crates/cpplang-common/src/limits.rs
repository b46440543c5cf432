//! Hard caps that keep pathological input (deeply nested expressions,
//! runaway macro recursion) from blowing the stack or looping forever.
//!
//! These are deliberately conservative, fixed constants rather than
//! configurable options: nothing in a real translation unit should come
//! close to them, and a tolerant front-end needs a bound to fall back to
//! once it decides input is adversarial or corrupt rather than merely
//! unusual.

/// Maximum nesting depth for `#if`/`#ifdef`/`#ifndef` conditional blocks
/// within one translation unit. Exceeding this raises a fatal diagnostic
/// and abandons the translation unit rather than the whole run.
pub const MAX_CONDITIONAL_NESTING: u32 = 512;

/// Maximum recursion depth for recursive-descent parsing productions
/// (expressions, declarators, nested class bodies). Chosen to survive
/// realistic deeply-nested template argument lists while still catching
/// a cyclic or adversarial grammar before it exhausts the stack.
pub const MAX_PARSE_RECURSION_DEPTH: u32 = 100;

/// Maximum recursion depth for the binder's scope walk (nested namespaces,
/// nested classes, nested blocks).
pub const MAX_BINDER_RECURSION_DEPTH: u32 = 100;

/// Maximum number of times a single macro invocation may be rescanned
/// during expansion before the preprocessor concludes it is (indirectly)
/// recursive and stops expanding it, per the "hidden" marking rule.
pub const MAX_MACRO_EXPANSION_ROUNDS: u32 = 1024;

/// Maximum include depth, guarding against self-including headers that
/// lack (or have broken) include guards.
pub const MAX_INCLUDE_DEPTH: u32 = 200;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_sane_relative_to_each_other() {
        assert!(MAX_PARSE_RECURSION_DEPTH < MAX_MACRO_EXPANSION_ROUNDS);
        assert!(MAX_CONDITIONAL_NESTING > MAX_PARSE_RECURSION_DEPTH);
    }
}
