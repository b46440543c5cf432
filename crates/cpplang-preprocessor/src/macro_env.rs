//! The macro environment: named macro definitions plus the "currently
//! hidden" set used to stop a macro expanding into its own invocation
//! during rescan.

use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone)]
pub struct PpMacro {
    pub name: String,
    pub formals: Vec<String>,
    /// Raw replacement-list text, exactly as written (not yet expanded).
    pub definition: String,
    pub function_like: bool,
    pub variadic: bool,
    pub origin_file: String,
}

impl PpMacro {
    #[must_use]
    pub fn object_like(name: impl Into<String>, definition: impl Into<String>, origin_file: impl Into<String>) -> Self {
        PpMacro {
            name: name.into(),
            formals: Vec::new(),
            definition: definition.into(),
            function_like: false,
            variadic: false,
            origin_file: origin_file.into(),
        }
    }
}

/// Defined macros, plus the rescan "hidden" set. A macro marked hidden
/// while its own replacement is being rescanned is not expanded again;
/// `##`/`#` within that rescan still see it as defined for `defined()`
/// purposes, only its *expansion* is suppressed.
#[derive(Debug, Default)]
pub struct MacroEnvironment {
    macros: FxHashMap<String, PpMacro>,
    hidden: FxHashSet<String>,
}

impl MacroEnvironment {
    #[must_use]
    pub fn new() -> Self {
        MacroEnvironment {
            macros: FxHashMap::default(),
            hidden: FxHashSet::default(),
        }
    }

    pub fn define(&mut self, macro_def: PpMacro) {
        self.macros.insert(macro_def.name.clone(), macro_def);
    }

    /// Returns whether a macro by this name was previously defined.
    pub fn undefine(&mut self, name: &str) -> bool {
        self.macros.remove(name).is_some()
    }

    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&PpMacro> {
        self.macros.get(name)
    }

    #[must_use]
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    /// Marks `name` hidden for the duration of its own rescan. Returns
    /// `false` if it was already hidden (the caller should treat the
    /// reference as a plain identifier rather than re-entering expansion).
    pub fn hide(&mut self, name: &str) -> bool {
        self.hidden.insert(name.to_string())
    }

    pub fn unhide(&mut self, name: &str) {
        self.hidden.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_then_lookup_round_trips() {
        let mut env = MacroEnvironment::new();
        env.define(PpMacro::object_like("FOO", "1", "a.h"));
        assert!(env.is_defined("FOO"));
        assert_eq!(env.lookup("FOO").unwrap().definition, "1");
    }

    #[test]
    fn undefine_reports_whether_it_existed() {
        let mut env = MacroEnvironment::new();
        assert!(!env.undefine("FOO"));
        env.define(PpMacro::object_like("FOO", "1", "a.h"));
        assert!(env.undefine("FOO"));
        assert!(!env.is_defined("FOO"));
    }

    #[test]
    fn hide_reports_whether_it_was_already_hidden() {
        let mut env = MacroEnvironment::new();
        assert!(env.hide("FOO"));
        assert!(!env.hide("FOO"));
        env.unhide("FOO");
        assert!(env.hide("FOO"));
    }
}
