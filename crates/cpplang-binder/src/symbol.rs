//! The binder's symbol table: [`Symbol`], [`Scope`], and the visibility/
//! method-key/class-key enums that travel alongside them. Symbols are
//! allocated out of the same [`cpplang_control::Control`] arena that backs
//! canonical names and types, so a `Symbol<'ctrl>` lives exactly as long as
//! the translation unit's `Control` does — no separate arena to juggle.

use cpplang_control::{FullySpecifiedType, Name};
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    Package,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKey {
    Class,
    Struct,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKey {
    Normal,
    Signal,
    Slot,
    Invokable,
}

/// A symbol that owns a member list: a namespace, class, function, block,
/// enum, or template. Owns its members by value, append-only during
/// binding, and exposes ordered iteration.
#[derive(Debug, Default)]
pub struct Scope<'ctrl> {
    members: RefCell<Vec<&'ctrl Symbol<'ctrl>>>,
}

impl<'ctrl> Scope<'ctrl> {
    #[must_use]
    pub fn new() -> Self {
        Scope { members: RefCell::new(Vec::new()) }
    }

    pub fn add_member(&self, symbol: &'ctrl Symbol<'ctrl>) {
        self.members.borrow_mut().push(symbol);
    }

    #[must_use]
    pub fn members(&self) -> Vec<&'ctrl Symbol<'ctrl>> {
        self.members.borrow().clone()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.borrow().len()
    }

    /// Last member satisfying `predicate`. Used by enumerator
    /// constant-value derivation, which only ever needs the previous
    /// enumerator.
    #[must_use]
    pub fn find_last(&self, mut predicate: impl FnMut(&Symbol<'ctrl>) -> bool) -> Option<&'ctrl Symbol<'ctrl>> {
        self.members.borrow().iter().rev().find(|m| predicate(m)).copied()
    }
}

#[derive(Debug)]
pub struct FunctionSymbol<'ctrl> {
    pub scope: Scope<'ctrl>,
    pub return_type: FullySpecifiedType<'ctrl>,
    pub parameters: Vec<&'ctrl Symbol<'ctrl>>,
    pub is_variadic: bool,
    pub method_key: MethodKey,
    pub is_pure_virtual: bool,
}

#[derive(Debug)]
pub struct ClassSymbol<'ctrl> {
    pub scope: Scope<'ctrl>,
    pub class_key: ClassKey,
    base_classes: RefCell<Vec<&'ctrl Symbol<'ctrl>>>,
}

impl<'ctrl> ClassSymbol<'ctrl> {
    #[must_use]
    pub fn new(scope: Scope<'ctrl>, class_key: ClassKey) -> Self {
        ClassSymbol { scope, class_key, base_classes: RefCell::new(Vec::new()) }
    }

    pub fn add_base_class(&self, base: &'ctrl Symbol<'ctrl>) {
        self.base_classes.borrow_mut().push(base);
    }

    #[must_use]
    pub fn base_classes(&self) -> Vec<&'ctrl Symbol<'ctrl>> {
        self.base_classes.borrow().clone()
    }
}

#[derive(Debug)]
pub struct EnumSymbol<'ctrl> {
    pub scope: Scope<'ctrl>,
    pub is_scoped: bool,
}

/// A name copied out of the source text at bind time, for the handful of
/// spots (Objective-C category names) where the data model wants raw
/// spelling rather than a canonical `Name`.
pub type Ustr = String;

#[derive(Debug)]
pub struct ObjcClassSymbol<'ctrl> {
    pub scope: Scope<'ctrl>,
    pub is_interface: bool,
    pub category: Option<Ustr>,
}

#[derive(Debug)]
pub enum SymbolKind<'ctrl> {
    Declaration {
        ty: FullySpecifiedType<'ctrl>,
        is_auto_initialized: bool,
    },
    EnumeratorDeclaration {
        constant_value: String,
    },
    Argument {
        ty: FullySpecifiedType<'ctrl>,
    },
    TypenameArgument {
        is_class_declarator: bool,
    },
    Function(Box<FunctionSymbol<'ctrl>>),
    Namespace {
        scope: Scope<'ctrl>,
        is_inline: bool,
    },
    NamespaceAlias {
        target: &'ctrl Name<'ctrl>,
    },
    Template {
        scope: Scope<'ctrl>,
        declaration: RefCell<Option<&'ctrl Symbol<'ctrl>>>,
    },
    BaseClass {
        class: Option<&'ctrl Symbol<'ctrl>>,
    },
    Class(Box<ClassSymbol<'ctrl>>),
    Enum(Box<EnumSymbol<'ctrl>>),
    Block {
        scope: Scope<'ctrl>,
    },
    UsingNamespaceDirective,
    UsingDeclaration,
    ForwardClassDeclaration,
    QtPropertyDeclaration {
        ty: FullySpecifiedType<'ctrl>,
    },
    QtEnum {
        is_flags: bool,
    },
    ObjCClass(Box<ObjcClassSymbol<'ctrl>>),
    ObjCProtocol {
        scope: Scope<'ctrl>,
    },
    ObjCMethod {
        scope: Scope<'ctrl>,
        is_class_method: bool,
        return_type: FullySpecifiedType<'ctrl>,
    },
    ObjCPropertyDeclaration {
        ty: FullySpecifiedType<'ctrl>,
    },
    ObjCBaseClass,
    ObjCBaseProtocol,
    ForwardObjCClassDeclaration,
    ForwardObjCProtocolDeclaration,
}

impl<'ctrl> SymbolKind<'ctrl> {
    /// The scope this kind owns, if any. `None` means this symbol has no
    /// member list of its own.
    #[must_use]
    pub fn scope(&self) -> Option<&Scope<'ctrl>> {
        match self {
            SymbolKind::Namespace { scope, .. }
            | SymbolKind::Template { scope, .. }
            | SymbolKind::Block { scope }
            | SymbolKind::ObjCProtocol { scope }
            | SymbolKind::ObjCMethod { scope, .. } => Some(scope),
            SymbolKind::Function(fun) => Some(&fun.scope),
            SymbolKind::Class(class) => Some(&class.scope),
            SymbolKind::Enum(e) => Some(&e.scope),
            SymbolKind::ObjCClass(class) => Some(&class.scope),
            _ => None,
        }
    }
}

/// One bound symbol: a source location (token index into the owning
/// translation unit), an optional name, visibility, a weak (lookup-only)
/// back-reference to its enclosing scope, and kind-specific data.
#[derive(Debug)]
pub struct Symbol<'ctrl> {
    pub token_index: u32,
    pub name: Option<&'ctrl Name<'ctrl>>,
    pub visibility: Visibility,
    pub enclosing_scope: Option<&'ctrl Symbol<'ctrl>>,
    pub template_parameters: Vec<&'ctrl Symbol<'ctrl>>,
    pub kind: SymbolKind<'ctrl>,
}

impl<'ctrl> Symbol<'ctrl> {
    #[must_use]
    pub fn new(
        token_index: u32,
        name: Option<&'ctrl Name<'ctrl>>,
        enclosing_scope: Option<&'ctrl Symbol<'ctrl>>,
        kind: SymbolKind<'ctrl>,
    ) -> Self {
        Symbol {
            token_index,
            name,
            visibility: Visibility::Public,
            enclosing_scope,
            template_parameters: Vec::new(),
            kind,
        }
    }

    #[must_use]
    pub fn scope(&self) -> Option<&Scope<'ctrl>> {
        self.kind.scope()
    }

    #[must_use]
    pub fn is_class(&self) -> bool {
        matches!(self.kind, SymbolKind::Class(_))
    }

    #[must_use]
    pub fn as_class(&self) -> Option<&ClassSymbol<'ctrl>> {
        match &self.kind {
            SymbolKind::Class(class) => Some(class),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_namespace(&self) -> bool {
        matches!(self.kind, SymbolKind::Namespace { .. })
    }
}
