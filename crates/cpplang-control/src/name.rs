//! Canonical names: identifiers, template-ids, qualified names, and the
//! rest of the name grammar, all interned so two structurally equal names
//! share identity.

use crate::literal::Identifier;
use crate::ty::Type;
use cpplang_arena::Arena;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

/// A canonical, interned name. Two structurally equal names share
/// identity: comparing `&Name` by pointer is a valid equality test.
#[derive(Debug)]
pub enum Name<'ctrl> {
    Identifier(&'ctrl Identifier<'ctrl>),
    TemplateNameId {
        id: &'ctrl Name<'ctrl>,
        args: &'ctrl [&'ctrl Type<'ctrl>],
        is_specialization: bool,
    },
    DestructorNameId(&'ctrl Name<'ctrl>),
    OperatorNameId(OperatorKind),
    ConversionNameId(&'ctrl Type<'ctrl>),
    QualifiedNameId {
        base: &'ctrl Name<'ctrl>,
        name: &'ctrl Name<'ctrl>,
    },
    /// Objective-C selector name, e.g. `initWithFrame:andColor:`.
    SelectorNameId {
        names: &'ctrl [&'ctrl Identifier<'ctrl>],
        has_args: bool,
    },
    /// Stable identity for an unnamed class/enum/union, keyed by a
    /// monotonically increasing counter rather than spelling.
    AnonymousNameId(u32),
}

impl PartialEq for Name<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Name<'_> {}

/// The operator named by an `operator@` function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    PlusPlus,
    MinusMinus,
    LeftShift,
    RightShift,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    AmpAmp,
    PipePipe,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    SlashAssign,
    PercentAssign,
    AmpAssign,
    PipeAssign,
    CaretAssign,
    LeftShiftAssign,
    RightShiftAssign,
    Comma,
    Arrow,
    ArrowStar,
    Call,
    Subscript,
    New,
    Delete,
    NewArray,
    DeleteArray,
}

fn ptr_key<T>(p: &T) -> usize {
    p as *const T as usize
}

/// A structural key used to deduplicate names during interning, built from
/// already-canonical child pointers. Comparing keys this way is as cheap
/// as comparing the children would have been to compare structurally.
#[derive(PartialEq, Eq, Hash)]
enum NameKey {
    Identifier(usize),
    TemplateNameId(usize, Vec<usize>, bool),
    DestructorNameId(usize),
    OperatorNameId(OperatorKind),
    ConversionNameId(usize),
    QualifiedNameId(usize, usize),
    SelectorNameId(Vec<usize>, bool),
}

/// Interning pool for [`Name`]. `AnonymousNameId` is deliberately excluded
/// from the dedup table: every call mints a fresh, never-reused name.
pub struct NamePool<'ctrl> {
    entries: RefCell<FxHashMap<NameKey, &'ctrl Name<'ctrl>>>,
    anonymous_counter: RefCell<u32>,
}

impl<'ctrl> NamePool<'ctrl> {
    #[must_use]
    pub fn new() -> Self {
        NamePool {
            entries: RefCell::new(FxHashMap::default()),
            anonymous_counter: RefCell::new(0),
        }
    }

    fn intern_with(
        &self,
        arena: &'ctrl Arena,
        key: NameKey,
        build: impl FnOnce() -> Name<'ctrl>,
    ) -> &'ctrl Name<'ctrl> {
        if let Some(existing) = self.entries.borrow().get(&key) {
            return existing;
        }
        let name = arena.alloc(build());
        self.entries.borrow_mut().insert(key, name);
        name
    }

    pub fn identifier(&self, arena: &'ctrl Arena, id: &'ctrl Identifier<'ctrl>) -> &'ctrl Name<'ctrl> {
        self.intern_with(arena, NameKey::Identifier(ptr_key(id)), || Name::Identifier(id))
    }

    pub fn template_name_id(
        &self,
        arena: &'ctrl Arena,
        id: &'ctrl Name<'ctrl>,
        args: &'ctrl [&'ctrl Type<'ctrl>],
        is_specialization: bool,
    ) -> &'ctrl Name<'ctrl> {
        let key = NameKey::TemplateNameId(
            ptr_key(id),
            args.iter().map(|t| ptr_key(*t)).collect(),
            is_specialization,
        );
        self.intern_with(arena, key, || Name::TemplateNameId {
            id,
            args,
            is_specialization,
        })
    }

    pub fn destructor_name_id(&self, arena: &'ctrl Arena, name: &'ctrl Name<'ctrl>) -> &'ctrl Name<'ctrl> {
        self.intern_with(arena, NameKey::DestructorNameId(ptr_key(name)), || {
            Name::DestructorNameId(name)
        })
    }

    pub fn operator_name_id(&self, arena: &'ctrl Arena, op: OperatorKind) -> &'ctrl Name<'ctrl> {
        self.intern_with(arena, NameKey::OperatorNameId(op), || Name::OperatorNameId(op))
    }

    pub fn conversion_name_id(&self, arena: &'ctrl Arena, ty: &'ctrl Type<'ctrl>) -> &'ctrl Name<'ctrl> {
        self.intern_with(arena, NameKey::ConversionNameId(ptr_key(ty)), || {
            Name::ConversionNameId(ty)
        })
    }

    pub fn qualified_name_id(
        &self,
        arena: &'ctrl Arena,
        base: &'ctrl Name<'ctrl>,
        name: &'ctrl Name<'ctrl>,
    ) -> &'ctrl Name<'ctrl> {
        let key = NameKey::QualifiedNameId(ptr_key(base), ptr_key(name));
        self.intern_with(arena, key, || Name::QualifiedNameId { base, name })
    }

    pub fn selector_name_id(
        &self,
        arena: &'ctrl Arena,
        names: &'ctrl [&'ctrl Identifier<'ctrl>],
        has_args: bool,
    ) -> &'ctrl Name<'ctrl> {
        let key = NameKey::SelectorNameId(names.iter().map(|n| ptr_key(*n)).collect(), has_args);
        self.intern_with(arena, key, || Name::SelectorNameId { names, has_args })
    }

    /// A fresh anonymous name, stable for this pool's lifetime but never
    /// equal to any other name (including another anonymous one).
    pub fn anonymous_name_id(&self, arena: &'ctrl Arena) -> &'ctrl Name<'ctrl> {
        let mut counter = self.anonymous_counter.borrow_mut();
        let value = *counter;
        *counter += 1;
        arena.alloc(Name::AnonymousNameId(value))
    }
}

impl Default for NamePool<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::LiteralPool;

    #[test]
    fn structurally_equal_identifiers_share_identity() {
        let arena = Arena::new();
        let identifiers: LiteralPool<Identifier> = LiteralPool::new();
        let names = NamePool::new();
        let foo_a = identifiers.intern(&arena, "foo");
        let foo_b = identifiers.intern(&arena, "foo");
        let name_a = names.identifier(&arena, foo_a);
        let name_b = names.identifier(&arena, foo_b);
        assert!(std::ptr::eq(name_a, name_b));
    }

    #[test]
    fn qualified_names_dedup_on_base_and_name_pointers() {
        let arena = Arena::new();
        let identifiers: LiteralPool<Identifier> = LiteralPool::new();
        let names = NamePool::new();
        let std_id = names.identifier(&arena, identifiers.intern(&arena, "std"));
        let vector_id = names.identifier(&arena, identifiers.intern(&arena, "vector"));
        let a = names.qualified_name_id(&arena, std_id, vector_id);
        let b = names.qualified_name_id(&arena, std_id, vector_id);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn anonymous_names_are_never_equal() {
        let arena = Arena::new();
        let names = NamePool::new();
        let a = names.anonymous_name_id(&arena);
        let b = names.anonymous_name_id(&arena);
        assert!(!std::ptr::eq(a, b));
    }
}
