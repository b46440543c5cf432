//! Canonical types, interned the same way names are, plus
//! [`FullySpecifiedType`], which pairs a canonical type with the
//! declaration-site qualifier bits that are *not* part of its identity.

use crate::name::Name;
use bitflags::bitflags;
use cpplang_arena::Arena;
use rustc_hash::FxHashMap;
use std::cell::RefCell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegerKind {
    Char,
    Char16,
    Char32,
    WideChar,
    Bool,
    Short,
    Int,
    Long,
    LongLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatKind {
    Float,
    Double,
    LongDouble,
}

/// A canonical, interned type. Two structurally equal types share
/// identity.
#[derive(Debug)]
pub enum Type<'ctrl> {
    Void,
    Integer(IntegerKind),
    Float(FloatKind),
    Pointer(&'ctrl Type<'ctrl>),
    Reference {
        referee: &'ctrl Type<'ctrl>,
        is_rvalue: bool,
    },
    Array {
        element: &'ctrl Type<'ctrl>,
        size: Option<u64>,
    },
    PointerToMember {
        scope_name: &'ctrl Name<'ctrl>,
        referee: &'ctrl Type<'ctrl>,
    },
    Named(&'ctrl Name<'ctrl>),
    Undefined,
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}
impl Eq for Type<'_> {}

fn ptr_key<T>(p: &T) -> usize {
    p as *const T as usize
}

#[derive(PartialEq, Eq, Hash)]
enum TypeKey {
    Void,
    Integer(IntegerKind),
    Float(FloatKind),
    Pointer(usize),
    Reference(usize, bool),
    Array(usize, Option<u64>),
    PointerToMember(usize, usize),
    Named(usize),
    Undefined,
}

/// Interning pool for [`Type`].
pub struct TypePool<'ctrl> {
    entries: RefCell<FxHashMap<TypeKey, &'ctrl Type<'ctrl>>>,
}

impl<'ctrl> TypePool<'ctrl> {
    #[must_use]
    pub fn new() -> Self {
        TypePool {
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    fn intern(&self, arena: &'ctrl Arena, key: TypeKey, build: impl FnOnce() -> Type<'ctrl>) -> &'ctrl Type<'ctrl> {
        if let Some(existing) = self.entries.borrow().get(&key) {
            return existing;
        }
        let ty = arena.alloc(build());
        self.entries.borrow_mut().insert(key, ty);
        ty
    }

    pub fn void(&self, arena: &'ctrl Arena) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Void, || Type::Void)
    }

    pub fn undefined(&self, arena: &'ctrl Arena) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Undefined, || Type::Undefined)
    }

    pub fn integer(&self, arena: &'ctrl Arena, kind: IntegerKind) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Integer(kind), || Type::Integer(kind))
    }

    pub fn float(&self, arena: &'ctrl Arena, kind: FloatKind) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Float(kind), || Type::Float(kind))
    }

    pub fn pointer(&self, arena: &'ctrl Arena, pointee: &'ctrl Type<'ctrl>) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Pointer(ptr_key(pointee)), || Type::Pointer(pointee))
    }

    pub fn reference(&self, arena: &'ctrl Arena, referee: &'ctrl Type<'ctrl>, is_rvalue: bool) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Reference(ptr_key(referee), is_rvalue), || {
            Type::Reference { referee, is_rvalue }
        })
    }

    pub fn array(&self, arena: &'ctrl Arena, element: &'ctrl Type<'ctrl>, size: Option<u64>) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Array(ptr_key(element), size), || Type::Array { element, size })
    }

    pub fn pointer_to_member(
        &self,
        arena: &'ctrl Arena,
        scope_name: &'ctrl Name<'ctrl>,
        referee: &'ctrl Type<'ctrl>,
    ) -> &'ctrl Type<'ctrl> {
        let key = TypeKey::PointerToMember(ptr_key(scope_name), ptr_key(referee));
        self.intern(arena, key, || Type::PointerToMember { scope_name, referee })
    }

    pub fn named(&self, arena: &'ctrl Arena, name: &'ctrl Name<'ctrl>) -> &'ctrl Type<'ctrl> {
        self.intern(arena, TypeKey::Named(ptr_key(name)), || Type::Named(name))
    }
}

impl Default for TypePool<'_> {
    fn default() -> Self {
        Self::new()
    }
}

bitflags! {
    /// Declaration-site qualifiers attached to a [`FullySpecifiedType`].
    /// Deliberately not part of a `Type`'s interning key: `int` and
    /// `const int` share the same canonical `Type::Integer(Int)`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Qualifiers: u32 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const AUTO = 1 << 2;
        const REGISTER = 1 << 3;
        const STATIC = 1 << 4;
        const EXTERN = 1 << 5;
        const MUTABLE = 1 << 6;
        const TYPEDEF = 1 << 7;
        const INLINE = 1 << 8;
        const VIRTUAL = 1 << 9;
        const EXPLICIT = 1 << 10;
        const FRIEND = 1 << 11;
        const SIGNED = 1 << 12;
        const UNSIGNED = 1 << 13;
        const FINAL = 1 << 14;
        const OVERRIDE = 1 << 15;
        const DEPRECATED = 1 << 16;
        const UNAVAILABLE = 1 << 17;
    }
}

/// A canonical type paired with the qualifier bits accumulated while
/// walking a specifier list, and a validity flag a binder clears once it
/// decides the specifier combination is unusable (e.g. `long float`).
#[derive(Debug, Clone, Copy)]
pub struct FullySpecifiedType<'ctrl> {
    pub ty: &'ctrl Type<'ctrl>,
    qualifiers: Qualifiers,
    valid: bool,
}

impl<'ctrl> FullySpecifiedType<'ctrl> {
    #[must_use]
    pub fn new(ty: &'ctrl Type<'ctrl>) -> Self {
        FullySpecifiedType {
            ty,
            qualifiers: Qualifiers::empty(),
            valid: true,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn mark_invalid(&mut self) {
        self.valid = false;
    }

    #[must_use]
    pub fn qualifiers(&self) -> Qualifiers {
        self.qualifiers
    }

    #[must_use]
    pub fn has(&self, q: Qualifiers) -> bool {
        self.qualifiers.contains(q)
    }

    /// Idempotently sets a qualifier. Returns `true` if it was already
    /// set — callers use that to diagnose a "duplicate qualifier"
    /// warning, but the bit itself is unaffected by setting it twice.
    pub fn set(&mut self, q: Qualifiers) -> bool {
        let already_set = self.qualifiers.contains(q);
        self.qualifiers |= q;
        already_set
    }

    pub fn with_type(&mut self, ty: &'ctrl Type<'ctrl>) {
        self.ty = ty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_integer_kind_is_canonical() {
        let arena = Arena::new();
        let pool = TypePool::new();
        let a = pool.integer(&arena, IntegerKind::Int);
        let b = pool.integer(&arena, IntegerKind::Int);
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn pointer_to_distinct_pointees_is_distinct() {
        let arena = Arena::new();
        let pool = TypePool::new();
        let int_ty = pool.integer(&arena, IntegerKind::Int);
        let float_ty = pool.float(&arena, FloatKind::Float);
        let p1 = pool.pointer(&arena, int_ty);
        let p2 = pool.pointer(&arena, float_ty);
        assert!(!std::ptr::eq(p1, p2));
    }

    #[test]
    fn qualifiers_do_not_affect_type_identity() {
        let arena = Arena::new();
        let pool = TypePool::new();
        let int_ty = pool.integer(&arena, IntegerKind::Int);
        let plain = FullySpecifiedType::new(int_ty);
        let mut const_qualified = FullySpecifiedType::new(int_ty);
        const_qualified.set(Qualifiers::CONST);
        assert!(std::ptr::eq(plain.ty, const_qualified.ty));
    }

    #[test]
    fn setting_a_qualifier_twice_is_reported_but_idempotent() {
        let int_ty_arena = Arena::new();
        let pool = TypePool::new();
        let int_ty = pool.integer(&int_ty_arena, IntegerKind::Int);
        let mut fst = FullySpecifiedType::new(int_ty);
        assert!(!fst.set(Qualifiers::CONST));
        assert!(fst.set(Qualifiers::CONST));
        assert_eq!(fst.qualifiers(), Qualifiers::CONST);
    }
}
