//! Interned literal pools: `Identifier`, `StringLiteral`, `NumericLiteral`.
//!
//! Equality between interned literals reduces to pointer equality: each
//! pool is a dedup-by-spelling hash table, and every lookup for the same
//! spelling returns the same arena allocation. Hash is computed once, at
//! construction, and cached on the literal itself.

use cpplang_arena::Arena;
use rustc_hash::{FxHashMap, FxHasher};
use std::cell::RefCell;
use std::hash::{Hash, Hasher};

fn hash_spelling(s: &str) -> u64 {
    let mut hasher = FxHasher::default();
    s.hash(&mut hasher);
    hasher.finish()
}

/// Implemented by each literal kind so a single generic [`LiteralPool`] can
/// intern all of them.
pub trait InternedLiteral<'ctrl> {
    fn from_spelling(chars: &'ctrl str, hash: u64) -> Self;
    fn spelling(&self) -> &'ctrl str;
}

macro_rules! literal_kind {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug)]
        pub struct $name<'ctrl> {
            pub chars: &'ctrl str,
            pub hash: u64,
        }

        impl<'ctrl> $name<'ctrl> {
            #[must_use]
            pub fn as_str(&self) -> &'ctrl str {
                self.chars
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self, other)
            }
        }
        impl Eq for $name<'_> {}

        impl Hash for $name<'_> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                (self as *const Self).hash(state);
            }
        }

        impl<'ctrl> InternedLiteral<'ctrl> for $name<'ctrl> {
            fn from_spelling(chars: &'ctrl str, hash: u64) -> Self {
                $name { chars, hash }
            }
            fn spelling(&self) -> &'ctrl str {
                self.chars
            }
        }
    };
}

literal_kind!(Identifier, "An interned identifier spelling.");
literal_kind!(StringLiteral, "An interned string-literal spelling (including quotes/prefix).");
literal_kind!(NumericLiteral, "An interned numeric-literal spelling.");

/// A hash-table-backed interning pool for one literal kind. Pools are
/// append-only for the lifetime of the owning `Control`.
pub struct LiteralPool<'ctrl, T> {
    entries: RefCell<FxHashMap<&'ctrl str, &'ctrl T>>,
}

impl<'ctrl, T: InternedLiteral<'ctrl>> LiteralPool<'ctrl, T> {
    #[must_use]
    pub fn new() -> Self {
        LiteralPool {
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    /// Return the canonical literal for `chars`, allocating in `arena` on
    /// first sight. Never fails.
    pub fn intern(&self, arena: &'ctrl Arena, chars: &str) -> &'ctrl T {
        if let Some(existing) = self.entries.borrow().get(chars) {
            return existing;
        }
        let owned = arena.alloc_str(chars);
        let literal = arena.alloc(T::from_spelling(owned, hash_spelling(owned)));
        self.entries.borrow_mut().insert(owned, literal);
        literal
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'ctrl, T: InternedLiteral<'ctrl>> Default for LiteralPool<'ctrl, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpplang_arena::Arena;

    #[test]
    fn interning_same_spelling_returns_same_pointer() {
        let arena = Arena::new();
        let pool: LiteralPool<Identifier> = LiteralPool::new();
        let a = pool.intern(&arena, "foo");
        let b = pool.intern(&arena, "foo");
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn interning_different_spellings_returns_different_pointers() {
        let arena = Arena::new();
        let pool: LiteralPool<Identifier> = LiteralPool::new();
        let a = pool.intern(&arena, "foo");
        let b = pool.intern(&arena, "bar");
        assert!(!std::ptr::eq(a, b));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn hash_is_stable_for_equal_spellings() {
        let arena = Arena::new();
        let pool: LiteralPool<NumericLiteral> = LiteralPool::new();
        let a = pool.intern(&arena, "42");
        let b = pool.intern(&arena, "42");
        assert_eq!(a.hash, b.hash);
    }
}
