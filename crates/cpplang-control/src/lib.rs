//! Literal interning and the `Control` factory.
//!
//! `Control` owns the interning pools that guarantee pointer equality of
//! identifiers, string literals, numeric literals, canonical names, and
//! canonical types. It is the one object every later stage (Lexer,
//! Preprocessor, Binder) holds a reference to for turning raw spellings
//! into canonical, comparable-by-pointer values.

pub mod control;
pub mod literal;
pub mod name;
pub mod ty;

pub use control::{Control, TopLevelDeclarationProcessor, TranslationUnitId};
pub use literal::{Identifier, InternedLiteral, LiteralPool, NumericLiteral, StringLiteral};
pub use name::{Name, NamePool, OperatorKind};
pub use ty::{FloatKind, FullySpecifiedType, IntegerKind, Qualifiers, Type, TypePool};
