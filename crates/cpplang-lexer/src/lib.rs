//! Hand-written character scanner producing a flat token array.
//!
//! `cpplang-tu` owns the token array once scanned (it post-processes it
//! for brace matching and `>>` splitting); this crate only turns a
//! preprocessed source buffer into tokens.

pub mod keywords;
pub mod scanner;
pub mod token;

pub use scanner::{scan, ByteRange, ExpandedPosition, ExpansionBlock, ExpansionEntry, Marker, ScanResult};
pub use token::{Token, TokenFlags, TokenKind, TokenPayload};
