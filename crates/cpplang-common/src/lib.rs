//! Common types and utilities shared across the cpplang front-end crates.
//!
//! - Source spans (`Span`, `Spanned`, `SpanBuilder`)
//! - Position/line-map conversion for diagnostics and editor clients
//! - Diagnostic types and a pluggable `DiagnosticClient`
//! - Centralized limits (recursion depth caps, iflevel cap, etc.)
//! - Dialect/front-end feature flags

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticClient, NullDiagnosticClient};

pub mod limits;

pub mod options;
pub use options::{FrontendOptions, LexerFeatureFlags};

pub mod position;
pub use position::{LineMap, Position};

pub mod span;
pub use span::{Span, SpanBuilder, Spanned};
