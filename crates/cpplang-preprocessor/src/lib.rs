//! Macro expansion, conditional compilation, and include handling: turns
//! one translation unit's raw source (plus whatever `#include`s it pulls
//! in) into a single preprocessed buffer `cpplang-lexer` scans directly,
//! recovering original positions from the `# line`/`# expansion` markers
//! this crate writes into that buffer.

mod cond;
mod engine;
mod expr;
mod include;
mod macro_env;
mod macro_expand;
mod pp_token;

pub use cond::{ConditionalStack, IfLevel};
pub use engine::{PreprocessedOutput, Preprocessor};
pub use include::{IncludeKind, SourceProvider};
pub use macro_env::{MacroEnvironment, PpMacro};
