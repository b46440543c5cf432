//! The `#include` boundary: how the preprocessor asks its host for the
//! text of an included file.

/// Whether an `#include` argument was quoted (`"foo.h"`) or
/// angle-bracketed (`<foo.h>`); callers typically search the quote
/// include path first only for `Local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeKind {
    Local,
    Global,
}

/// Supplies the source text for an `#include`d file. `file_name` may be
/// rewritten in place (e.g. resolved against an include search path) so
/// the canonical name is what ends up keying header-guard tracking and
/// `# line` markers. Returning `None` means the file could not be found;
/// the directive is then reported and skipped.
pub trait SourceProvider {
    fn source_needed(&mut self, file_name: &mut String, kind: IncludeKind) -> Option<String>;
}
