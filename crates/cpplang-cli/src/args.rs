//! CLI argument surface for the `cpplang` binary.

use clap::Parser;
use std::path::PathBuf;

/// Parses and binds one or more C++ translation units, reporting whatever
/// the preprocessor/lexer/parser/binder pipeline finds.
#[derive(Parser, Debug)]
#[command(name = "cpplang", version, about = "cpplang-frontend CLI driver")]
pub struct CliArgs {
    /// Source files to process.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Add a directory to the quoted (`#include "..."`) search path.
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub quote_include_paths: Vec<PathBuf>,

    /// Add a directory to the angle-bracketed (`#include <...>`) search path.
    #[arg(long = "isystem", value_name = "DIR")]
    pub system_include_paths: Vec<PathBuf>,

    /// Define a macro, as `NAME` or `NAME=VALUE`.
    #[arg(short = 'D', long = "define", value_name = "NAME[=VALUE]")]
    pub defines: Vec<String>,

    /// Undefine a macro.
    #[arg(short = 'U', long = "undefine", value_name = "NAME")]
    pub undefines: Vec<String>,

    /// Enable Qt moc-run dialect extensions (`Q_OBJECT`, `signals`/`slots`, ...).
    #[arg(long)]
    pub qt: bool,

    /// Enable Objective-C++ dialect extensions (`@interface`, `@implementation`, ...).
    #[arg(long)]
    pub objc: bool,

    /// Print the bound top-level symbol tree to stdout after processing.
    #[arg(long = "dump-symbols")]
    pub dump_symbols: bool,
}

impl CliArgs {
    /// Splits `NAME=VALUE`/`NAME` define strings into their component parts.
    #[must_use]
    pub fn parsed_defines(&self) -> Vec<(String, Option<String>)> {
        self.defines
            .iter()
            .map(|define| match define.split_once('=') {
                Some((name, value)) => (name.to_string(), Some(value.to_string())),
                None => (define.clone(), None),
            })
            .collect()
    }
}
