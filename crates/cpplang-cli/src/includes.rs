//! Filesystem-backed [`SourceProvider`]: resolves `#include` directives
//! against the quote/system search paths the CLI was given, the same two
//! buckets `FrontendOptions::quote_include_paths`/`system_include_paths`
//! describe.

use cpplang_preprocessor::{IncludeKind, SourceProvider};
use std::path::{Path, PathBuf};

pub struct FsIncludes {
    quote_paths: Vec<PathBuf>,
    system_paths: Vec<PathBuf>,
}

impl FsIncludes {
    #[must_use]
    pub fn new(quote_paths: Vec<PathBuf>, system_paths: Vec<PathBuf>) -> Self {
        FsIncludes { quote_paths, system_paths }
    }

    fn search(&self, file_name: &str, kind: IncludeKind) -> Option<PathBuf> {
        if kind == IncludeKind::Local {
            let direct = Path::new(file_name);
            if direct.is_file() {
                return Some(direct.to_path_buf());
            }
            for dir in &self.quote_paths {
                let candidate = dir.join(file_name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        for dir in &self.system_paths {
            let candidate = dir.join(file_name);
            if candidate.is_file() {
                return Some(candidate);
            }
        }
        None
    }
}

impl SourceProvider for FsIncludes {
    fn source_needed(&mut self, file_name: &mut String, kind: IncludeKind) -> Option<String> {
        let resolved = self.search(file_name, kind)?;
        let text = std::fs::read_to_string(&resolved).ok()?;
        *file_name = resolved.to_string_lossy().into_owned();
        Some(text)
    }
}
