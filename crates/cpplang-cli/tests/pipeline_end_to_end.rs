//! Exercises the full preprocessor/lexer/parser/binder pipeline through
//! `process_file`, the same entry point the `cpplang` binary calls per
//! file. Nothing below the parser had an end-to-end consumer before this
//! crate existed.

use cpplang_common::FrontendOptions;
use std::io::Write;

fn write_source(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create source file");
    file.write_all(contents.as_bytes()).expect("write source file");
    path
}

#[test]
fn clean_translation_unit_reports_no_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_source(&dir, "clean.cpp", "struct Point { int x; int y; };\nint add(int a, int b) { return a + b; }\n");

    let had_errors = cpplang_cli::process_file(&path, &FrontendOptions::default(), false).expect("process_file succeeds");
    assert!(!had_errors);
}

#[test]
fn header_pulled_in_through_quote_include_path_is_resolved() {
    let dir = tempfile::tempdir().expect("tempdir");
    let include_dir = dir.path().join("include");
    std::fs::create_dir(&include_dir).expect("create include dir");
    std::fs::write(include_dir.join("widget.h"), "struct Widget { int id; };\n").expect("write header");

    let main_path = write_source(&dir, "main.cpp", "#include \"widget.h\"\nWidget w;\n");

    let mut options = FrontendOptions::default();
    options.quote_include_paths = vec![include_dir.to_string_lossy().into_owned()];

    let had_errors = cpplang_cli::process_file(&main_path, &options, true).expect("process_file succeeds");
    assert!(!had_errors);
}
