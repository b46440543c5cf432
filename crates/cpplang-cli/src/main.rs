use anyhow::Result;
use clap::Parser;
use cpplang_cli::args::CliArgs;
use cpplang_common::FrontendOptions;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "cpplang=info,warn".to_string()))
        .init();

    let args = CliArgs::parse();
    let mut options = FrontendOptions::default();
    if args.qt {
        options = options.with_qt_moc();
    }
    if args.objc {
        options = options.with_objc();
    }
    options.quote_include_paths = args.quote_include_paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
    options.system_include_paths = args.system_include_paths.iter().map(|p| p.to_string_lossy().into_owned()).collect();
    options.predefined_macros = args.parsed_defines();
    options.undefined_macros = args.undefines.clone();

    let mut had_errors = false;
    for file in &args.files {
        if cpplang_cli::process_file(file, &options, args.dump_symbols)? {
            had_errors = true;
        }
    }

    std::process::exit(i32::from(had_errors));
}
