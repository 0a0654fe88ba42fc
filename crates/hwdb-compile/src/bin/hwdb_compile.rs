use clap::{CommandFactory, Parser};
use hwdb_compile::cli::CompileArgs;
use hwdb_compile::compile::compile;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    let args = CompileArgs::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if !args.update {
        CompileArgs::command().print_help().into_diagnostic()?;
        return Ok(());
    }

    let summary = compile(&args.dirs, &args.output)?;

    println!(
        "Compiled {} source files, {} properties -> {}",
        summary.files,
        summary.properties,
        args.output.display()
    );

    Ok(())
}
