#![allow(missing_docs)]
#![allow(clippy::print_stderr)]

use std::fs::File;
use std::path::PathBuf;

use miette::IntoDiagnostic;

use symdump_cli::{CliAction, CliDumpArgs, CliOpts, DumpConfig, SymbolSource};

use tracing_subscriber::EnvFilter;

fn main() {
    let cli = CliOpts::parse_from_cmdline();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_env_var("SYMDUMP_LOG")
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let res = match cli.action {
        CliAction::Dump { dump_args, library } => {
            evaluate_dump(dump_args, SymbolSource::Library(library))
        }
        CliAction::Extract {
            dump_args,
            bias,
            file,
        } => evaluate_dump(
            dump_args,
            SymbolSource::File {
                path: file,
                load_bias: bias,
            },
        ),
        CliAction::Modules { output } => evaluate_modules(output),
    };

    if let Err(e) = res {
        eprintln!("{e:?}");
        std::process::exit(1);
    }
}

fn evaluate_dump(dump_args: CliDumpArgs, source: SymbolSource) -> miette::Result<()> {
    let mut config = dump_args
        .config
        .as_deref()
        .map(DumpConfig::parse)
        .transpose()?
        .unwrap_or_default();

    if let Some(address_format) = dump_args.address_format {
        config.address_format = address_format;
    }

    if let Some(output) = dump_args.output {
        let file = File::create(output).into_diagnostic()?;
        symdump_cli::evaluate_dump(source, config, file)
    } else {
        symdump_cli::evaluate_dump(source, config, std::io::stdout().lock())
    }
}

fn evaluate_modules(output: Option<PathBuf>) -> miette::Result<()> {
    if let Some(output) = output {
        let file = File::create(output).into_diagnostic()?;
        symdump_cli::evaluate_modules(file)
    } else {
        symdump_cli::evaluate_modules(std::io::stdout().lock())
    }
}
