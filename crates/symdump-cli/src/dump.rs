use std::io::Write;
use std::path::PathBuf;

use miette::IntoDiagnostic;
use regex::Regex;
use symdump_dumper::{SymbolDumper, SymbolMap};

use super::config::DumpConfig;

/// Where the symbols to dump come from.
pub enum SymbolSource {
    /// Shared library loaded by the dynamic linker.
    Library(PathBuf),

    /// ELF file parsed at an explicit load bias, without being loaded.
    File {
        /// Path of the ELF file.
        path: PathBuf,

        /// Load bias added to every symbol value.
        load_bias: u64,
    },
}

/// Runs the subcommands dumping symbols.
///
/// Every kept symbol is written as an `<address>\t<name>` line.
pub fn evaluate_dump(
    source: SymbolSource,
    config: DumpConfig,
    output: impl Write,
) -> miette::Result<()> {
    let mut dumper = SymbolDumper::new();
    dumper
        .set_address_format(&config.address_format)
        .into_diagnostic()?;

    let filters = config.compile_filters()?;

    let symbols = match source {
        SymbolSource::Library(path) => dumper.dump_symbols(path),
        SymbolSource::File { path, load_bias } => dumper.dump_symbols_at(path, load_bias),
    }
    .into_diagnostic()?;

    write_symbols(&symbols, &filters, config.sort_by_address, output).into_diagnostic()
}

/// Runs the subcommand listing the modules loaded in this process.
///
/// Every module is written as a `<base address>\t<name>` line.
pub fn evaluate_modules(mut output: impl Write) -> miette::Result<()> {
    let modules = symdump_loader::loaded_modules().into_diagnostic()?;

    for module in modules {
        writeln!(output, "{:#x}\t{}", module.base_addr, module.name).into_diagnostic()?;
    }

    Ok(())
}

fn write_symbols(
    symbols: &SymbolMap,
    filters: &[Regex],
    sort_by_address: bool,
    mut output: impl Write,
) -> std::io::Result<()> {
    let mut kept = symbols
        .iter()
        .filter(|(name, _)| filters.is_empty() || filters.iter().any(|f| f.is_match(name)))
        .collect::<Vec<_>>();

    if sort_by_address {
        kept.sort_by(|(name1, addr1), (name2, addr2)| {
            addr1.as_u64().cmp(&addr2.as_u64()).then(name1.cmp(name2))
        });
    }

    for (name, addr) in kept {
        writeln!(output, "{addr}\t{name}")?;
    }

    output.flush()
}
