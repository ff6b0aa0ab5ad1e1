use std::num::ParseIntError;
use std::path::PathBuf;

/// The Symdump symbol dumper.
#[derive(clap::Parser)]
pub struct CliOpts {
    /// The command to run.
    #[clap(subcommand)]
    pub action: CliAction,
}

/// The command to run.
#[derive(clap::Subcommand)]
pub enum CliAction {
    /// Command to load a shared library and dump its symbols.
    Dump {
        /// Configuration for dumping symbols.
        #[clap(flatten)]
        dump_args: CliDumpArgs,

        /// Path of the shared library.
        ///
        /// A bare file name is looked up through the dynamic linker search
        /// path.
        library: PathBuf,
    },

    /// Command to dump the symbols of an ELF file without loading it.
    Extract {
        /// Configuration for dumping symbols.
        #[clap(flatten)]
        dump_args: CliDumpArgs,

        /// Load bias added to every symbol value (decimal or `0x`-prefixed).
        #[clap(short, long, value_name = "ADDR", value_parser = parse_addr)]
        bias: u64,

        /// Path of the ELF file.
        file: PathBuf,
    },

    /// Command to list the modules loaded in this process.
    Modules {
        /// Path to the optional destination of the dump.
        #[clap(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

/// Configuration for dumping symbols.
#[derive(clap::Parser)]
pub struct CliDumpArgs {
    /// Dump configuration (KDL format).
    ///
    /// If it ends with `.kdl`, it is treated as a path to a configuration
    /// file. Otherwise it is directly parsed as inline KDL-formatted
    /// configuration.
    #[clap(short, long, value_name = "CONTENT/PATH")]
    pub config: Option<String>,

    /// Address format token (overrides the configuration).
    #[clap(short = 'f', long, value_name = "TOKEN")]
    pub address_format: Option<String>,

    /// Path to the optional destination of the dump.
    #[clap(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

impl CliOpts {
    /// Parses the CLI from the command-line.
    ///
    /// # Warning
    ///
    /// Exits on error.
    pub fn parse_from_cmdline() -> Self {
        <Self as clap::Parser>::parse()
    }
}

/// Parses a decimal or `0x`-prefixed hexadecimal address.
pub fn parse_addr(s: &str) -> Result<u64, ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
}
