//! Crate implementing the CLI commands.

mod cli;
mod config;
mod dump;

pub use self::cli::{CliAction, CliDumpArgs, CliOpts, parse_addr};
pub use self::config::{DEFAULT_ADDRESS_FORMAT, DumpConfig, SymbolFilter};
pub use self::dump::{SymbolSource, evaluate_dump, evaluate_modules};
