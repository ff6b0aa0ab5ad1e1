use std::ffi::OsStr;
use std::path::Path;

use miette::IntoDiagnostic;
use regex::Regex;

/// Address format used when none is configured.
pub const DEFAULT_ADDRESS_FORMAT: &str = "k";

/// Configuration of symbol dumping.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct DumpConfig {
    /// Address format token.
    #[knus(child, default = DEFAULT_ADDRESS_FORMAT.to_owned(), unwrap(argument))]
    pub address_format: String,

    /// Whether symbols are ordered by address instead of symbol table order.
    #[knus(child)]
    pub sort_by_address: bool,

    /// Filters selecting the symbols to dump.
    #[knus(children(name = "filter"))]
    pub filters: Vec<SymbolFilter>,
}

/// Regular expression matched against symbol names.
#[derive(Debug, PartialEq, knus::Decode)]
pub struct SymbolFilter {
    /// Pattern of the symbol names to keep.
    #[knus(argument)]
    pub pattern: String,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            address_format: DEFAULT_ADDRESS_FORMAT.to_owned(),
            sort_by_address: false,
            filters: Vec::new(),
        }
    }
}

impl DumpConfig {
    /// Parses the configuration from a `.kdl` file path or from inline KDL
    /// content.
    pub fn parse(config: &str) -> miette::Result<Self> {
        let path = Path::new(config);

        let config = if let Some((filename, "kdl")) = path
            .file_name()
            .and_then(OsStr::to_str)
            .zip(path.extension().and_then(OsStr::to_str))
        {
            let content = std::fs::read_to_string(path).into_diagnostic()?;
            knus::parse(filename, &content)?
        } else {
            knus::parse("<content>", config)?
        };

        Ok(config)
    }

    /// Compiles the symbol filters.
    pub fn compile_filters(&self) -> miette::Result<Vec<Regex>> {
        self.filters
            .iter()
            .map(|filter| Regex::new(&filter.pattern).into_diagnostic())
            .collect()
    }
}
