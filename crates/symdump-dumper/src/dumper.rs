use std::path::Path;

use symdump_symbol::{AddressFormat, SymbolMap};

/// Symbol dumper for shared libraries.
///
/// The address format is part of the dumper, so concurrent dumps with
/// different formats don't interfere with each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolDumper {
    address_format: AddressFormat,
}

impl SymbolDumper {
    /// Creates a dumper rendering addresses as unsigned pointer-width
    /// integers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dumper with the given address format.
    pub fn with_address_format(address_format: AddressFormat) -> Self {
        Self { address_format }
    }

    /// Returns the current address format.
    pub fn address_format(&self) -> AddressFormat {
        self.address_format
    }

    /// Sets the address format from its single-character token.
    ///
    /// On error, the current address format is left unchanged.
    pub fn set_address_format(&mut self, token: &str) -> crate::Result<()> {
        self.address_format = token.parse()?;
        Ok(())
    }

    /// Loads the shared library at the given path, then returns its defined
    /// function and object symbols along with their runtime address.
    ///
    /// # Note
    ///
    /// Loading a library runs its initialization routines.
    #[tracing::instrument(name = "DumpSymbols", skip_all, fields(path = %path.as_ref().display()))]
    pub fn dump_symbols(&self, path: impl AsRef<Path>) -> crate::Result<SymbolMap> {
        let image = symdump_loader::load_bias(path)?;
        self.dump_symbols_at(&image.path, image.load_bias)
    }

    /// Returns the defined function and object symbols of the ELF file at the
    /// given path, assuming it is loaded with the given load bias.
    ///
    /// The library is not loaded.
    pub fn dump_symbols_at(
        &self,
        path: impl AsRef<Path>,
        load_bias: u64,
    ) -> crate::Result<SymbolMap> {
        symdump_symbol::extract_symbols(path, load_bias, self.address_format).map_err(Into::into)
    }

    /// Same as [dump_symbols](Self::dump_symbols), except that load and parse
    /// failures result in `None`.
    ///
    /// An error is only returned if symbol dumping isn't supported on this
    /// platform.
    pub fn dump_symbols_lossy(&self, path: impl AsRef<Path>) -> crate::Result<Option<SymbolMap>> {
        match self.dump_symbols(path) {
            Ok(symbols) => Ok(Some(symbols)),
            Err(e) if e.kind() == crate::ErrorKind::PlatformUnsupported => Err(e),
            Err(e) => {
                tracing::debug!(error = %e, "no symbols dumped");
                Ok(None)
            }
        }
    }
}
