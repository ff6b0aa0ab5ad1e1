/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// File open/stat error.
    #[error("{0}: {1}")]
    File(std::path::PathBuf, std::io::Error),

    /// File mapping error.
    #[error("{0}: mmap failed: {1}")]
    Mmap(std::path::PathBuf, nix::Error),

    /// Structurally invalid or truncated ELF image.
    #[error("malformed ELF image: {0}")]
    Malformed(#[from] Malformed),

    /// Valid ELF image without `.symtab`/`.strtab` (e.g., stripped).
    #[error("missing .symtab or .strtab")]
    NoSymbols,

    /// Address format token is not exactly one character long.
    #[error("expected an address format of size 1, got {0:?}")]
    InvalidArgument(String),

    /// Address format token is not recognized.
    #[error("unknown address format {0:?}")]
    InvalidFormat(char),
}

/// Structural failure detected while walking an ELF image.
#[derive(thiserror::Error, Debug)]
pub enum Malformed {
    /// Image is shorter than its own headers claim.
    #[error("truncated image ({0} bytes)")]
    Truncated(usize),

    /// Image does not start with `\x7fELF`.
    #[error("bad ELF magic")]
    BadMagic,

    /// `e_ident[EI_CLASS]` is neither 32-bit nor 64-bit.
    #[error("elf class {0} not supported")]
    UnsupportedClass(u8),

    /// `e_ident[EI_DATA]` is neither little nor big endian.
    #[error("elf data encoding {0} not supported")]
    UnsupportedEncoding(u8),

    /// `e_shoff` is zero.
    #[error("missing section header table")]
    NoSectionHeaders,

    /// `e_shstrndx` is `SHN_UNDEF` or points outside the section header table.
    #[error("missing section name table")]
    NoSectionNameTable,

    /// Table entry size doesn't match its layout.
    #[error("bad {what} entry size: {size}")]
    EntrySize {
        /// Name of the table.
        what: &'static str,
        /// Entry size stored in the image.
        size: u64,
    },

    /// Byte range lies (partially) outside the image.
    #[error("{what} out of bounds: offset={offset:#x} len={len:#x}")]
    OutOfBounds {
        /// Name of the accessed structure.
        what: &'static str,
        /// Offset stored in the image.
        offset: u64,
        /// Length stored in the image.
        len: u64,
    },

    /// String offset outside its table, or string without NUL terminator.
    #[error("invalid string table offset: {0:#x}")]
    StringOutOfBounds(usize),

    /// `load_bias + st_value` overflows.
    #[error("symbol address overflow: {bias:#x} + {value:#x}")]
    AddressOverflow {
        /// Load bias of the image.
        bias: u64,
        /// Symbol value stored in the image.
        value: u64,
    },

    /// Error from the [goblin] crate.
    #[error(transparent)]
    Goblin(#[from] goblin::error::Error),
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
