/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Error from the [symdump_loader] crate.
    #[error(transparent)]
    Loader(#[from] symdump_loader::Error),

    /// Error from the [symdump_symbol] crate.
    #[error(transparent)]
    Symbol(#[from] symdump_symbol::Error),
}

/// Category of an [Error].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Symbol dumping is not available on this platform.
    PlatformUnsupported,

    /// The library could not be loaded or found.
    LoadFailure,

    /// The library file could not be opened, stat'ed or mapped.
    IoFailure,

    /// The library file is not a well-formed ELF image.
    MalformedImage,

    /// The library is a well-formed ELF image without symbol table.
    NoSymbolTable,

    /// A configuration value was rejected.
    InvalidArgument,
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        use symdump_loader::Error as LoaderError;
        use symdump_symbol::Error as SymbolError;

        match self {
            Self::Loader(LoaderError::Unsupported) => ErrorKind::PlatformUnsupported,
            Self::Loader(
                LoaderError::NotFound { .. }
                | LoaderError::MissingLinkMap(_)
                | LoaderError::InteriorNulByte(_),
            ) => ErrorKind::LoadFailure,
            Self::Symbol(SymbolError::File(..) | SymbolError::Mmap(..)) => ErrorKind::IoFailure,
            Self::Symbol(SymbolError::Malformed(_)) => ErrorKind::MalformedImage,
            Self::Symbol(SymbolError::NoSymbols) => ErrorKind::NoSymbolTable,
            Self::Symbol(SymbolError::InvalidArgument(_) | SymbolError::InvalidFormat(_)) => {
                ErrorKind::InvalidArgument
            }
        }
    }
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
