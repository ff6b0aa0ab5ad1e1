/// Error type of this crate.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The platform loader failed to load the library.
    #[error("{path}: {reason}")]
    NotFound {
        /// Requested path.
        path: std::path::PathBuf,
        /// Reason reported by the platform loader.
        reason: String,
    },

    /// The library was loaded but is absent from the loaded-module list.
    #[error("missing link map for {0}")]
    MissingLinkMap(std::path::PathBuf),

    /// The requested path contains a NUL byte.
    #[error(transparent)]
    InteriorNulByte(#[from] std::ffi::NulError),

    /// Loaded-module introspection is not available on this platform.
    #[error("loaded module introspection is not supported on this platform")]
    Unsupported,
}

/// Result type of this crate.
pub type Result<T> = core::result::Result<T, Error>;
