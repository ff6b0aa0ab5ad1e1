//! This crate asks the platform dynamic loader to load a shared library in
//! the current process, then reports where it was loaded.
//!
//! # Supported Platforms
//!
//! Only Linux provides loaded-module introspection (`dl_iterate_phdr`). On
//! other platforms every operation fails with [Error::Unsupported].
//!
//! # Example
//!
//! ```no_run
//! let image = symdump_loader::load_bias("libm.so.6").unwrap();
//!
//! println!("{} loaded at {:#x}", image.path.display(), image.load_bias);
//! ```

mod error;
mod sys;

use std::path::{Path, PathBuf};

pub use self::error::{Error, Result};

/// Shared library loaded in the current process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    /// Canonical path of the library file.
    pub path: PathBuf,

    /// Difference between the runtime addresses of the library and the
    /// addresses it was linked at.
    pub load_bias: u64,
}

/// Loaded shared object.
///
/// This struct should be used in the same context as a `link_map` from `glibc/elf/link.h`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub struct LinkMap {
    /// Base load address.
    pub base_addr: u64,

    /// File name of the loaded object, as reported by the dynamic linker.
    pub name: String,
}

/// Loads the shared library at the given path and returns its canonical path
/// and load bias.
///
/// The path is handed to the dynamic linker as is, so a bare file name is
/// looked up through the linker search path.
///
/// # Note
///
/// Loading a library runs its initialization routines.
#[tracing::instrument(name = "LoadBias", skip_all, fields(path = %path.as_ref().display()))]
pub fn load_bias(path: impl AsRef<Path>) -> Result<LoadedImage> {
    self::sys::load_bias(path.as_ref()).inspect_err(|e| tracing::debug!(error = %e))
}

/// Returns the modules currently loaded in the process, in load order.
pub fn loaded_modules() -> Result<Vec<LinkMap>> {
    self::sys::loaded_modules()
}
