//! This crate extracts the symbols of an ELF image (32-bit or 64-bit, little
//! or big endian) from its `.symtab`/`.strtab` sections.
//!
//! The image is memory-mapped read-only and every structure read from it is
//! bounds-checked, so that a truncated or corrupted file results in an
//! [Error::Malformed] rather than an out-of-bounds access.
//!
//! # Example
//!
//! ```no_run
//! use symdump_symbol::AddressFormat;
//!
//! let symbols = symdump_symbol::extract_symbols(
//!     "/usr/lib/libfoo.so",
//!     0x7f0000000000,
//!     AddressFormat::default(),
//! )
//! .unwrap();
//!
//! for (name, addr) in &symbols {
//!     println!("{addr} {name}");
//! }
//! ```

/// Module handling the ELF format.
pub mod elf;

mod error;
mod format;
mod mapping;

/// Module providing bounds-checked access to raw image bytes.
pub mod view;

pub use self::elf::{
    SymbolMap, SymbolRecord, SymbolTable, extract_symbols, extract_symbols_from_bytes,
};
pub use self::error::{Error, Malformed, Result};
pub use self::format::{Address, AddressFormat};
pub use self::mapping::FileMapping;
