//! This crate dumps the symbols of a shared library, as seen from the current
//! process.
//!
//! The library is first loaded by the platform dynamic loader (see
//! `symdump-loader`) to learn where it lives in memory. Its file is then
//! parsed (see `symdump-symbol`) to collect every defined function and object
//! symbol, each mapped to its runtime address.
//!
//! # Example
//!
//! ```no_run
//! use symdump_dumper::{ErrorKind, SymbolDumper};
//!
//! let mut dumper = SymbolDumper::new();
//! dumper.set_address_format("K").unwrap();
//!
//! match dumper.dump_symbols("libm.so.6") {
//!     Ok(symbols) => {
//!         for (name, addr) in &symbols {
//!             println!("{addr} {name}");
//!         }
//!     }
//!     Err(e) if e.kind() == ErrorKind::NoSymbolTable => println!("stripped library"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

mod dumper;
mod error;

pub use symdump_symbol::{Address, AddressFormat, SymbolMap};

pub use self::dumper::SymbolDumper;
pub use self::error::{Error, ErrorKind, Result};
