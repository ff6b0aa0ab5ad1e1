mod utils;

use symdump_dumper::{Address, AddressFormat, ErrorKind, SymbolDumper};
use test_log::test;

use self::utils::{Library, compile_library, compile_library_as};

#[test]
fn dump_matches_dynamic_linker() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = compile_library(out_dir.path(), false);

    // keep the library at the same address while dumping
    let library = Library::open(&path);

    let dumper = SymbolDumper::with_address_format(AddressFormat::UnsignedLongLong);
    let symbols = dumper.dump_symbols(&path).unwrap();

    for name in ["symdump_add", "symdump_hello", "symdump_counter"] {
        assert_eq!(
            symbols.get(name),
            Some(&Address::Unsigned(library.addr_of(name))),
            "{name}"
        );
    }

    // local definitions are kept, undefined references are not
    assert!(symbols.contains_key("symdump_local_counter"));
    assert!(!symbols.contains_key("puts"));
}

#[cfg(target_env = "gnu")]
#[test]
fn dump_by_soname() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = compile_library_as(
        out_dir.path(),
        "libsymdump_soname_real.so",
        Some("libsymdump_soname_alias.so"),
        false,
    );

    // once loaded, the dynamic linker also resolves the library by its soname
    let library = Library::open(&path);

    let image = symdump_loader::load_bias("libsymdump_soname_alias.so").unwrap();
    assert_eq!(image.path, path.canonicalize().unwrap());

    let dumper = SymbolDumper::with_address_format(AddressFormat::UnsignedLongLong);
    let symbols = dumper.dump_symbols("libsymdump_soname_alias.so").unwrap();

    for name in ["symdump_add", "symdump_counter"] {
        assert_eq!(
            symbols.get(name),
            Some(&Address::Unsigned(library.addr_of(name))),
            "{name}"
        );
    }
}

#[test]
fn dump_through_symlink() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = compile_library_as(out_dir.path(), "libsymdump_versioned.so.1", None, false);

    let link = out_dir.path().join("libsymdump_versioned.so");
    std::os::unix::fs::symlink(&path, &link).unwrap();

    let library = Library::open(&link);

    let image = symdump_loader::load_bias(&link).unwrap();
    assert_eq!(image.path, path.canonicalize().unwrap());

    let dumper = SymbolDumper::with_address_format(AddressFormat::UnsignedLongLong);
    let symbols = dumper.dump_symbols(&link).unwrap();

    assert_eq!(
        symbols.get("symdump_add"),
        Some(&Address::Unsigned(library.addr_of("symdump_add")))
    );
}

#[test]
fn dump_is_idempotent() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = compile_library(out_dir.path(), false);
    let _library = Library::open(&path);

    let dumper = SymbolDumper::new();

    assert_eq!(
        dumper.dump_symbols(&path).unwrap(),
        dumper.dump_symbols(&path).unwrap()
    );
}

#[test]
fn dump_at_explicit_bias() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = compile_library(out_dir.path(), false);

    let dumper = SymbolDumper::with_address_format(AddressFormat::UnsignedLongLong);

    let linked = dumper.dump_symbols_at(&path, 0).unwrap();
    let biased = dumper.dump_symbols_at(&path, 0x7f00_0000_0000).unwrap();

    assert_eq!(linked.len(), biased.len());

    for (name, addr) in &linked {
        assert_eq!(
            biased[name].as_u64(),
            addr.as_u64() + 0x7f00_0000_0000,
            "{name}"
        );
    }
}

#[test]
fn stripped_library() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = compile_library(out_dir.path(), true);

    let dumper = SymbolDumper::new();

    let err = dumper.dump_symbols(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoSymbolTable);

    assert_eq!(dumper.dump_symbols_lossy(&path).unwrap(), None);
}

#[test]
fn missing_library() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = out_dir.path().join("libmissing.so");

    let dumper = SymbolDumper::new();

    let err = dumper.dump_symbols(&path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LoadFailure);

    assert_eq!(dumper.dump_symbols_lossy(&path).unwrap(), None);
}

#[test]
fn missing_file_at_explicit_bias() {
    let out_dir = tempfile::tempdir().unwrap();
    let path = out_dir.path().join("libmissing.so");

    let err = SymbolDumper::new().dump_symbols_at(&path, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IoFailure);
}
