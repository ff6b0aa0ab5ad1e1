use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::ptr::NonNull;

use nix::libc::{self, RTLD_NOW, c_void};

pub const LIBRARY_SOURCE: &str = r#"
int symdump_counter = 42;
static int symdump_local_counter = 1;

extern int puts(const char *);

int symdump_add(int a, int b) {
    return a + b + symdump_local_counter;
}

int symdump_hello(void) {
    return puts("hello");
}
"#;

/// Compiles [LIBRARY_SOURCE] as a shared library.
pub fn compile_library(out_dir: &Path, is_stripped: bool) -> PathBuf {
    let file_name = if is_stripped {
        "libsymdump_test_stripped.so"
    } else {
        "libsymdump_test.so"
    };

    compile_library_as(out_dir, file_name, None, is_stripped)
}

/// Compiles [LIBRARY_SOURCE] as a shared library with the given file name,
/// and optionally the given `DT_SONAME`.
pub fn compile_library_as(
    out_dir: &Path,
    file_name: &str,
    soname: Option<&str>,
    is_stripped: bool,
) -> PathBuf {
    let src = out_dir.join("symdump_test.c");
    std::fs::write(&src, LIBRARY_SOURCE).expect("write source");

    let out_file = out_dir.join(file_name);

    let mut gcc = Command::new("gcc");
    gcc.arg("-shared")
        .arg("-fPIC")
        .arg(&src)
        .arg("-o")
        .arg(&out_file);

    if let Some(soname) = soname {
        gcc.arg(format!("-Wl,-soname,{soname}"));
    }

    if is_stripped {
        gcc.arg("-s");
    }

    println!("running: {gcc:?}");

    let gcc = gcc.output().expect("gcc");

    if !gcc.status.success() {
        let msg = String::from_utf8_lossy(&gcc.stderr);
        panic!("{msg}");
    }

    out_file
}

/// Library kept loaded for the lifetime of this value.
pub struct Library(NonNull<c_void>);

impl Library {
    pub fn open(path: &Path) -> Self {
        let c_path = CString::new(path.as_os_str().as_bytes()).unwrap();
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), RTLD_NOW) };
        Self(NonNull::new(handle).expect("dlopen"))
    }

    pub fn addr_of(&self, symbol: &str) -> u64 {
        let c_symbol = CString::new(symbol).unwrap();
        let addr = unsafe { libc::dlsym(self.0.as_ptr(), c_symbol.as_ptr()) };
        assert!(!addr.is_null(), "dlsym({symbol})");
        addr as u64
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        unsafe { libc::dlclose(self.0.as_ptr()) };
    }
}
