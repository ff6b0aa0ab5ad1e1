use std::ffi::{CStr, CString};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr::NonNull;

use nix::libc::{self, RTLD_NOW, c_int, c_void, dl_phdr_info, size_t};

use crate::{LinkMap, LoadedImage};

/// Name given to the main program, which the dynamic linker reports without
/// a name.
const EXE_NAME: &str = "/proc/self/exe";

/// Loads the library at the given path and retrieves its load bias.
///
/// # Note
///
/// Loading the library runs its initialization routines. The library is
/// released before returning, so it is unloaded again unless something else
/// in the process holds a reference to it.
pub fn load_bias(path: &Path) -> crate::Result<LoadedImage> {
    let c_path = CString::new(path.as_os_str().as_bytes())?;

    let handle = DlHandle::open(path, &c_path)?;

    let lm = handle
        .link_map(path)?
        .ok_or_else(|| crate::Error::MissingLinkMap(path.to_path_buf()))?;

    let lm_path = Path::new(&lm.name);
    let lm_path = match lm_path.canonicalize() {
        Ok(p) => p,
        Err(_) => lm_path.to_path_buf(),
    };

    tracing::debug!(
        addr = format_args!("{:#x}", lm.base_addr),
        path = %lm_path.display(),
        "found link map"
    );

    Ok(LoadedImage {
        path: lm_path,
        load_bias: lm.base_addr,
    })
}

/// Returns the modules currently loaded in the process.
pub fn loaded_modules() -> crate::Result<Vec<LinkMap>> {
    unsafe extern "C" fn collect(info: *mut dl_phdr_info, _size: size_t, data: *mut c_void) -> c_int {
        // SAFETY: `data` is the `Vec` passed to `dl_iterate_phdr` below, and
        // `info` is valid for the duration of the callback.
        let (lms, info) = unsafe { (&mut *data.cast::<Vec<LinkMap>>(), &*info) };

        let name = if info.dlpi_name.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(info.dlpi_name) }
                .to_string_lossy()
                .into_owned()
        };

        lms.push(LinkMap {
            base_addr: u64::from(info.dlpi_addr),
            name: if name.is_empty() {
                EXE_NAME.to_owned()
            } else {
                name
            },
        });

        0
    }

    let mut lms: Vec<LinkMap> = Vec::new();

    unsafe { libc::dl_iterate_phdr(Some(collect), (&raw mut lms).cast()) };

    tracing::trace!(count = lms.len(), "fetched link maps");

    Ok(lms)
}

/// Finds the link map matching a path given to the dynamic linker.
///
/// Only used where the loader can't be asked for the link map of a handle.
/// A bare file name (no `/`) is resolved by the dynamic linker through its
/// search path, so only the file name of each link map is compared.
#[cfg_attr(target_env = "gnu", allow(dead_code))]
fn find_link_map<'a>(path: &Path, lms: &'a [LinkMap]) -> Option<&'a LinkMap> {
    if path.as_os_str().as_bytes().contains(&b'/') {
        let wanted = path.canonicalize().ok()?;

        lms.iter().find(|lm| {
            Path::new(&lm.name)
                .canonicalize()
                .is_ok_and(|p| p == wanted)
        })
    } else {
        lms.iter()
            .find(|lm| Path::new(&lm.name).file_name() == Some(path.as_os_str()))
    }
}

/// Reference to a library loaded with `dlopen`, released on drop.
struct DlHandle(NonNull<c_void>);

impl DlHandle {
    fn open(path: &Path, c_path: &CStr) -> crate::Result<Self> {
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), RTLD_NOW) };

        NonNull::new(handle)
            .map(Self)
            .ok_or_else(|| crate::Error::NotFound {
                path: path.to_path_buf(),
                reason: last_dl_error(),
            })
    }

    /// Returns the link map of the object this handle refers to.
    #[cfg(target_env = "gnu")]
    fn link_map(&self, _path: &Path) -> crate::Result<Option<LinkMap>> {
        let mut lm_ptr: *const RawLinkMap = std::ptr::null();

        let res = unsafe {
            libc::dlinfo(
                self.0.as_ptr(),
                libc::RTLD_DI_LINKMAP,
                (&raw mut lm_ptr).cast(),
            )
        };

        if res != 0 {
            tracing::debug!(error = last_dl_error(), "dlinfo");
            return Ok(None);
        }

        // SAFETY: the link map stays valid while the handle is held.
        let Some(raw) = (unsafe { lm_ptr.as_ref() }) else {
            return Ok(None);
        };

        let name = if raw.l_name.is_null() {
            String::new()
        } else {
            unsafe { CStr::from_ptr(raw.l_name) }
                .to_string_lossy()
                .into_owned()
        };

        Ok(Some(LinkMap {
            base_addr: raw.l_addr as u64,
            name: if name.is_empty() {
                EXE_NAME.to_owned()
            } else {
                name
            },
        }))
    }

    /// Returns the link map matching the path the handle was opened with.
    #[cfg(not(target_env = "gnu"))]
    fn link_map(&self, path: &Path) -> crate::Result<Option<LinkMap>> {
        let lms = loaded_modules()?;
        Ok(find_link_map(path, &lms).cloned())
    }
}

/// Leading fields of glibc's `struct link_map` (`link.h`).
#[cfg(target_env = "gnu")]
#[repr(C)]
struct RawLinkMap {
    l_addr: usize,
    l_name: *const libc::c_char,
}

impl Drop for DlHandle {
    fn drop(&mut self) {
        if unsafe { libc::dlclose(self.0.as_ptr()) } != 0 {
            tracing::warn!(error = last_dl_error(), "dlclose");
        }
    }
}

fn last_dl_error() -> String {
    let err = unsafe { libc::dlerror() };

    if err.is_null() {
        "unknown dynamic linker error".to_owned()
    } else {
        unsafe { CStr::from_ptr(err) }
            .to_string_lossy()
            .into_owned()
    }
}
