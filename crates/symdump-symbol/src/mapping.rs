use std::ffi::c_void;
use std::fs::File;
use std::num::NonZeroUsize;
use std::path::Path;
use std::ptr::NonNull;

use nix::sys::mman::{MapFlags, ProtFlags, mmap, munmap};

use crate::error::Malformed;

/// Read-only memory mapping of a whole file.
///
/// The mapping is released when this value is dropped.
pub struct FileMapping {
    addr: NonNull<c_void>,
    len: NonZeroUsize,
}

impl FileMapping {
    /// Maps the file at the given path.
    pub fn open(path: &Path) -> crate::Result<Self> {
        let file = File::open(path).map_err(|e| crate::Error::File(path.to_path_buf(), e))?;

        let size = file
            .metadata()
            .map_err(|e| crate::Error::File(path.to_path_buf(), e))?
            .len();

        let len = usize::try_from(size).map_err(|_| {
            crate::Error::File(path.to_path_buf(), std::io::Error::other("file too large"))
        })?;

        let len = NonZeroUsize::new(len).ok_or(Malformed::Truncated(0))?;

        let addr = unsafe {
            mmap(
                None,
                len,
                ProtFlags::PROT_READ,
                MapFlags::MAP_PRIVATE,
                &file,
                0,
            )
        }
        .map_err(|e| crate::Error::Mmap(path.to_path_buf(), e))?;

        tracing::debug!(
            addr = format_args!("{:#x}", addr.as_ptr() as usize),
            len = len.get(),
            "mapped {}",
            path.display()
        );

        Ok(Self { addr, len })
    }

    /// Returns the mapped bytes.
    pub fn bytes(&self) -> &[u8] {
        // SAFETY: the region is mapped readable for `len` bytes until `self`
        // is dropped, and is never written through.
        unsafe { std::slice::from_raw_parts(self.addr.as_ptr().cast::<u8>(), self.len.get()) }
    }
}

impl Drop for FileMapping {
    fn drop(&mut self) {
        if let Err(e) = unsafe { munmap(self.addr, self.len.get()) } {
            tracing::warn!(error = %e, "munmap");
        }
    }
}
