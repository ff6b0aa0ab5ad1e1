use std::ops::Range;

use scroll::Pread;
use scroll::ctx::TryFromCtx;

use crate::error::Malformed;

/// Bounds-checked view over the raw bytes of an ELF image.
///
/// Every access is validated against the length of the underlying buffer,
/// so a corrupted or truncated image yields [Malformed] instead of reading
/// out of bounds.
#[derive(Clone, Copy)]
pub struct ImageView<'a> {
    bytes: &'a [u8],
}

impl<'a> ImageView<'a> {
    /// Creates a view over the given bytes.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Returns the whole underlying buffer.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Returns the length of the image.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the image is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads a structure at the given offset.
    pub fn read<T, C, E>(&self, what: &'static str, offset: u64, ctx: C) -> Result<T, Malformed>
    where
        C: Copy,
        E: From<scroll::Error>,
        T: TryFromCtx<'a, C, Error = E>,
    {
        let start = self.checked_range(what, offset, 0)?.start;

        self.bytes
            .pread_with::<T>(start, ctx)
            .map_err(|_| Malformed::OutOfBounds {
                what,
                offset,
                len: self.len() as u64 - offset,
            })
    }

    /// Validates that `offset..offset+len` lies within the image.
    pub fn checked_range(
        &self,
        what: &'static str,
        offset: u64,
        len: u64,
    ) -> Result<Range<usize>, Malformed> {
        let out_of_bounds = || Malformed::OutOfBounds { what, offset, len };

        let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;

        if end > self.len() as u64 {
            return Err(out_of_bounds());
        }

        let start = usize::try_from(offset).map_err(|_| out_of_bounds())?;
        let end = usize::try_from(end).map_err(|_| out_of_bounds())?;

        Ok(start..end)
    }

    /// Borrows the byte range `offset..offset+len`.
    pub fn slice(&self, what: &'static str, offset: u64, len: u64) -> Result<&'a [u8], Malformed> {
        let range = self.checked_range(what, offset, len)?;
        Ok(&self.bytes[range])
    }
}

/// String table borrowed from an [ImageView].
#[derive(Clone, Copy)]
pub struct StringTable<'a> {
    bytes: &'a [u8],
}

impl<'a> StringTable<'a> {
    /// Borrows the string table stored at `offset..offset+len` in the image.
    pub fn new(
        view: &ImageView<'a>,
        what: &'static str,
        offset: u64,
        len: u64,
    ) -> Result<Self, Malformed> {
        view.slice(what, offset, len).map(|bytes| Self { bytes })
    }

    /// Returns the NUL-terminated byte string starting at `offset`.
    ///
    /// The string must be terminated within the table.
    pub fn get_bytes(&self, offset: usize) -> Result<&'a [u8], Malformed> {
        let tail = self
            .bytes
            .get(offset..)
            .ok_or(Malformed::StringOutOfBounds(offset))?;

        let len = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(Malformed::StringOutOfBounds(offset))?;

        Ok(&tail[..len])
    }
}
