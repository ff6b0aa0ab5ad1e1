use std::path::Path;

use crate::{LinkMap, LoadedImage};

pub fn load_bias(_path: &Path) -> crate::Result<LoadedImage> {
    Err(crate::Error::Unsupported)
}

pub fn loaded_modules() -> crate::Result<Vec<LinkMap>> {
    Err(crate::Error::Unsupported)
}
