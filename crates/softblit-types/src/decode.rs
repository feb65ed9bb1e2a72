//! Image-decode collaborator contract.
//!
//! The engine never decodes compressed image formats itself; a decoder is
//! injected into the render facade and turns a path into raw RGBA bytes plus
//! dimensions. `softblit-loader` ships the reference implementation.

use std::path::Path;

use crate::error::Result;

/// Decoded image data (RGBA pixels, 4 bytes per pixel).
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Turns a file path into decoded RGBA pixel data.
///
/// Implementations report failure through [`SoftblitError::Load`]; the facade
/// absorbs it into the sentinel texture id.
///
/// [`SoftblitError::Load`]: crate::error::SoftblitError::Load
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage>;
}
