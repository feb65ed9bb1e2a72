//! Error types for softblit.

use std::io;

/// Errors produced by the softblit engine.
///
/// Every variant except I/O maps to one of the recoverable failure families
/// the render facade absorbs: it logs the error and answers with a sentinel
/// value or a no-op instead of propagating to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SoftblitError {
    /// Image decode failure or missing file.
    #[error("load error: {0}")]
    Load(String),

    /// A `TextureId` that is not (or no longer) in the registry.
    #[error("invalid texture handle: {0}")]
    InvalidHandle(u64),

    /// A frame coordinate outside the configured spritesheet grid.
    #[error("invalid frame ({col}, {row}) for {cols}x{rows} grid")]
    InvalidFrame {
        col: u32,
        row: u32,
        cols: u32,
        rows: u32,
    },

    /// Non-positive size, or a frame grid that does not evenly divide the
    /// texture dimensions.
    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    /// Texture manifest could not be parsed.
    #[error("manifest error: {0}")]
    Manifest(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, SoftblitError>;
