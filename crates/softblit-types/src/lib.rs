//! Foundation types for softblit.
//!
//! This crate contains the types shared by all softblit crates: rectangle
//! geometry, colors, error types, and the collaborator traits (`ImageDecoder`,
//! `FrameSink`) the compositing core is written against.

pub mod color;
pub mod decode;
pub mod error;
pub mod rect;
pub mod sink;

pub use color::Color;
pub use decode::{DecodedImage, ImageDecoder};
pub use error::{Result, SoftblitError};
pub use rect::{Point, Rect};
pub use sink::{Framebuffer, FrameSink};
