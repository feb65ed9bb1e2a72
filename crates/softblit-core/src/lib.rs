//! Software 2D texture-compositing core.
//!
//! Owns every texture's backing buffer, keyed by opaque [`TextureId`], and
//! composites them into an injected [`FrameSink`] with clipping, optional
//! alpha blending, spritesheet frame selection, permanent cropping, and
//! bilinear rescaling. Single-threaded by design: every operation runs to
//! completion on the owning thread during the render step.
//!
//! [`FrameSink`]: softblit_types::FrameSink

pub mod blit;
pub mod manifest;
pub mod renderer;
pub mod scale;
pub mod texture;
pub mod viewport;

pub use blit::BlendMode;
pub use manifest::TextureManifest;
pub use renderer::{Renderer, TextureId};
pub use texture::Texture;
pub use viewport::Viewport;
