//! Destination framebuffer abstraction.
//!
//! The platform owns the buffer the engine composites into (a window surface,
//! a shared-memory plane, a capture target). `FrameSink` is the handle the
//! render facade draws through, so the blit engine carries no platform
//! dependency. [`Framebuffer`] is the owned in-memory implementation used by
//! tests and the demo app.

/// A writable RGBA pixel surface.
///
/// Contract: `pixels()` and `pixels_mut()` return exactly
/// `width * height * 4` bytes, row-major, 4 bytes per pixel. A sink that
/// violates this is a caller bug and trips an assertion inside the blit
/// engine.
pub trait FrameSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn pixels(&self) -> &[u8];
    fn pixels_mut(&mut self) -> &mut [u8];
}

use crate::color::Color;

/// A fully in-memory RGBA framebuffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Create a zero-filled (transparent black) framebuffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Fill every pixel with one color.
    pub fn clear(&mut self, color: Color) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = color.a;
        }
    }
}

impl FrameSink for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}
