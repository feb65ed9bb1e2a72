//! World-to-pixel viewport transform.

use softblit_types::{Rect, Result, SoftblitError};

/// The world-space rectangle currently mapped onto the framebuffer.
///
/// The scale factors are derived when the viewport is set and only affect
/// draws issued afterwards. Translating the viewport moves the origin and
/// keeps the scale.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    rect: Rect,
    scale_x: f32,
    scale_y: f32,
}

impl Viewport {
    /// A 1:1 viewport covering the framebuffer.
    pub fn identity(fb_width: u32, fb_height: u32) -> Self {
        Self {
            rect: Rect::from_size(0, 0, fb_width.max(1), fb_height.max(1)),
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }

    /// Map `rect` (world units) onto a `fb_width` x `fb_height` framebuffer.
    /// Degenerate rectangles are rejected.
    pub fn set(&mut self, rect: Rect, fb_width: u32, fb_height: u32) -> Result<()> {
        if rect.is_empty() {
            return Err(SoftblitError::InvalidDimension(
                "viewport rectangle has zero area".into(),
            ));
        }
        self.rect = rect;
        self.scale_x = fb_width as f32 / rect.width() as f32;
        self.scale_y = fb_height as f32 / rect.height() as f32;
        Ok(())
    }

    /// Move the viewport origin to `(x, y)`, preserving size and scale.
    pub fn translate_to(&mut self, x: i32, y: i32) {
        let w = self.rect.width();
        let h = self.rect.height();
        self.rect = Rect::from_size(x, y, w, h);
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn scale(&self) -> (f32, f32) {
        (self.scale_x, self.scale_y)
    }

    /// Convert a world-space position to framebuffer pixel coordinates.
    pub fn world_to_pixel(&self, x: f32, y: f32) -> (i32, i32) {
        (
            ((x - self.rect.left as f32) * self.scale_x).floor() as i32,
            ((y - self.rect.top as f32) * self.scale_y).floor() as i32,
        )
    }

    /// Convert a world-space extent to pixels.
    pub fn scale_extent(&self, w: f32, h: f32) -> (u32, u32) {
        (
            (w * self.scale_x).round().max(0.0) as u32,
            (h * self.scale_y).round().max(0.0) as u32,
        )
    }
}
