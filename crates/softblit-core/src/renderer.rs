//! The texture registry and render facade.
//!
//! `Renderer` is the single owner of every texture buffer and the only public
//! entry point into the compositing core. Every recoverable failure is
//! absorbed here: the call logs one line and answers with a sentinel id or a
//! no-op, so the surrounding engine never unwinds over a bad handle, a
//! missing file, or an out-of-range frame.

use std::collections::HashMap;
use std::path::Path;

use softblit_types::{FrameSink, ImageDecoder, Point, Rect};

use crate::blit::{self, BlendMode};
use crate::texture::Texture;
use crate::viewport::Viewport;

/// Opaque handle to a texture in the registry.
///
/// `0` is the reserved invalid sentinel; handles are allocated from a
/// monotonically increasing counter and never reused, so a stale handle
/// stays detectably invalid after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

impl TextureId {
    pub const INVALID: Self = Self(0);

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

/// Texture registry plus render facade.
pub struct Renderer {
    textures: HashMap<u64, Texture>,
    next_id: u64,
    viewport: Viewport,
    sink: Box<dyn FrameSink>,
    decoder: Box<dyn ImageDecoder>,
}

impl Renderer {
    /// Create a renderer compositing into `sink`, decoding image files
    /// through `decoder`. The viewport starts at a 1:1 mapping of the sink.
    pub fn new(sink: Box<dyn FrameSink>, decoder: Box<dyn ImageDecoder>) -> Self {
        let viewport = Viewport::identity(sink.width(), sink.height());
        Self {
            textures: HashMap::new(),
            next_id: 1,
            viewport,
            sink,
            decoder,
        }
    }

    /// The destination framebuffer.
    pub fn frame(&self) -> &dyn FrameSink {
        self.sink.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Look up a texture by handle (primarily for tests and tooling).
    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id.0)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    fn insert(&mut self, texture: Texture) -> TextureId {
        let id = self.next_id;
        self.next_id += 1;
        self.textures.insert(id, texture);
        TextureId(id)
    }

    // -----------------------------------------------------------------------
    // Texture lifecycle
    // -----------------------------------------------------------------------

    /// Load an image file as a texture. Returns [`TextureId::INVALID`] and
    /// logs one error line if decoding fails.
    pub fn load_texture(&mut self, path: &Path) -> TextureId {
        let loaded = self
            .decoder
            .decode(path)
            .and_then(Texture::from_decoded);
        match loaded {
            Ok(texture) => self.insert(texture),
            Err(e) => {
                log::error!("failed to load texture {}: {e}", path.display());
                TextureId::INVALID
            },
        }
    }

    /// Allocate a blank (transparent black) texture. Returns
    /// [`TextureId::INVALID`] and logs if a dimension is zero.
    pub fn create_blank_texture(&mut self, width: u32, height: u32) -> TextureId {
        match Texture::blank(width, height) {
            Ok(texture) => self.insert(texture),
            Err(e) => {
                log::error!("failed to create blank texture: {e}");
                TextureId::INVALID
            },
        }
    }

    /// Permanently crop `right` columns and `bottom` rows off a texture.
    pub fn crop_texture(&mut self, id: TextureId, right: u32, bottom: u32) {
        match self.textures.get_mut(&id.0) {
            Some(texture) => texture.crop(right, bottom),
            None => log::warn!("crop_texture: unknown handle {}", id.0),
        }
    }

    /// Configure the spritesheet grid; zero in either dimension disables it.
    /// A grid that does not evenly divide the texture is rejected and the
    /// prior grid preserved.
    pub fn set_frame_dimensions(&mut self, id: TextureId, cols: u32, rows: u32) {
        match self.textures.get_mut(&id.0) {
            Some(texture) => {
                if let Err(e) = texture.set_frame_grid(cols, rows) {
                    log::error!("set_frame_dimensions: {e}");
                }
            },
            None => log::warn!("set_frame_dimensions: unknown handle {}", id.0),
        }
    }

    /// Rescale a texture. With `pixel_units` the size is taken verbatim;
    /// otherwise it is a world-space extent converted through the viewport
    /// scale first.
    pub fn scale_texture(&mut self, id: TextureId, width: f32, height: f32, pixel_units: bool) {
        let (pw, ph) = if pixel_units {
            (width.round().max(0.0) as u32, height.round().max(0.0) as u32)
        } else {
            self.viewport.scale_extent(width, height)
        };
        match self.textures.get_mut(&id.0) {
            Some(texture) => {
                if let Err(e) = texture.scale_to(pw, ph) {
                    log::error!("scale_texture: {e}");
                }
            },
            None => log::warn!("scale_texture: unknown handle {}", id.0),
        }
    }

    /// Remove a texture, releasing its buffer. Unknown handles are logged
    /// and ignored.
    pub fn remove_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id.0).is_none() {
            log::warn!("remove_texture: unknown handle {}", id.0);
        }
    }

    /// Drop every texture. All previously issued handles become invalid.
    pub fn clear_texture_data(&mut self) {
        self.textures.clear();
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    /// Map a world-space rectangle onto the framebuffer. Degenerate
    /// rectangles are rejected and the prior viewport preserved.
    pub fn set_viewport(&mut self, rect: Rect) {
        let (fw, fh) = (self.sink.width(), self.sink.height());
        if let Err(e) = self.viewport.set(rect, fw, fh) {
            log::error!("set_viewport: {e}");
        }
    }

    /// Move the viewport origin, preserving its size and scale.
    pub fn translate_viewport_to(&mut self, point: Point) {
        self.viewport.translate_to(point.x, point.y);
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Draw a texture (or one spritesheet frame of it) onto the screen
    /// framebuffer at a world-space position. Off-screen draws are silent
    /// no-ops; invalid handles and frames are logged and skipped.
    pub fn draw_to_screen(
        &mut self,
        x: f32,
        y: f32,
        id: TextureId,
        blend: BlendMode,
        frame: Option<(u32, u32)>,
    ) {
        let Some(texture) = self.textures.get(&id.0) else {
            log::warn!("draw_to_screen: unknown handle {}", id.0);
            return;
        };
        let (px, py) = self.viewport.world_to_pixel(x, y);
        let (fw, fh) = (self.sink.width(), self.sink.height());
        let bounds = Rect::from_size(0, 0, fw, fh);
        if let Err(e) = blit::blit(
            texture,
            frame,
            self.sink.pixels_mut(),
            fw,
            fh,
            &bounds,
            Point::new(px, py),
            blend,
        ) {
            log::error!("draw_to_screen: {e}");
        }
    }

    /// Draw one texture into another. The target texture's full extent is
    /// the writable region; the position is scaled by the viewport factor
    /// but not offset by its origin (texture-local space, not world space).
    ///
    /// Drawing a texture into itself is rejected: source and destination
    /// buffers may overlap, which has no defined result.
    pub fn draw_to_texture(
        &mut self,
        x: f32,
        y: f32,
        src: TextureId,
        dst: TextureId,
        blend: BlendMode,
        frame: Option<(u32, u32)>,
    ) {
        if src == dst {
            log::warn!("draw_to_texture: source and target are the same handle {}", src.0);
            return;
        }
        if !self.textures.contains_key(&src.0) {
            log::warn!("draw_to_texture: unknown source handle {}", src.0);
            return;
        }
        // Take the target out of the map so the source can be borrowed from
        // it at the same time; the ids are distinct, so it always goes back.
        let Some(mut target) = self.textures.remove(&dst.0) else {
            log::warn!("draw_to_texture: unknown target handle {}", dst.0);
            return;
        };

        let (sx, sy) = self.viewport.scale();
        let px = (x * sx).floor() as i32;
        let py = (y * sy).floor() as i32;
        let (tw, th) = (target.width(), target.height());
        let bounds = Rect::from_size(0, 0, tw, th);
        let source = &self.textures[&src.0];
        if let Err(e) = blit::blit(
            source,
            frame,
            target.pixels_mut(),
            tw,
            th,
            &bounds,
            Point::new(px, py),
            blend,
        ) {
            log::error!("draw_to_texture: {e}");
        }
        self.textures.insert(dst.0, target);
    }
}
