//! The texture resource: an owned RGBA buffer plus an optional frame grid.

use softblit_types::{DecodedImage, Rect, Result, SoftblitError};

use crate::scale;

/// Spritesheet subdivision of a texture into equally sized cells.
///
/// Only ever constructed with dimensions that evenly divide the texture, so
/// `cell_w * cols == texture width` and `cell_h * rows == texture height`
/// hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGrid {
    pub cols: u32,
    pub rows: u32,
    pub cell_w: u32,
    pub cell_h: u32,
}

impl FrameGrid {
    fn derive(width: u32, height: u32, cols: u32, rows: u32) -> Result<Self> {
        if width % cols != 0 || height % rows != 0 {
            return Err(SoftblitError::InvalidDimension(format!(
                "{cols}x{rows} grid does not evenly divide a {width}x{height} texture"
            )));
        }
        Ok(Self {
            cols,
            rows,
            cell_w: width / cols,
            cell_h: height / rows,
        })
    }
}

/// A rectangular grid of RGBA pixels usable as a draw source or destination.
///
/// The backing buffer is always exactly `width * height * 4` bytes. Crop and
/// scale replace the buffer destructively; neither ever mutates it in place
/// while reading.
#[derive(Debug, Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    grid: Option<FrameGrid>,
}

impl Texture {
    /// Allocate a zero-filled (transparent black) texture.
    pub fn blank(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SoftblitError::InvalidDimension(format!(
                "blank texture must be at least 1x1, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
            grid: None,
        })
    }

    /// Wrap decoded image data. The frame grid starts disabled.
    pub fn from_decoded(image: DecodedImage) -> Result<Self> {
        if image.width == 0 || image.height == 0 {
            return Err(SoftblitError::InvalidDimension(format!(
                "decoded image is {}x{}",
                image.width, image.height
            )));
        }
        // usize arithmetic: the u32 product wraps for dimensions past 32k.
        let expected = image.width as usize * image.height as usize * 4;
        if image.pixels.len() != expected {
            return Err(SoftblitError::Load(format!(
                "pixel data size mismatch: expected {expected}, got {}",
                image.pixels.len()
            )));
        }
        Ok(Self {
            width: image.width,
            height: image.height,
            pixels: image.pixels,
            grid: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn grid(&self) -> Option<&FrameGrid> {
        self.grid.as_ref()
    }

    /// Full extent in texture-local coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width, self.height)
    }

    /// Configure the spritesheet grid. A zero in either dimension disables
    /// the grid (the whole texture is one frame). A grid that does not
    /// evenly divide the texture is rejected and the prior grid is kept.
    pub fn set_frame_grid(&mut self, cols: u32, rows: u32) -> Result<()> {
        if cols == 0 || rows == 0 {
            self.grid = None;
            return Ok(());
        }
        self.grid = Some(FrameGrid::derive(self.width, self.height, cols, rows)?);
        Ok(())
    }

    /// Permanently remove `right` columns from the right edge and `bottom`
    /// rows from the bottom edge. The retained size is floored at 1x1.
    ///
    /// A surviving frame grid is re-derived against the new dimensions; if it
    /// no longer divides evenly it is dropped with a warning -- the crop
    /// itself always succeeds.
    pub fn crop(&mut self, right: u32, bottom: u32) {
        let new_w = self.width.saturating_sub(right).max(1);
        let new_h = self.height.saturating_sub(bottom).max(1);
        if new_w == self.width && new_h == self.height {
            return;
        }

        let mut retained = vec![0u8; new_w as usize * new_h as usize * 4];
        let src_stride = self.width as usize * 4;
        let dst_stride = new_w as usize * 4;
        for row in 0..new_h as usize {
            let src = row * src_stride;
            let dst = row * dst_stride;
            retained[dst..dst + dst_stride].copy_from_slice(&self.pixels[src..src + dst_stride]);
        }

        self.width = new_w;
        self.height = new_h;
        self.pixels = retained;

        if let Some(grid) = self.grid
            && let Err(e) = self.set_frame_grid(grid.cols, grid.rows)
        {
            log::warn!("crop dropped frame grid: {e}");
            self.grid = None;
        }
    }

    /// Rescale the backing buffer to `width` x `height` with bilinear
    /// interpolation. Equal dimensions are a no-op.
    pub fn scale_to(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SoftblitError::InvalidDimension(format!(
                "scale target must be at least 1x1, got {width}x{height}"
            )));
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        self.pixels = scale::bilinear(&self.pixels, self.width, self.height, width, height);
        self.width = width;
        self.height = height;
        Ok(())
    }
}
