//! The blit engine: clipped opaque and alpha-blended compositing.
//!
//! All addressing is explicit index arithmetic into flat RGBA buffers
//! (`index = (y * stride + x) * 4`); source and destination strides differ
//! and advance independently.

use softblit_types::{Point, Rect, Result, SoftblitError};

use crate::texture::Texture;

/// How source pixels combine with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Bulk row copy, no per-pixel branching.
    #[default]
    Opaque,
    /// Source-over compositing driven by the source alpha channel.
    Transparent,
}

/// Composite one frame of `src` into `target` at `dest`, clipped to
/// `target_rect`.
///
/// `target` is a flat RGBA buffer of `target_w` x `target_h` pixels;
/// `target_rect` restricts which part of it may be written (it is further
/// clipped to the buffer bounds). `frame` selects a spritesheet cell when a
/// grid is active and defaults to `(0, 0)`; without a grid the full texture
/// extent is drawn and `frame` is ignored.
///
/// Returns `Ok(true)` if any pixel was written, `Ok(false)` for a fully
/// clipped (off-screen) draw. A frame coordinate outside the grid aborts the
/// entire call with [`SoftblitError::InvalidFrame`] -- no partial draw.
///
/// # Panics
///
/// Panics if `target.len() != target_w * target_h * 4`; a malformed target
/// buffer is a caller bug, not a recoverable condition.
#[allow(clippy::too_many_arguments)]
pub fn blit(
    src: &Texture,
    frame: Option<(u32, u32)>,
    target: &mut [u8],
    target_w: u32,
    target_h: u32,
    target_rect: &Rect,
    dest: Point,
    mode: BlendMode,
) -> Result<bool> {
    assert_eq!(
        target.len(),
        target_w as usize * target_h as usize * 4,
        "target buffer size does not match {target_w}x{target_h}"
    );

    // Frame selection. Out-of-range coordinates abort before any write.
    let (frame_col, frame_row) = frame.unwrap_or((0, 0));
    let (cell_w, cell_h, src_x0, src_y0) = match src.grid() {
        Some(grid) => {
            if frame_col >= grid.cols || frame_row >= grid.rows {
                return Err(SoftblitError::InvalidFrame {
                    col: frame_col,
                    row: frame_row,
                    cols: grid.cols,
                    rows: grid.rows,
                });
            }
            (
                grid.cell_w,
                grid.cell_h,
                frame_col * grid.cell_w,
                frame_row * grid.cell_h,
            )
        },
        None => (src.width(), src.height(), 0, 0),
    };

    // Destination extent, clipped to the writable region.
    let mut clip = *target_rect;
    clip.clip_to(&Rect::from_size(0, 0, target_w, target_h));
    let mut dst_rect = Rect::from_size(dest.x, dest.y, cell_w, cell_h);
    if !dst_rect.intersects(&clip) {
        return Ok(false);
    }
    dst_rect.clip_to(&clip);

    // Translate the clipped rect back into source-local coordinates.
    let mut src_rect = dst_rect;
    src_rect.translate(src_x0 as i32 - dest.x, src_y0 as i32 - dest.y);

    match mode {
        BlendMode::Opaque => blit_opaque(src, &src_rect, target, target_w, &dst_rect),
        BlendMode::Transparent => blit_blended(src, &src_rect, target, target_w, &dst_rect),
    }
    Ok(true)
}

/// Row-by-row bulk copy. Source stride is the texture width, destination
/// stride the target width; each advances independently per row.
fn blit_opaque(src: &Texture, src_rect: &Rect, target: &mut [u8], target_w: u32, dst_rect: &Rect) {
    let rows = dst_rect.height() as usize;
    let row_bytes = dst_rect.width() as usize * 4;
    let src_stride = src.width() as usize * 4;
    let dst_stride = target_w as usize * 4;

    let mut si = (src_rect.top as usize * src.width() as usize + src_rect.left as usize) * 4;
    let mut di = (dst_rect.top as usize * target_w as usize + dst_rect.left as usize) * 4;
    let pixels = src.pixels();
    for _ in 0..rows {
        target[di..di + row_bytes].copy_from_slice(&pixels[si..si + row_bytes]);
        si += src_stride;
        di += dst_stride;
    }
}

/// Per-pixel source-over compositing.
///
/// Alpha policy: alpha 0 skips the pixel entirely; alpha 255 copies all four
/// channels, so a fully covered pixel imprints its coverage when the
/// destination is itself a texture that will be drawn transparently later;
/// partial alpha blends the RGB channels as `dst + alpha * (src - dst) / 255`
/// in integer arithmetic and leaves the destination alpha untouched. At the
/// end of each row both indices jump by the difference between their stride
/// and the consumed row width.
fn blit_blended(src: &Texture, src_rect: &Rect, target: &mut [u8], target_w: u32, dst_rect: &Rect) {
    let rows = dst_rect.height() as usize;
    let cols = dst_rect.width() as usize;
    let src_skip = (src.width() as usize - cols) * 4;
    let dst_skip = (target_w as usize - cols) * 4;

    let mut si = (src_rect.top as usize * src.width() as usize + src_rect.left as usize) * 4;
    let mut di = (dst_rect.top as usize * target_w as usize + dst_rect.left as usize) * 4;
    let pixels = src.pixels();
    for _ in 0..rows {
        for _ in 0..cols {
            let a = pixels[si + 3];
            if a == 255 {
                target[di..di + 4].copy_from_slice(&pixels[si..si + 4]);
            } else if a > 0 {
                let a = a as i32;
                for c in 0..3 {
                    let s = pixels[si + c] as i32;
                    let d = target[di + c] as i32;
                    target[di + c] = (d + a * (s - d) / 255) as u8;
                }
            }
            si += 4;
            di += 4;
        }
        si += src_skip;
        di += dst_skip;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Texture whose pixel at (x, y) is (x, y, 7, alpha).
    fn coords_texture(w: u32, h: u32, alpha: u8) -> Texture {
        let mut t = Texture::blank(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                let i = ((y * w + x) * 4) as usize;
                t.pixels_mut()[i] = x as u8;
                t.pixels_mut()[i + 1] = y as u8;
                t.pixels_mut()[i + 2] = 7;
                t.pixels_mut()[i + 3] = alpha;
            }
        }
        t
    }

    fn target(w: u32, h: u32, fill: u8) -> Vec<u8> {
        vec![fill; (w * h * 4) as usize]
    }

    fn full(w: u32, h: u32) -> Rect {
        Rect::from_size(0, 0, w, h)
    }

    #[test]
    fn opaque_copies_full_texture() {
        let src = coords_texture(3, 2, 255);
        let mut dst = target(5, 5, 9);
        let wrote = blit(
            &src,
            None,
            &mut dst,
            5,
            5,
            &full(5, 5),
            Point::new(1, 2),
            BlendMode::Opaque,
        )
        .unwrap();
        assert!(wrote);
        // Pixel (1,2) of the target is source (0,0).
        assert_eq!(&dst[(2 * 5 + 1) * 4..(2 * 5 + 1) * 4 + 4], &[0, 0, 7, 255]);
        // Pixel (3,3) is source (2,1).
        assert_eq!(&dst[(3 * 5 + 3) * 4..(3 * 5 + 3) * 4 + 4], &[2, 1, 7, 255]);
        // Outside the blit region: untouched.
        assert_eq!(&dst[0..4], &[9, 9, 9, 9]);
    }

    #[test]
    fn fully_offscreen_draw_writes_nothing() {
        let src = coords_texture(4, 4, 255);
        let mut dst = target(4, 4, 33);
        let before = dst.clone();
        let wrote = blit(
            &src,
            None,
            &mut dst,
            4,
            4,
            &full(4, 4),
            Point::new(10, 10),
            BlendMode::Opaque,
        )
        .unwrap();
        assert!(!wrote);
        assert_eq!(dst, before);
    }

    #[test]
    fn extreme_dest_is_offscreen_noop() {
        // A destination near i32::MAX must clip to nothing, not overflow
        // while computing the destination extent.
        let src = coords_texture(4, 4, 255);
        let mut dst = target(4, 4, 33);
        let before = dst.clone();
        let wrote = blit(
            &src,
            None,
            &mut dst,
            4,
            4,
            &full(4, 4),
            Point::new(i32::MAX, i32::MAX),
            BlendMode::Opaque,
        )
        .unwrap();
        assert!(!wrote);
        assert_eq!(dst, before);
    }

    #[test]
    fn negative_dest_clips_top_left() {
        let src = coords_texture(4, 4, 255);
        let mut dst = target(4, 4, 0);
        blit(
            &src,
            None,
            &mut dst,
            4,
            4,
            &full(4, 4),
            Point::new(-2, -1),
            BlendMode::Opaque,
        )
        .unwrap();
        // Target (0,0) shows source (2,1).
        assert_eq!(&dst[0..4], &[2, 1, 7, 255]);
        // Rows below the 3 visible source rows stay untouched.
        assert_eq!(&dst[(3 * 4) * 4..(3 * 4) * 4 + 4], &[0, 0, 0, 0]);
    }

    #[test]
    fn target_rect_limits_writes() {
        let src = coords_texture(4, 4, 255);
        let mut dst = target(8, 8, 1);
        blit(
            &src,
            None,
            &mut dst,
            8,
            8,
            &Rect::new(2, 2, 5, 5),
            Point::new(0, 0),
            BlendMode::Opaque,
        )
        .unwrap();
        // (1,1) is outside the target rect.
        assert_eq!(&dst[(8 + 1) * 4..(8 + 1) * 4 + 4], &[1, 1, 1, 1]);
        // (2,2) is inside and shows source (2,2).
        assert_eq!(&dst[(2 * 8 + 2) * 4..(2 * 8 + 2) * 4 + 4], &[2, 2, 7, 255]);
    }

    #[test]
    fn frame_grid_selects_cell() {
        // 32x8 with a 4x1 grid: frame (2,0) reads source columns 16..=23.
        let src = {
            let mut t = coords_texture(32, 8, 255);
            t.set_frame_grid(4, 1).unwrap();
            t
        };
        let mut dst = target(8, 8, 0);
        blit(
            &src,
            Some((2, 0)),
            &mut dst,
            8,
            8,
            &full(8, 8),
            Point::new(0, 0),
            BlendMode::Opaque,
        )
        .unwrap();
        for y in 0..8u32 {
            for x in 0..8u32 {
                let i = ((y * 8 + x) * 4) as usize;
                assert_eq!(dst[i], (16 + x) as u8, "column at ({x},{y})");
                assert_eq!(dst[i + 1], y as u8, "row at ({x},{y})");
            }
        }
    }

    #[test]
    fn out_of_range_frame_aborts_whole_call() {
        let src = {
            let mut t = coords_texture(32, 8, 255);
            t.set_frame_grid(4, 1).unwrap();
            t
        };
        let mut dst = target(8, 8, 5);
        let before = dst.clone();
        let err = blit(
            &src,
            Some((4, 0)),
            &mut dst,
            8,
            8,
            &full(8, 8),
            Point::new(0, 0),
            BlendMode::Opaque,
        )
        .unwrap_err();
        assert!(matches!(err, SoftblitError::InvalidFrame { col: 4, .. }));
        assert_eq!(dst, before);
    }

    #[test]
    fn frame_ignored_without_grid() {
        let src = coords_texture(2, 2, 255);
        let mut dst = target(2, 2, 0);
        blit(
            &src,
            Some((9, 9)),
            &mut dst,
            2,
            2,
            &full(2, 2),
            Point::new(0, 0),
            BlendMode::Opaque,
        )
        .unwrap();
        assert_eq!(&dst[0..4], &[0, 0, 7, 255]);
    }

    #[test]
    fn transparent_alpha_zero_writes_nothing() {
        let src = coords_texture(4, 4, 0);
        let mut dst = target(4, 4, 77);
        let before = dst.clone();
        let wrote = blit(
            &src,
            None,
            &mut dst,
            4,
            4,
            &full(4, 4),
            Point::new(0, 0),
            BlendMode::Transparent,
        )
        .unwrap();
        // The draw intersected the target, but every pixel was skipped.
        assert!(wrote);
        assert_eq!(dst, before);
    }

    #[test]
    fn transparent_alpha_full_is_byte_identical() {
        let src = coords_texture(3, 3, 255);
        let mut dst = target(3, 3, 12);
        blit(
            &src,
            None,
            &mut dst,
            3,
            3,
            &full(3, 3),
            Point::new(0, 0),
            BlendMode::Transparent,
        )
        .unwrap();
        // Full coverage writes all four channels, the alpha included.
        assert_eq!(dst, src.pixels());
        assert!(dst.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn transparent_partial_alpha_blends() {
        let mut src = Texture::blank(1, 1).unwrap();
        src.pixels_mut().copy_from_slice(&[200, 100, 0, 128]);
        let mut dst = vec![100u8, 100, 100, 255];
        blit(
            &src,
            None,
            &mut dst,
            1,
            1,
            &full(1, 1),
            Point::new(0, 0),
            BlendMode::Transparent,
        )
        .unwrap();
        // d + a*(s-d)/255: 100+128*100/255=150, 100+0=100, 100+128*(-100)/255=50.
        assert_eq!(&dst[..3], &[150, 100, 50]);
        // Destination alpha untouched for partial coverage.
        assert_eq!(dst[3], 255);
    }

    #[test]
    fn transparent_strides_advance_independently() {
        // Blit a 2x2 region of a 4x4 texture into a 6-wide target; a stride
        // bug smears pixels into neighboring columns.
        let src = coords_texture(4, 4, 255);
        let mut dst = target(6, 3, 0);
        blit(
            &src,
            None,
            &mut dst,
            6,
            3,
            &Rect::new(1, 1, 2, 2),
            Point::new(1, 1),
            BlendMode::Transparent,
        )
        .unwrap();
        assert_eq!(&dst[(6 + 1) * 4..(6 + 1) * 4 + 4], &[0, 0, 7, 255]);
        assert_eq!(&dst[(2 * 6 + 2) * 4..(2 * 6 + 2) * 4 + 4], &[1, 1, 7, 255]);
        // Column 3 of row 1 is outside the target rect.
        assert_eq!(&dst[(6 + 3) * 4..(6 + 3) * 4 + 4], &[0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "target buffer size")]
    fn malformed_target_panics() {
        let src = coords_texture(2, 2, 255);
        let mut dst = vec![0u8; 7];
        let _ = blit(
            &src,
            None,
            &mut dst,
            2,
            2,
            &full(2, 2),
            Point::new(0, 0),
            BlendMode::Opaque,
        );
    }
}
