//! Bilinear resampling of RGBA pixel buffers.

/// Resample `src` (an RGBA buffer of `src_w` x `src_h` pixels) to
/// `dst_w` x `dst_h`, returning an entirely new buffer. The source is only
/// read, never mutated.
///
/// Each destination pixel maps back into source space, samples its four
/// nearest neighbors and blends them by coverage. On the last source row and
/// column the fractional offset is forced to zero so the `+1` neighbor is
/// never read out of bounds.
pub fn bilinear(src: &[u8], src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Vec<u8> {
    // Byte sizes in usize: u32 products wrap for very large images.
    let sw = src_w as usize;
    let dw = dst_w as usize;
    debug_assert_eq!(src.len(), sw * src_h as usize * 4);
    let mut out = vec![0u8; dw * dst_h as usize * 4];

    let x_ratio = src_w as f32 / dst_w as f32;
    let y_ratio = src_h as f32 / dst_h as f32;

    for dy in 0..dst_h {
        let sy = dy as f32 * y_ratio;
        let py = sy as u32;
        let fy = if py + 1 < src_h { sy - py as f32 } else { 0.0 };
        let py1 = if py + 1 < src_h { py + 1 } else { py };

        for dx in 0..dst_w {
            let sx = dx as f32 * x_ratio;
            let px = sx as u32;
            let fx = if px + 1 < src_w { sx - px as f32 } else { 0.0 };
            let px1 = if px + 1 < src_w { px + 1 } else { px };

            let w1 = (1.0 - fx) * (1.0 - fy);
            let w2 = fx * (1.0 - fy);
            let w3 = (1.0 - fx) * fy;
            let w4 = fx * fy;

            let i1 = (py as usize * sw + px as usize) * 4;
            let i2 = (py as usize * sw + px1 as usize) * 4;
            let i3 = (py1 as usize * sw + px as usize) * 4;
            let i4 = (py1 as usize * sw + px1 as usize) * 4;
            let o = (dy as usize * dw + dx as usize) * 4;

            for c in 0..4 {
                let v = src[i1 + c] as f32 * w1
                    + src[i2 + c] as f32 * w2
                    + src[i3 + c] as f32 * w3
                    + src[i4 + c] as f32 * w4;
                out[o + c] = v.round() as u8;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_has_correct_size() {
        let src = vec![255u8; 4 * 4 * 4];
        let out = bilinear(&src, 4, 4, 8, 6);
        assert_eq!(out.len(), 8 * 6 * 4);
    }

    #[test]
    fn solid_color_stays_solid() {
        let mut src = Vec::new();
        for _ in 0..4 {
            src.extend_from_slice(&[100, 150, 200, 255]);
        }
        let out = bilinear(&src, 2, 2, 5, 3);
        for px in out.chunks_exact(4) {
            assert_eq!(px, &[100, 150, 200, 255]);
        }
    }

    #[test]
    fn identity_scale_is_lossless() {
        // 1:1 mapping lands every sample exactly on a source pixel.
        let src: Vec<u8> = (0..3 * 2 * 4).map(|i| (i * 7 % 256) as u8).collect();
        let out = bilinear(&src, 3, 2, 3, 2);
        assert_eq!(out, src);
    }

    #[test]
    fn upscale_interpolates_between_neighbors() {
        // 2x1 black..white row scaled to 4x1: x=1 maps to sx=0.5, an even mix.
        let src = vec![0, 0, 0, 255, 255, 255, 255, 255];
        let out = bilinear(&src, 2, 1, 4, 1);
        assert_eq!(&out[0..4], &[0, 0, 0, 255]);
        assert_eq!(&out[4..8], &[128, 128, 128, 255]);
        // Last column clamps its fraction: pure second pixel.
        assert_eq!(&out[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn last_row_and_column_never_read_out_of_bounds() {
        // Odd sizes force fractional sample points at the far edges.
        let src = vec![10u8; 5 * 3 * 4];
        let out = bilinear(&src, 5, 3, 13, 9);
        assert!(out.chunks_exact(4).all(|px| px == [10, 10, 10, 10]));
    }

    #[test]
    fn downscale_averages() {
        // 4x1 gradient to 2x1: dx=1 maps to sx=2.0 exactly (no blend).
        let src = vec![
            0, 0, 0, 255, 40, 40, 40, 255, 80, 80, 80, 255, 120, 120, 120, 255,
        ];
        let out = bilinear(&src, 4, 1, 2, 1);
        assert_eq!(&out[0..4], &[0, 0, 0, 255]);
        assert_eq!(&out[4..8], &[80, 80, 80, 255]);
    }
}
