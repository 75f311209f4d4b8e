//! Per-row downscale and filter stage.
//!
//! Scaling is nearest-neighbor in 16.16 fixed point: one source read per
//! output pixel, no division in the loop.

use pixel_filters::Geometry;

use crate::error::ScanlineError;

/// Fractional bits of the scale factors.
pub const FIXED_SHIFT: u32 = 16;

/// `(src << 16) / dst`: source pixels per destination pixel, 16.16.
#[inline]
pub fn scale_factor(src: usize, dst: usize) -> u64 {
    ((src as u64) << FIXED_SHIFT) / dst.max(1) as u64
}

/// Source row sampled for destination row `y`, clamped to the last row.
#[inline]
pub fn source_row(y: usize, vscale: u64, src_height: usize) -> usize {
    let src_y = ((y as u64 * vscale) >> FIXED_SHIFT) as usize;
    src_y.min(src_height.saturating_sub(1))
}

/// Check that `src_width` can be reduced to `dst_width` into a buffer of
/// `capacity` pixels.
pub fn check_widths(src_width: usize, dst_width: usize, capacity: usize) -> Result<(), ScanlineError> {
    if dst_width == 0 {
        return Err(ScanlineError::ZeroWidth);
    }
    if dst_width > src_width {
        return Err(ScanlineError::Upscale {
            src_width,
            dst_width,
        });
    }
    if dst_width > capacity {
        return Err(ScanlineError::BufferTooSmall {
            dst_width,
            capacity,
        });
    }
    Ok(())
}

/// Nearest-neighbor reduce `src` into the first `dst_width` pixels of `dst`.
///
/// `dst[x] = src[(x * scale) >> 16]` with `scale = (src.len() << 16) / dst_width`.
pub fn downscale_scanline(src: &[u16], dst: &mut [u16], dst_width: usize) -> Result<(), ScanlineError> {
    check_widths(src.len(), dst_width, dst.len())?;
    let scale = scale_factor(src.len(), dst_width);
    for (x, out) in dst[..dst_width].iter_mut().enumerate() {
        *out = src[((x as u64 * scale) >> FIXED_SHIFT) as usize];
    }
    Ok(())
}

/// Downscale one source row into `dst`, then run `filter` over the result.
///
/// The filter only sees the `dst_width` pixels just written, placed as row
/// `y` of a `frame_height`-row frame.
pub fn process_scanline<F>(
    src: &[u16],
    dst: &mut [u16],
    dst_width: usize,
    y: usize,
    frame_height: usize,
    mut filter: F,
) -> Result<(), ScanlineError>
where
    F: FnMut(&mut [u16], Geometry),
{
    downscale_scanline(src, dst, dst_width)?;
    filter(&mut dst[..dst_width], Geometry::scanline(dst_width, y, frame_height));
    Ok(())
}
