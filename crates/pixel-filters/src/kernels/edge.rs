//! Sobel edge magnitude.

use super::PixelFilter;
use crate::color::{luma, pack, unpack};
use crate::error::FilterError;
use crate::Geometry;

/// Three rows of luminance, sized by the widest image it will see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineScratch {
    lines: Vec<u8>,
    width: usize,
}

impl LineScratch {
    pub fn with_width(width: usize) -> Self {
        Self {
            lines: vec![0; width * 3],
            width,
        }
    }

    /// Widest row this scratch can hold.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grow to at least `width`; never shrinks.
    pub fn ensure_width(&mut self, width: usize) {
        if width > self.width {
            self.lines.resize(width * 3, 0);
            self.width = width;
        }
    }
}

/// Replace every interior pixel with 255 (edge) or 0 (flat) white/black.
///
/// `mag = (|gx| + |gy|) >> 1` on luminance; border pixels are left alone.
/// Luminance is read from a rolling three-row window of the original image,
/// so already-written rows never feed back into the gradient.
///
/// # Errors
///
/// [`FilterError::ScratchTooSmall`] when `scratch` is narrower than the
/// image. Nothing is modified in that case.
pub fn sobel_edges(
    pixels: &mut [u16],
    geometry: Geometry,
    threshold: u8,
    scratch: &mut LineScratch,
) -> Result<(), FilterError> {
    if scratch.width < geometry.width {
        return Err(FilterError::ScratchTooSmall {
            required: geometry.width,
            available: scratch.width,
        });
    }
    let rows = geometry.rows_in(pixels.len());
    sobel_in_place(pixels, geometry.width, rows, threshold, &mut scratch.lines);
    Ok(())
}

fn load_luma_row(src: &[u16], dst: &mut [u8]) {
    for (d, &p) in dst.iter_mut().zip(src) {
        let (r, g, b) = unpack(p);
        *d = luma(r, g, b);
    }
}

fn sobel_in_place(pixels: &mut [u16], width: usize, rows: usize, threshold: u8, lines: &mut [u8]) {
    if width < 3 || rows < 3 {
        return;
    }

    for row in 0..3 {
        load_luma_row(
            &pixels[row * width..(row + 1) * width],
            &mut lines[row * width..(row + 1) * width],
        );
    }

    let threshold = threshold as i32;
    for y in 1..rows - 1 {
        let above = ((y - 1) % 3) * width;
        let mid = (y % 3) * width;
        let below = ((y + 1) % 3) * width;

        for x in 1..width - 1 {
            let at = |slot: usize, col: usize| lines[slot + col] as i32;

            let gx = -at(above, x - 1) + at(above, x + 1) - 2 * at(mid, x - 1) + 2 * at(mid, x + 1)
                - at(below, x - 1)
                + at(below, x + 1);
            let gy = -at(above, x - 1) - 2 * at(above, x) - at(above, x + 1)
                + at(below, x - 1)
                + 2 * at(below, x)
                + at(below, x + 1);

            let magnitude = (gx.abs() + gy.abs()) >> 1;
            let value = if magnitude > threshold { 255 } else { 0 };
            pixels[y * width + x] = pack(value, value, value);
        }

        // Row y-1 is no longer needed; its slot takes row y+2.
        if y + 2 < rows {
            let next = y + 2;
            load_luma_row(
                &pixels[next * width..(next + 1) * width],
                &mut lines[above..above + width],
            );
        }
    }
}

/// Edge detection filter owning its scratch.
///
/// The scratch grows to the widest geometry seen, so this filter never
/// reports [`FilterError`]; use [`sobel_edges`] with a fixed scratch where
/// allocation must not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeDetect {
    pub threshold: u8,
    scratch: LineScratch,
}

impl EdgeDetect {
    pub fn new(threshold: u8) -> Self {
        Self {
            threshold,
            scratch: LineScratch::default(),
        }
    }

    pub fn with_scratch(threshold: u8, scratch: LineScratch) -> Self {
        Self { threshold, scratch }
    }
}

impl PixelFilter for EdgeDetect {
    fn name(&self) -> &'static str {
        "EdgeDetect"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        self.scratch.ensure_width(geometry.width);
        let rows = geometry.rows_in(pixels.len());
        sobel_in_place(pixels, geometry.width, rows, self.threshold, &mut self.scratch.lines);
    }
}
