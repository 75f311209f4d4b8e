//! 3x3 box blur and 4-neighbor sharpen.
//!
//! Both read neighbors from copies of the original rows, so a pixel written
//! on row `y` never influences row `y + 1`.

use super::PixelFilter;
use crate::color::{clamp_channel, pack, unpack};
use crate::error::FilterError;
use crate::Geometry;

/// Two rows of original pixels: the row above and the current row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowScratch {
    rows: Vec<u16>,
    width: usize,
}

impl RowScratch {
    pub fn with_width(width: usize) -> Self {
        Self {
            rows: vec![0; width * 2],
            width,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Grow to at least `width`; never shrinks.
    pub fn ensure_width(&mut self, width: usize) {
        if width > self.width {
            self.rows.resize(width * 2, 0);
            self.width = width;
        }
    }

    fn check(&self, geometry: Geometry) -> Result<(), FilterError> {
        if self.width < geometry.width {
            return Err(FilterError::ScratchTooSmall {
                required: geometry.width,
                available: self.width,
            });
        }
        Ok(())
    }
}

/// Visit each interior pixel with the original rows above and at `y`.
///
/// `f(above, current, below_row_start, x)` returns the new pixel. `below`
/// is read straight from `pixels` since that row has not been written yet.
fn for_each_interior(
    pixels: &mut [u16],
    width: usize,
    rows: usize,
    window: &mut [u16],
    mut f: impl FnMut(&[u16], &[u16], &[u16], usize) -> u16,
) {
    if width < 3 || rows < 3 {
        return;
    }

    let (prev, cur) = window[..width * 2].split_at_mut(width);
    let (mut prev, mut cur) = (prev, cur);
    prev.copy_from_slice(&pixels[..width]);
    cur.copy_from_slice(&pixels[width..width * 2]);

    for y in 1..rows - 1 {
        let (done, rest) = pixels.split_at_mut((y + 1) * width);
        let below = &rest[..width];
        let out = &mut done[y * width..];

        for x in 1..width - 1 {
            out[x] = f(prev, cur, below, x);
        }

        std::mem::swap(&mut prev, &mut cur);
        cur.copy_from_slice(below);
    }
}

#[inline(always)]
fn add_rgb(sum: &mut [i32; 3], pixel: u16) {
    let (r, g, b) = unpack(pixel);
    sum[0] += r as i32;
    sum[1] += g as i32;
    sum[2] += b as i32;
}

fn blur_in_place(pixels: &mut [u16], width: usize, rows: usize, window: &mut [u16]) {
    for_each_interior(pixels, width, rows, window, |above, current, below, x| {
        let mut sum = [0i32; 3];
        for line in [above, current, below] {
            for &p in &line[x - 1..=x + 1] {
                add_rgb(&mut sum, p);
            }
        }
        pack((sum[0] / 9) as u8, (sum[1] / 9) as u8, (sum[2] / 9) as u8)
    });
}

fn sharpen_in_place(pixels: &mut [u16], width: usize, rows: usize, strength: u8, window: &mut [u16]) {
    let strength = strength as i32;
    for_each_interior(pixels, width, rows, window, |above, current, below, x| {
        let mut neighbors = [0i32; 3];
        for p in [above[x], current[x - 1], current[x + 1], below[x]] {
            add_rgb(&mut neighbors, p);
        }
        let (r, g, b) = unpack(current[x]);
        let sharpen = |c: u8, n: i32| {
            let c = c as i32;
            clamp_channel(c + ((strength * (4 * c - n)) >> 8))
        };
        pack(
            sharpen(r, neighbors[0]),
            sharpen(g, neighbors[1]),
            sharpen(b, neighbors[2]),
        )
    });
}

/// 3x3 box average of interior pixels.
///
/// # Errors
///
/// [`FilterError::ScratchTooSmall`] when `scratch` is narrower than the image.
pub fn box_blur(pixels: &mut [u16], geometry: Geometry, scratch: &mut RowScratch) -> Result<(), FilterError> {
    scratch.check(geometry)?;
    let rows = geometry.rows_in(pixels.len());
    blur_in_place(pixels, geometry.width, rows, &mut scratch.rows);
    Ok(())
}

/// Unsharp mask: `c + (strength * (4c - sum of 4 neighbors) >> 8)`.
///
/// # Errors
///
/// [`FilterError::ScratchTooSmall`] when `scratch` is narrower than the image.
pub fn sharpen(
    pixels: &mut [u16],
    geometry: Geometry,
    strength: u8,
    scratch: &mut RowScratch,
) -> Result<(), FilterError> {
    scratch.check(geometry)?;
    let rows = geometry.rows_in(pixels.len());
    sharpen_in_place(pixels, geometry.width, rows, strength, &mut scratch.rows);
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blur {
    scratch: RowScratch,
}

impl PixelFilter for Blur {
    fn name(&self) -> &'static str {
        "Blur"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        self.scratch.ensure_width(geometry.width);
        let rows = geometry.rows_in(pixels.len());
        blur_in_place(pixels, geometry.width, rows, &mut self.scratch.rows);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sharpen {
    pub strength: u8,
    scratch: RowScratch,
}

impl Sharpen {
    pub fn new(strength: u8) -> Self {
        Self {
            strength,
            scratch: RowScratch::default(),
        }
    }
}

impl PixelFilter for Sharpen {
    fn name(&self) -> &'static str {
        "Sharpen"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        self.scratch.ensure_width(geometry.width);
        let rows = geometry.rows_in(pixels.len());
        sharpen_in_place(pixels, geometry.width, rows, self.strength, &mut self.scratch.rows);
    }
}
