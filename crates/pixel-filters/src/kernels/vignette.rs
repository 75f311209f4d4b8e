//! Radial darkening toward the frame corners.

use super::PixelFilter;
use crate::color::{pack, unpack};
use crate::{FilterSettings, Geometry};

/// Darken pixels by their squared distance from the frame center.
///
/// `factor = 256 - dist² * strength_q8 / max_dist²`, floored at
/// `min_factor` and never above 256, so no pixel is brightened. The center
/// is taken from the full frame (`width`, `frame_height`), so scanlines
/// processed one at a time get the same result as the whole frame.
pub fn vignette(pixels: &mut [u16], geometry: Geometry, strength_q8: u16, min_factor: u16) {
    let width = geometry.width;
    let rows = geometry.rows_in(pixels.len());
    if rows == 0 {
        return;
    }

    let cx = (width >> 1) as i64;
    let cy = (geometry.frame_height >> 1) as i64;
    let max_dist_sq = (cx * cx + cy * cy).max(1) as u64;
    let strength = strength_q8 as u64;
    let floor = min_factor.min(256) as u64;

    for (row, line) in pixels[..rows * width].chunks_exact_mut(width).enumerate() {
        let dy = (geometry.y_offset + row) as i64 - cy;
        let dy_sq = (dy * dy) as u64;

        for (x, pixel) in line.iter_mut().enumerate() {
            let dx = x as i64 - cx;
            let dist_sq = (dx * dx) as u64 + dy_sq;
            let darken = dist_sq * strength / max_dist_sq;
            let factor = 256u64.saturating_sub(darken).max(floor) as u32;

            let (r, g, b) = unpack(*pixel);
            *pixel = pack(
                ((r as u32 * factor) >> 8) as u8,
                ((g as u32 * factor) >> 8) as u8,
                ((b as u32 * factor) >> 8) as u8,
            );
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vignette {
    pub strength_q8: u16,
    pub min_factor: u16,
}

impl Vignette {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self {
            strength_q8: settings.vignette_strength_q8,
            min_factor: settings.vignette_min_factor,
        }
    }
}

impl Default for Vignette {
    fn default() -> Self {
        Self::from_settings(&FilterSettings::default())
    }
}

impl PixelFilter for Vignette {
    fn name(&self) -> &'static str {
        "Vignette"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        vignette(pixels, geometry, self.strength_q8, self.min_factor);
    }
}
