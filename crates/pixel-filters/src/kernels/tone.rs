//! Per-pixel tone and color kernels.
//!
//! Every kernel here maps one pixel to one pixel, so they run unchanged on
//! whole frames and on single scanlines.

use super::{map_pixels, PixelFilter};
use crate::color::{clamp_channel, luma};
use crate::{FilterSettings, Geometry};

/// Sepia matrix in Q8, one row per output channel.
pub const SEPIA_Q8: [[u32; 3]; 3] = [[101, 197, 48], [89, 176, 43], [70, 137, 34]];

/// Share of the original channel kept by the warm-tone desaturation, Q8.
pub const WARM_KEEP_Q8: u32 = 179;

// ============================================================================
// Per-pixel math
// ============================================================================

/// Monochrome: luminance written to all three channels.
#[inline(always)]
pub fn grayscale_rgb(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let y = luma(r, g, b);
    (y, y, y)
}

/// Sepia tone via the Q8 matrix, saturated per channel.
#[inline(always)]
pub fn sepia_rgb(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as u32, g as u32, b as u32);
    let out = SEPIA_Q8.map(|[kr, kg, kb]| ((r * kr + g * kg + b * kb) >> 8).min(255) as u8);
    (out[0], out[1], out[2])
}

/// Warm vintage look: 70/30 blend with luminance, warm lift, faded blacks.
#[inline(always)]
pub fn vintage_rgb(r: u8, g: u8, b: u8, warmth: u8, fade: u8) -> (u8, u8, u8) {
    let lum = luma(r, g, b) as u32;
    let mix = |c: u8| ((c as u32 * WARM_KEEP_Q8 + lum * (256 - WARM_KEEP_Q8)) >> 8) as i32;
    let fade = fade as i32;
    let r = (mix(r) + warmth as i32).clamp(fade, 255);
    let g = (mix(g) + (warmth >> 1) as i32).clamp(fade, 255);
    let b = mix(b).clamp(fade, 255);
    (r as u8, g as u8, b as u8)
}

#[inline(always)]
fn contrast(channel: u8, contrast_q8: u16) -> i32 {
    (((channel as i32 - 128) * contrast_q8 as i32) >> 8) + 128
}

/// Cool look: contrast around mid-gray, then a blue/cyan tint.
#[inline(always)]
pub fn cool_rgb(r: u8, g: u8, b: u8, offset: u8, contrast_q8: u16) -> (u8, u8, u8) {
    let offset = offset as i32;
    (
        clamp_channel(contrast(r, contrast_q8) - (offset >> 1)),
        clamp_channel(contrast(g, contrast_q8) + (offset >> 2)),
        clamp_channel(contrast(b, contrast_q8) + offset),
    )
}

/// Saturation boost: push each channel away from the luminance.
#[inline(always)]
pub fn vibrant_rgb(r: u8, g: u8, b: u8, boost_q8: u16) -> (u8, u8, u8) {
    let lum = luma(r, g, b) as i32;
    let boost = |c: u8| clamp_channel(lum + (((c as i32 - lum) * boost_q8 as i32) >> 8));
    (boost(r), boost(g), boost(b))
}

/// Contrast around mid-gray followed by a brightness offset.
#[inline(always)]
pub fn brightness_contrast_rgb(
    r: u8,
    g: u8,
    b: u8,
    brightness: i8,
    contrast_q8: u16,
) -> (u8, u8, u8) {
    let adjust = |c: u8| clamp_channel(contrast(c, contrast_q8) + brightness as i32);
    (adjust(r), adjust(g), adjust(b))
}

// ============================================================================
// Slice kernels
// ============================================================================

pub fn grayscale(pixels: &mut [u16], geometry: Geometry) {
    map_pixels(pixels, geometry, grayscale_rgb);
}

pub fn sepia(pixels: &mut [u16], geometry: Geometry) {
    map_pixels(pixels, geometry, sepia_rgb);
}

pub fn vintage(pixels: &mut [u16], geometry: Geometry, warmth: u8, fade: u8) {
    map_pixels(pixels, geometry, |r, g, b| vintage_rgb(r, g, b, warmth, fade));
}

pub fn cool(pixels: &mut [u16], geometry: Geometry, offset: u8, contrast_q8: u16) {
    map_pixels(pixels, geometry, |r, g, b| cool_rgb(r, g, b, offset, contrast_q8));
}

pub fn vibrant(pixels: &mut [u16], geometry: Geometry, boost_q8: u16) {
    map_pixels(pixels, geometry, |r, g, b| vibrant_rgb(r, g, b, boost_q8));
}

pub fn brightness_contrast(pixels: &mut [u16], geometry: Geometry, brightness: i8, contrast_q8: u16) {
    map_pixels(pixels, geometry, |r, g, b| {
        brightness_contrast_rgb(r, g, b, brightness, contrast_q8)
    });
}

// ============================================================================
// Filter values
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Grayscale;

impl PixelFilter for Grayscale {
    fn name(&self) -> &'static str {
        "Grayscale"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        grayscale(pixels, geometry);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sepia;

impl PixelFilter for Sepia {
    fn name(&self) -> &'static str {
        "Sepia"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        sepia(pixels, geometry);
    }
}

/// Warm tones, slight desaturation, faded blacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vintage {
    pub warmth: u8,
    pub fade: u8,
}

impl Vintage {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self {
            warmth: settings.vintage_warmth,
            fade: settings.vintage_fade,
        }
    }
}

impl Default for Vintage {
    fn default() -> Self {
        Self::from_settings(&FilterSettings::default())
    }
}

impl PixelFilter for Vintage {
    fn name(&self) -> &'static str {
        "Vintage"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        vintage(pixels, geometry, self.warmth, self.fade);
    }
}

/// Blue/cyan tint with a contrast boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cool {
    pub offset: u8,
    pub contrast_q8: u16,
}

impl Cool {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self {
            offset: settings.cool_offset,
            contrast_q8: settings.cool_contrast_q8,
        }
    }
}

impl Default for Cool {
    fn default() -> Self {
        Self::from_settings(&FilterSettings::default())
    }
}

impl PixelFilter for Cool {
    fn name(&self) -> &'static str {
        "Cool"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        cool(pixels, geometry, self.offset, self.contrast_q8);
    }
}

/// Saturation boost; `boost_q8 > 256` increases saturation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vibrant {
    pub boost_q8: u16,
}

impl Vibrant {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self {
            boost_q8: settings.vibrant_boost_q8,
        }
    }
}

impl Default for Vibrant {
    fn default() -> Self {
        Self::from_settings(&FilterSettings::default())
    }
}

impl PixelFilter for Vibrant {
    fn name(&self) -> &'static str {
        "Vibrant"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        vibrant(pixels, geometry, self.boost_q8);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessContrast {
    pub brightness: i8,
    pub contrast_q8: u16,
}

impl BrightnessContrast {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        Self {
            brightness: settings.brightness,
            contrast_q8: settings.contrast_q8,
        }
    }
}

impl Default for BrightnessContrast {
    fn default() -> Self {
        Self::from_settings(&FilterSettings::default())
    }
}

impl PixelFilter for BrightnessContrast {
    fn name(&self) -> &'static str {
        "BrightnessContrast"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        brightness_contrast(pixels, geometry, self.brightness, self.contrast_q8);
    }
}
