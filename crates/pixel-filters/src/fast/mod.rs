//! Realtime kernel set
//!
//! [`FastFilter`] is a parameter block tagged by [`FilterKind`]. Grayscale,
//! sepia and the warm-tone filter run on the product tables in
//! [`crate::color::lut`]; the remaining kinds share the integer kernels of
//! [`crate::kernels`]. Output is identical to the reference kernels for
//! every kind, which `domain_tests` checks on randomized buffers.

use std::fmt;
use std::str::FromStr;

use crate::color::{lut, pack, unpack};
use crate::error::FilterError;
use crate::kernels::{self, Lfsr, PixelFilter};
use crate::{FilterSettings, Geometry};

/// Every filter the realtime pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FilterKind {
    Grayscale,
    Sepia,
    Vintage,
    Cool,
    Vibrant,
    BrightnessContrast,
    Vignette,
    Grain,
}

impl FilterKind {
    /// All kinds in canonical order.
    pub const ALL: [FilterKind; 8] = [
        FilterKind::Grayscale,
        FilterKind::Sepia,
        FilterKind::Vintage,
        FilterKind::Cool,
        FilterKind::Vibrant,
        FilterKind::BrightnessContrast,
        FilterKind::Vignette,
        FilterKind::Grain,
    ];

    /// Display name, shared with the matching reference filter.
    pub const fn name(self) -> &'static str {
        match self {
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Sepia => "Sepia",
            FilterKind::Vintage => "Vintage",
            FilterKind::Cool => "Cool",
            FilterKind::Vibrant => "Vibrant",
            FilterKind::BrightnessContrast => "BrightnessContrast",
            FilterKind::Vignette => "Vignette",
            FilterKind::Grain => "Grain",
        }
    }

    /// Whether this kind runs on lookup tables.
    pub const fn uses_lut(self) -> bool {
        matches!(self, FilterKind::Grayscale | FilterKind::Sepia | FilterKind::Vintage)
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterKind {
    type Err = FilterError;

    /// Case-insensitive; `_`, `-` and spaces are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "grayscale" | "greyscale" | "mono" | "monochrome" => Ok(FilterKind::Grayscale),
            "sepia" => Ok(FilterKind::Sepia),
            "vintage" | "warm" => Ok(FilterKind::Vintage),
            "cool" => Ok(FilterKind::Cool),
            "vibrant" => Ok(FilterKind::Vibrant),
            "brightnesscontrast" => Ok(FilterKind::BrightnessContrast),
            "vignette" => Ok(FilterKind::Vignette),
            "grain" => Ok(FilterKind::Grain),
            _ => Err(FilterError::UnknownFilter(s.to_string())),
        }
    }
}

// ============================================================================
// LUT kernels
// ============================================================================

/// Grayscale through the luma tables.
pub fn lut_grayscale(pixels: &mut [u16], geometry: Geometry) {
    let count = geometry.pixels_in(pixels.len());
    for pixel in &mut pixels[..count] {
        let (r, g, b) = unpack(*pixel);
        let y = lut::luma(r, g, b);
        *pixel = pack(y, y, y);
    }
}

/// Sepia through the nine sepia tables.
pub fn lut_sepia(pixels: &mut [u16], geometry: Geometry) {
    let count = geometry.pixels_in(pixels.len());
    for pixel in &mut pixels[..count] {
        let (r, g, b) = unpack(*pixel);
        let (r, g, b) = lut::sepia(r, g, b);
        *pixel = pack(r, g, b);
    }
}

/// Warm vintage tone; desaturation through the warm tables.
pub fn lut_vintage(pixels: &mut [u16], geometry: Geometry, warmth: u8, fade: u8) {
    let count = geometry.pixels_in(pixels.len());
    let warm_r = warmth as i32;
    let warm_g = (warmth >> 1) as i32;
    let fade = fade as i32;
    for pixel in &mut pixels[..count] {
        let (r, g, b) = unpack(*pixel);
        let lum = lut::luma(r, g, b);
        let r = (lut::desaturate(r, lum) as i32 + warm_r).clamp(fade, 255);
        let g = (lut::desaturate(g, lum) as i32 + warm_g).clamp(fade, 255);
        let b = (lut::desaturate(b, lum) as i32).clamp(fade, 255);
        *pixel = pack(r as u8, g as u8, b as u8);
    }
}

// ============================================================================
// FastFilter
// ============================================================================

/// A realtime filter: its kind plus the parameters that kind needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FastFilter {
    Grayscale,
    Sepia,
    Vintage { warmth: u8, fade: u8 },
    Cool { offset: u8, contrast_q8: u16 },
    Vibrant { boost_q8: u16 },
    BrightnessContrast { brightness: i8, contrast_q8: u16 },
    Vignette { strength_q8: u16, min_factor: u16 },
    Grain { intensity: u8, lfsr: Lfsr },
}

impl FastFilter {
    /// Build a filter of `kind` with parameters taken from `settings`.
    pub fn from_kind(kind: FilterKind, settings: &FilterSettings) -> Self {
        match kind {
            FilterKind::Grayscale => FastFilter::Grayscale,
            FilterKind::Sepia => FastFilter::Sepia,
            FilterKind::Vintage => FastFilter::Vintage {
                warmth: settings.vintage_warmth,
                fade: settings.vintage_fade,
            },
            FilterKind::Cool => FastFilter::Cool {
                offset: settings.cool_offset,
                contrast_q8: settings.cool_contrast_q8,
            },
            FilterKind::Vibrant => FastFilter::Vibrant {
                boost_q8: settings.vibrant_boost_q8,
            },
            FilterKind::BrightnessContrast => FastFilter::BrightnessContrast {
                brightness: settings.brightness,
                contrast_q8: settings.contrast_q8,
            },
            FilterKind::Vignette => FastFilter::Vignette {
                strength_q8: settings.vignette_strength_q8,
                min_factor: settings.vignette_min_factor,
            },
            FilterKind::Grain => FastFilter::Grain {
                intensity: settings.grain_intensity,
                lfsr: Lfsr::default(),
            },
        }
    }

    pub fn kind(&self) -> FilterKind {
        match self {
            FastFilter::Grayscale => FilterKind::Grayscale,
            FastFilter::Sepia => FilterKind::Sepia,
            FastFilter::Vintage { .. } => FilterKind::Vintage,
            FastFilter::Cool { .. } => FilterKind::Cool,
            FastFilter::Vibrant { .. } => FilterKind::Vibrant,
            FastFilter::BrightnessContrast { .. } => FilterKind::BrightnessContrast,
            FastFilter::Vignette { .. } => FilterKind::Vignette,
            FastFilter::Grain { .. } => FilterKind::Grain,
        }
    }
}

impl PixelFilter for FastFilter {
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        match self {
            FastFilter::Grayscale => lut_grayscale(pixels, geometry),
            FastFilter::Sepia => lut_sepia(pixels, geometry),
            FastFilter::Vintage { warmth, fade } => lut_vintage(pixels, geometry, *warmth, *fade),
            FastFilter::Cool {
                offset,
                contrast_q8,
            } => kernels::cool(pixels, geometry, *offset, *contrast_q8),
            FastFilter::Vibrant { boost_q8 } => kernels::vibrant(pixels, geometry, *boost_q8),
            FastFilter::BrightnessContrast {
                brightness,
                contrast_q8,
            } => kernels::brightness_contrast(pixels, geometry, *brightness, *contrast_q8),
            FastFilter::Vignette {
                strength_q8,
                min_factor,
            } => kernels::vignette(pixels, geometry, *strength_q8, *min_factor),
            FastFilter::Grain { intensity, lfsr } => kernels::grain(pixels, geometry, *intensity, lfsr),
        }
    }
}
