//! Filter parameter presets.
//!
//! This module provides the [`FilterSettings`] struct holding the parameter
//! block of every kernel. Chains and selectors build their filters from it.

/// Parameters for every kernel in the crate.
///
/// All multipliers are Q8 fixed point (256 = 1.0).
///
/// # Example
///
/// ```
/// use pixel_filters::FilterSettings;
///
/// let settings = FilterSettings::new()
///     .vignette(200, 96)
///     .grain_intensity(48);
/// assert_eq!(settings.vignette_strength_q8, 200);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterSettings {
    /// Red lift of the warm-tone filter (green gets half).
    ///
    /// Default: `30`
    pub vintage_warmth: u8,

    /// Floor every warm-tone channel is clamped to (faded blacks).
    ///
    /// Default: `20`
    pub vintage_fade: u8,

    /// Blue lift of the cool filter (red loses half, green gains a quarter).
    ///
    /// Default: `25`
    pub cool_offset: u8,

    /// Contrast applied by the cool filter before tinting.
    ///
    /// Default: `276` (about 1.08)
    pub cool_contrast_q8: u16,

    /// Saturation multiplier of the vibrant filter.
    ///
    /// Default: `333` (about 1.3)
    pub vibrant_boost_q8: u16,

    /// Offset added by the brightness/contrast filter.
    ///
    /// Default: `0`
    pub brightness: i8,

    /// Multiplier of the brightness/contrast filter around mid-gray.
    ///
    /// Default: `256`
    pub contrast_q8: u16,

    /// Vignette darkening at the corners.
    ///
    /// Default: `128`
    pub vignette_strength_q8: u16,

    /// Lowest factor the vignette may apply, so corners never go black.
    ///
    /// Default: `64`
    pub vignette_min_factor: u16,

    /// Film grain amplitude.
    ///
    /// Default: `30`
    pub grain_intensity: u8,

    /// Sobel magnitude above which a pixel counts as an edge.
    ///
    /// Default: `50`
    pub edge_threshold: u8,

    /// Unsharp mask strength.
    ///
    /// Default: `30`
    pub sharpen_strength: u8,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            vintage_warmth: 30,
            vintage_fade: 20,
            cool_offset: 25,
            cool_contrast_q8: 276,
            vibrant_boost_q8: 333,
            brightness: 0,
            contrast_q8: 256,
            vignette_strength_q8: 128,
            vignette_min_factor: 64,
            grain_intensity: 30,
            edge_threshold: 50,
            sharpen_strength: 30,
        }
    }
}

impl FilterSettings {
    /// Create settings with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vignette strength and minimum factor.
    #[inline]
    pub fn vignette(mut self, strength_q8: u16, min_factor: u16) -> Self {
        self.vignette_strength_q8 = strength_q8;
        self.vignette_min_factor = min_factor;
        self
    }

    /// Set the film grain amplitude.
    #[inline]
    pub fn grain_intensity(mut self, intensity: u8) -> Self {
        self.grain_intensity = intensity;
        self
    }

    /// Set the warm-tone lift and black floor.
    #[inline]
    pub fn vintage(mut self, warmth: u8, fade: u8) -> Self {
        self.vintage_warmth = warmth;
        self.vintage_fade = fade;
        self
    }

    /// Set brightness offset and contrast multiplier.
    #[inline]
    pub fn brightness_contrast(mut self, brightness: i8, contrast_q8: u16) -> Self {
        self.brightness = brightness;
        self.contrast_q8 = contrast_q8;
        self
    }
}
