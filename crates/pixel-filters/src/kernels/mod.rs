//! Reference filter kernels.
//!
//! Straightforward multiply-then-shift implementations. The LUT variants in
//! [`crate::fast`] must produce identical output for the filters they
//! cover, so these double as the oracle for equivalence tests.
//!
//! Every kernel works in place on packed RGB565 and only touches the rows
//! [`Geometry::rows_in`] reports for the slice it was given.

mod edge;
mod grain;
mod neighborhood;
mod tone;
mod vignette;

pub use edge::{sobel_edges, EdgeDetect, LineScratch};
pub use grain::{grain, Grain, Lfsr, DEFAULT_SEED};
pub use neighborhood::{box_blur, sharpen, Blur, RowScratch, Sharpen};
pub use tone::{
    brightness_contrast, brightness_contrast_rgb, cool, cool_rgb, grayscale, grayscale_rgb, sepia,
    sepia_rgb, vibrant, vibrant_rgb, vintage, vintage_rgb, BrightnessContrast, Cool, Grayscale,
    Sepia, Vibrant, Vintage, SEPIA_Q8, WARM_KEEP_Q8,
};
pub use vignette::{vignette, Vignette};

use crate::color::{pack, unpack};
use crate::error::FilterError;
use crate::{FilterKind, FilterSettings, Geometry};

/// An in-place pixel transformation.
///
/// Filters take `&mut self` so stateful kernels (grain noise, line scratch)
/// carry their state between calls without interior mutability.
pub trait PixelFilter {
    /// Stable display name.
    fn name(&self) -> &'static str;

    /// Transform `pixels` in place.
    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry);
}

impl<T: PixelFilter + ?Sized> PixelFilter for &mut T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        (**self).apply(pixels, geometry)
    }
}

/// Run `f` over every pixel the geometry covers.
#[inline(always)]
pub(crate) fn map_pixels(
    pixels: &mut [u16],
    geometry: Geometry,
    mut f: impl FnMut(u8, u8, u8) -> (u8, u8, u8),
) {
    let count = geometry.pixels_in(pixels.len());
    for pixel in &mut pixels[..count] {
        let (r, g, b) = unpack(*pixel);
        let (r, g, b) = f(r, g, b);
        *pixel = pack(r, g, b);
    }
}

/// Any reference kernel, as one storable value.
///
/// Chains hold a homogeneous element type; this enum lets a single chain mix
/// every kernel without boxing.
#[derive(Debug, Clone)]
pub enum Filter {
    Grayscale(Grayscale),
    Sepia(Sepia),
    Vintage(Vintage),
    Cool(Cool),
    Vibrant(Vibrant),
    BrightnessContrast(BrightnessContrast),
    Vignette(Vignette),
    Grain(Grain),
    EdgeDetect(EdgeDetect),
    Blur(Blur),
    Sharpen(Sharpen),
}

impl Filter {
    /// Every kernel, configured from `settings`, in canonical order.
    pub fn all(settings: &FilterSettings) -> [Filter; 11] {
        [
            Filter::Grayscale(Grayscale),
            Filter::Sepia(Sepia),
            Filter::Vintage(Vintage::from_settings(settings)),
            Filter::Cool(Cool::from_settings(settings)),
            Filter::Vibrant(Vibrant::from_settings(settings)),
            Filter::BrightnessContrast(BrightnessContrast::from_settings(settings)),
            Filter::Vignette(Vignette::from_settings(settings)),
            Filter::Grain(Grain::new(settings.grain_intensity)),
            Filter::EdgeDetect(EdgeDetect::new(settings.edge_threshold)),
            Filter::Blur(Blur::default()),
            Filter::Sharpen(Sharpen::new(settings.sharpen_strength)),
        ]
    }

    /// Look a kernel up by name, configured from `settings`.
    ///
    /// Accepts every [`FilterKind`] spelling plus
    /// `edge_detect`, `blur` and `sharpen`.
    pub fn by_name(name: &str, settings: &FilterSettings) -> Result<Filter, FilterError> {
        let key: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let filter = match key.as_str() {
            "edgedetect" | "edges" | "sobel" => Filter::EdgeDetect(EdgeDetect::new(settings.edge_threshold)),
            "blur" => Filter::Blur(Blur::default()),
            "sharpen" => Filter::Sharpen(Sharpen::new(settings.sharpen_strength)),
            _ => match name.parse::<FilterKind>()? {
                FilterKind::Grayscale => Filter::Grayscale(Grayscale),
                FilterKind::Sepia => Filter::Sepia(Sepia),
                FilterKind::Vintage => Filter::Vintage(Vintage::from_settings(settings)),
                FilterKind::Cool => Filter::Cool(Cool::from_settings(settings)),
                FilterKind::Vibrant => Filter::Vibrant(Vibrant::from_settings(settings)),
                FilterKind::BrightnessContrast => {
                    Filter::BrightnessContrast(BrightnessContrast::from_settings(settings))
                }
                FilterKind::Vignette => Filter::Vignette(Vignette::from_settings(settings)),
                FilterKind::Grain => Filter::Grain(Grain::new(settings.grain_intensity)),
            },
        };
        Ok(filter)
    }
}

impl PixelFilter for Filter {
    fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale(f) => f.name(),
            Filter::Sepia(f) => f.name(),
            Filter::Vintage(f) => f.name(),
            Filter::Cool(f) => f.name(),
            Filter::Vibrant(f) => f.name(),
            Filter::BrightnessContrast(f) => f.name(),
            Filter::Vignette(f) => f.name(),
            Filter::Grain(f) => f.name(),
            Filter::EdgeDetect(f) => f.name(),
            Filter::Blur(f) => f.name(),
            Filter::Sharpen(f) => f.name(),
        }
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        match self {
            Filter::Grayscale(f) => f.apply(pixels, geometry),
            Filter::Sepia(f) => f.apply(pixels, geometry),
            Filter::Vintage(f) => f.apply(pixels, geometry),
            Filter::Cool(f) => f.apply(pixels, geometry),
            Filter::Vibrant(f) => f.apply(pixels, geometry),
            Filter::BrightnessContrast(f) => f.apply(pixels, geometry),
            Filter::Vignette(f) => f.apply(pixels, geometry),
            Filter::Grain(f) => f.apply(pixels, geometry),
            Filter::EdgeDetect(f) => f.apply(pixels, geometry),
            Filter::Blur(f) => f.apply(pixels, geometry),
            Filter::Sharpen(f) => f.apply(pixels, geometry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_unique() {
        let filters = Filter::all(&FilterSettings::default());
        let mut names: Vec<_> = filters.iter().map(|f| f.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), filters.len());
    }

    #[test]
    fn test_map_pixels_respects_short_slice() {
        let mut pixels = vec![0xFFFFu16; 5];
        // Claims two rows of 3 but only one full row is present.
        map_pixels(&mut pixels, Geometry::frame(3, 2), |_, _, _| (0, 0, 0));
        assert_eq!(pixels, vec![0, 0, 0, 0xFFFF, 0xFFFF]);
    }

    #[test]
    fn test_every_filter_survives_degenerate_sizes() {
        for (w, h) in [(1, 1), (1, 7), (7, 1), (2, 2), (0, 3)] {
            for mut filter in Filter::all(&FilterSettings::default()) {
                let mut pixels = vec![0x7BEFu16; w * h];
                filter.apply(&mut pixels, Geometry::frame(w, h));
                assert_eq!(pixels.len(), w * h, "{} changed the length", filter.name());
            }
        }
    }

    #[test]
    fn test_by_name() {
        let settings = FilterSettings::default();
        assert_eq!(Filter::by_name("edge-detect", &settings).unwrap().name(), "EdgeDetect");
        assert_eq!(Filter::by_name("warm", &settings).unwrap().name(), "Vintage");
        assert_eq!(Filter::by_name("Brightness_Contrast", &settings).unwrap().name(), "BrightnessContrast");
        assert_eq!(
            Filter::by_name("posterize", &settings).unwrap_err(),
            FilterError::UnknownFilter("posterize".into())
        );
    }
}
