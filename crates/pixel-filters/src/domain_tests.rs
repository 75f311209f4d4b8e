//! Cross-kernel regression tests for pixel-filters.
//!
//! Each test names the class of bug it guards against.

#[cfg(test)]
mod domain_tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::color::unpack;
    use crate::fast::{lut_grayscale, lut_sepia, lut_vintage, FastFilter, FilterKind};
    use crate::kernels::{self, Filter, PixelFilter};
    use crate::{FilterChain, FilterSettings, Geometry};

    const BUFFERS: usize = 1_000;
    const WIDTH: usize = 32;
    const ROWS: usize = 2;

    fn random_buffers(seed: u64) -> impl Iterator<Item = Vec<u16>> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..BUFFERS).map(move |_| (0..WIDTH * ROWS).map(|_| rng.gen::<u16>()).collect())
    }

    // ========================================================================
    // LUT kernels must be byte-identical to the reference kernels
    // ========================================================================

    /// If this breaks, it means: the luma tables were regenerated with
    /// pre-shifted entries or different weights, so the realtime grayscale
    /// no longer matches the reference.
    #[test]
    fn test_lut_grayscale_matches_reference() {
        let geometry = Geometry::frame(WIDTH, ROWS);
        for (i, source) in random_buffers(1).enumerate() {
            let mut reference = source.clone();
            let mut fast = source;
            kernels::grayscale(&mut reference, geometry);
            lut_grayscale(&mut fast, geometry);
            assert_eq!(reference, fast, "REGRESSION: grayscale buffer {i} diverged");
        }
    }

    /// If this breaks, it means: one of the nine sepia tables disagrees with
    /// the sepia matrix, or saturation happens before the sum.
    #[test]
    fn test_lut_sepia_matches_reference() {
        let geometry = Geometry::frame(WIDTH, ROWS);
        for (i, source) in random_buffers(2).enumerate() {
            let mut reference = source.clone();
            let mut fast = source;
            kernels::sepia(&mut reference, geometry);
            lut_sepia(&mut fast, geometry);
            assert_eq!(reference, fast, "REGRESSION: sepia buffer {i} diverged");
        }
    }

    /// If this breaks, it means: the warm-tone desaturation tables drifted
    /// from the 179/77 split, or warmth/fade are applied in a different order.
    #[test]
    fn test_lut_vintage_matches_reference_for_random_parameters() {
        let geometry = Geometry::frame(WIDTH, ROWS);
        let mut params = StdRng::seed_from_u64(3);
        for (i, source) in random_buffers(4).enumerate() {
            let warmth: u8 = params.gen();
            let fade: u8 = params.gen();
            let mut reference = source.clone();
            let mut fast = source;
            kernels::vintage(&mut reference, geometry, warmth, fade);
            lut_vintage(&mut fast, geometry, warmth, fade);
            assert_eq!(
                reference, fast,
                "REGRESSION: vintage buffer {i} (warmth {warmth}, fade {fade}) diverged"
            );
        }
    }

    /// If this breaks, it means: a FastFilter kind dispatches to a kernel
    /// with different semantics than its reference filter of the same name.
    #[test]
    fn test_fast_filters_match_reference_filters() {
        let settings = FilterSettings::default();
        let geometry = Geometry::frame(WIDTH, ROWS);
        let reference_filters = Filter::all(&settings);

        for kind in FilterKind::ALL {
            let mut reference = reference_filters
                .iter()
                .find(|f| f.name() == kind.name())
                .cloned()
                .unwrap_or_else(|| panic!("no reference filter named {}", kind.name()));
            let mut fast = FastFilter::from_kind(kind, &settings);

            for source in random_buffers(5).take(50) {
                let mut a = source.clone();
                let mut b = source;
                reference.apply(&mut a, geometry);
                fast.apply(&mut b, geometry);
                assert_eq!(a, b, "REGRESSION: {kind} fast and reference differ");
            }
        }
    }

    // ========================================================================
    // Kernel properties
    // ========================================================================

    /// If this breaks, it means: grayscale leaks color, e.g. a per-channel
    /// weight is applied to the output instead of the input.
    #[test]
    fn test_grayscale_output_is_neutral() {
        let geometry = Geometry::frame(WIDTH, ROWS);
        for mut pixels in random_buffers(6).take(100) {
            lut_grayscale(&mut pixels, geometry);
            for &p in &pixels {
                let (r, g, b) = unpack(p);
                assert_eq!(r, b);
                assert_eq!(r >> 3, g >> 3);
            }
        }
    }

    /// If this breaks, it means: the vignette factor can exceed 256 and
    /// brightens pixels, or the center is computed off by one.
    #[test]
    fn test_vignette_never_brightens() {
        let (w, h) = (33, 21);
        let geometry = Geometry::frame(w, h);
        let mut rng = StdRng::seed_from_u64(7);
        let source: Vec<u16> = (0..w * h).map(|_| rng.gen()).collect();
        let mut pixels = source.clone();
        kernels::vignette(&mut pixels, geometry, 255, 0);

        for (&before, &after) in source.iter().zip(&pixels) {
            let (r0, g0, b0) = unpack(before);
            let (r1, g1, b1) = unpack(after);
            assert!(r1 <= r0 && g1 <= g0 && b1 <= b0);
        }
        assert_eq!(pixels[(h / 2) * w + w / 2], source[(h / 2) * w + w / 2]);
    }

    /// If this breaks, it means: processing scanline by scanline gives a
    /// different picture than processing the whole frame, which the
    /// realtime path relies on for the preview chain.
    #[test]
    fn test_scanline_chain_equals_frame_chain() {
        let settings = FilterSettings::default();
        let kinds = [FilterKind::Vibrant, FilterKind::Vintage, FilterKind::Vignette];
        let (w, h) = (40, 24);
        let mut rng = StdRng::seed_from_u64(8);
        let source: Vec<u16> = (0..w * h).map(|_| rng.gen()).collect();

        let mut whole = source.clone();
        FilterChain::<FastFilter>::from_kinds(&kinds, &settings)
            .process(&mut whole, Geometry::frame(w, h));

        let mut chain = FilterChain::<FastFilter>::from_kinds(&kinds, &settings);
        let mut lines = source;
        for (y, line) in lines.chunks_exact_mut(w).enumerate() {
            chain.process(line, Geometry::scanline(w, y, h));
        }
        assert_eq!(whole, lines);
    }

    /// If this breaks, it means: a disabled slot is still executed.
    #[test]
    fn test_all_disabled_chain_is_noop() {
        let mut chain: FilterChain<FastFilter> =
            FilterChain::with_all_kinds(&FilterSettings::default());
        for source in random_buffers(9).take(20) {
            let mut pixels = source.clone();
            chain.process(&mut pixels, Geometry::frame(WIDTH, ROWS));
            assert_eq!(pixels, source);
        }
    }

    /// If this breaks, it means: a disabled reference kernel still touches
    /// the buffer. Covers the neighborhood kernels the fast chain lacks.
    #[test]
    fn test_all_disabled_reference_chain_is_noop() {
        let mut chain: FilterChain<Filter, 11> = FilterChain::new();
        for filter in Filter::all(&FilterSettings::default()) {
            assert!(chain.add_disabled(filter));
        }
        assert_eq!(chain.len(), 11);
        assert_eq!(chain.enabled_count(), 0);

        for (i, source) in random_buffers(10).take(20).enumerate() {
            let mut pixels = source.clone();
            chain.process(&mut pixels, Geometry::frame(WIDTH, ROWS));
            assert_eq!(pixels, source, "REGRESSION: disabled chain changed buffer {i}");
        }
    }

    /// If this breaks, it means: some kernel indexes past the slice when
    /// the image is a single row, a single column or a single pixel.
    #[test]
    fn test_degenerate_shapes_are_safe() {
        let settings = FilterSettings::default();
        for (w, h) in [(1, 1), (1, 9), (9, 1), (3, 1), (1, 3)] {
            let mut chain: FilterChain<Filter, 11> = FilterChain::new();
            for filter in Filter::all(&settings) {
                chain.add(filter);
            }
            let mut pixels = vec![0xA5A5u16; w * h];
            chain.process(&mut pixels, Geometry::frame(w, h));
            assert_eq!(pixels.len(), w * h);
        }
    }

    /// If this breaks, it means: a kernel trusts `rows` over the slice
    /// length and writes past a short buffer.
    #[test]
    fn test_short_slice_only_complete_rows() {
        let settings = FilterSettings::default();
        for mut filter in Filter::all(&settings) {
            let mut pixels = vec![0xFFFFu16; 4 * 3 + 2];
            filter.apply(&mut pixels, Geometry::frame(4, 4));
            assert_eq!(&pixels[12..], &[0xFFFF, 0xFFFF], "{} wrote a partial row", filter.name());
        }
    }
}
