//! Film grain from a 32-bit LFSR.

use super::PixelFilter;
use crate::color::{clamp_channel, pack, unpack};
use crate::Geometry;

/// Seed used when none (or zero) is supplied.
pub const DEFAULT_SEED: u32 = 0xDEAD_BEEF;

/// Fibonacci LFSR with taps 32, 22, 2, 1.
///
/// The state never becomes zero: a zero seed is replaced by
/// [`DEFAULT_SEED`], and the step function maps nonzero states to nonzero
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lfsr {
    state: u32,
}

impl Lfsr {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance one step and return the new state.
    #[inline(always)]
    pub fn step(&mut self) -> u32 {
        let s = self.state;
        let bit = (s ^ (s >> 1) ^ (s >> 21) ^ (s >> 31)) & 1;
        self.state = (s >> 1) | (bit << 31);
        self.state
    }
}

impl Default for Lfsr {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

/// Add the same pseudo-random offset to all three channels of each pixel.
///
/// The offset is `((state & 0xFF) - 128) * intensity / 256`, so it lies in
/// `[-intensity/2, intensity/2)`.
pub fn grain(pixels: &mut [u16], geometry: Geometry, intensity: u8, lfsr: &mut Lfsr) {
    let count = geometry.pixels_in(pixels.len());
    let intensity = intensity as i32;
    for pixel in &mut pixels[..count] {
        let noise = ((lfsr.step() & 0xFF) as i32 - 128) * intensity / 256;
        let (r, g, b) = unpack(*pixel);
        *pixel = pack(
            clamp_channel(r as i32 + noise),
            clamp_channel(g as i32 + noise),
            clamp_channel(b as i32 + noise),
        );
    }
}

/// Film grain filter; the generator advances across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grain {
    pub intensity: u8,
    pub lfsr: Lfsr,
}

impl Grain {
    pub fn new(intensity: u8) -> Self {
        Self {
            intensity,
            lfsr: Lfsr::default(),
        }
    }

    pub fn with_seed(intensity: u8, seed: u32) -> Self {
        Self {
            intensity,
            lfsr: Lfsr::new(seed),
        }
    }
}

impl PixelFilter for Grain {
    fn name(&self) -> &'static str {
        "Grain"
    }

    fn apply(&mut self, pixels: &mut [u16], geometry: Geometry) {
        grain(pixels, geometry, self.intensity, &mut self.lfsr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_replaced() {
        assert_eq!(Lfsr::new(0).state(), DEFAULT_SEED);
        assert_eq!(Lfsr::new(7).state(), 7);
    }

    #[test]
    fn test_state_never_zero() {
        let mut lfsr = Lfsr::new(1);
        for _ in 0..100_000 {
            assert_ne!(lfsr.step(), 0);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let mut a = Lfsr::new(42);
        let mut b = Lfsr::new(42);
        for _ in 0..64 {
            assert_eq!(a.step(), b.step());
        }
    }

    #[test]
    fn test_zero_intensity_is_identity() {
        let source: Vec<u16> = (0..64u16).map(|i| i * 1021).collect();
        let mut pixels = source.clone();
        grain(&mut pixels, Geometry::frame(8, 8), 0, &mut Lfsr::default());
        assert_eq!(pixels, source);
    }

    #[test]
    fn test_noise_bounded_by_intensity() {
        let mid = pack(128, 128, 128);
        let mut pixels = vec![mid; 256];
        grain(&mut pixels, Geometry::frame(16, 16), 30, &mut Lfsr::default());
        for &p in &pixels {
            let (r, _, _) = unpack(p);
            // +-15 noise plus one 5-bit quantization step
            assert!((r as i32 - 128).abs() <= 15 + 8, "red {r}");
        }
    }

    #[test]
    fn test_filter_advances_between_calls() {
        let mut filter = Grain::with_seed(60, 99);
        let before = filter.lfsr.state();
        let mut pixels = vec![0x8410u16; 4];
        filter.apply(&mut pixels, Geometry::frame(4, 1));
        assert_ne!(filter.lfsr.state(), before);
    }
}
