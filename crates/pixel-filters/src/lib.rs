// Generated product tables are indexed in tight loops.
#![allow(clippy::needless_range_loop, clippy::module_inception)]

//! pixel-filters: fixed-point image filters for packed RGB565 pixels
//!
//! Integer-only kernels sized for realtime use on small displays. Every
//! kernel mutates a pixel slice in place, never allocates in its hot loop
//! and accepts either a whole frame or a single scanline.
//!
//! # Quick Start
//!
//! ```
//! use pixel_filters::{FastFilter, FilterChain, FilterKind, FilterSettings, Geometry};
//!
//! let settings = FilterSettings::default();
//! let mut chain: FilterChain<FastFilter> =
//!     FilterChain::from_kinds(&[FilterKind::Vintage, FilterKind::Vignette], &settings);
//!
//! let mut frame = vec![0x7BEFu16; 160 * 128];
//! chain.process(&mut frame, Geometry::frame(160, 128));
//! ```
//!
//! # Two Kernel Styles
//!
//! - [`kernels`]: one value type per filter implementing [`PixelFilter`],
//!   unified by the [`Filter`] enum. Includes the neighborhood kernels
//!   (edge, blur, sharpen) that need whole frames.
//! - [`fast`]: [`FastFilter`], a parameter block tagged by [`FilterKind`].
//!   Grayscale, sepia and the warm tone run on lookup tables generated at
//!   build time; output matches the reference kernels exactly.
//!
//! # Fixed Point
//!
//! Multipliers are Q8 (256 = 1.0). Every channel result is clamped to
//! `0..=255` before packing, never wrapped.
//!
//! # Geometry
//!
//! Kernels are told where their pixels sit through [`Geometry`]. A scanline
//! at row `y` of a 128-row frame is `Geometry::scanline(width, y, 128)`, which
//! lets the vignette darken per line exactly as it would the whole frame.

pub mod chain;
pub mod color;
pub mod error;
pub mod fast;
pub mod geometry;
pub mod kernels;
pub mod settings;

#[cfg(test)]
mod domain_tests;

pub use chain::{FilterChain, MAX_FILTERS};
pub use color::{pack, unpack, Rgb888};
pub use error::FilterError;
pub use fast::{FastFilter, FilterKind};
pub use geometry::Geometry;
pub use kernels::{Filter, PixelFilter};
pub use settings::FilterSettings;
