//! Packed pixel codec and lookup tables
//!
//! Every kernel in this crate reads and writes RGB565 pixels (5 bits red,
//! 6 bits green, 5 bits blue) and does its arithmetic on unpacked 8-bit
//! channels.
//!
//! # Example
//!
//! ```
//! use pixel_filters::color::{pack, unpack, Rgb888};
//!
//! let pixel = pack(255, 128, 0);
//! let (r, g, b) = unpack(pixel);
//! assert_eq!((r, g, b), (248, 128, 0));
//!
//! // Repacking an unpacked pixel is lossless
//! assert_eq!(Rgb888::from_rgb565(pixel).to_rgb565(), pixel);
//! ```

pub mod lut;
mod rgb565;

pub use rgb565::{clamp_channel, luma, pack, unpack, Rgb888, LUMA_B_Q8, LUMA_G_Q8, LUMA_R_Q8};
