//! RGB565 pack/unpack.

/// Red luminance weight, Q8.
pub const LUMA_R_Q8: u32 = 77;
/// Green luminance weight, Q8.
pub const LUMA_G_Q8: u32 = 150;
/// Blue luminance weight, Q8.
pub const LUMA_B_Q8: u32 = 29;

/// Split a packed RGB565 pixel into 8-bit channels.
///
/// The low bits of each channel are zero, so `pack(unpack(p)) == p`.
#[inline(always)]
pub const fn unpack(pixel: u16) -> (u8, u8, u8) {
    let r = (((pixel >> 11) & 0x1F) << 3) as u8;
    let g = (((pixel >> 5) & 0x3F) << 2) as u8;
    let b = ((pixel & 0x1F) << 3) as u8;
    (r, g, b)
}

/// Pack 8-bit channels into RGB565, truncating the low bits.
#[inline(always)]
pub const fn pack(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 11) | ((g as u16 >> 2) << 5) | (b as u16 >> 3)
}

/// Integer BT.601 luminance: `(77r + 150g + 29b) >> 8`.
#[inline(always)]
pub const fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * LUMA_R_Q8 + g as u32 * LUMA_G_Q8 + b as u32 * LUMA_B_Q8) >> 8) as u8
}

/// Saturate a signed intermediate to the 0..=255 channel range.
#[inline(always)]
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// An unpacked pixel with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb888 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb888 {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn from_rgb565(pixel: u16) -> Self {
        let (r, g, b) = unpack(pixel);
        Self { r, g, b }
    }

    #[inline]
    pub const fn to_rgb565(self) -> u16 {
        pack(self.r, self.g, self.b)
    }

    #[inline]
    pub const fn luma(self) -> u8 {
        luma(self.r, self.g, self.b)
    }
}

impl From<u16> for Rgb888 {
    fn from(pixel: u16) -> Self {
        Self::from_rgb565(pixel)
    }
}

impl From<Rgb888> for u16 {
    fn from(rgb: Rgb888) -> Self {
        rgb.to_rgb565()
    }
}
