//! Product lookup tables for the LUT kernel set
//!
//! Tables are generated at compile time by build.rs. Each entry holds the
//! unshifted Q8 product `i * coeff`, so summing a pixel's table reads and
//! shifting once gives exactly the result of the multiply-then-shift
//! kernels in [`crate::kernels`].

include!(concat!(env!("OUT_DIR"), "/filter_lut.rs"));

/// Luminance via three table reads.
#[inline(always)]
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = LUMA_R[r as usize] as u32 + LUMA_G[g as usize] as u32 + LUMA_B[b as usize] as u32;
    (sum >> 8) as u8
}

/// Sepia matrix via nine table reads, saturated to 255 per channel.
#[inline(always)]
pub fn sepia(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as usize, g as usize, b as usize);
    let tr = (SEPIA_RR[r] as u32 + SEPIA_RG[g] as u32 + SEPIA_RB[b] as u32) >> 8;
    let tg = (SEPIA_GR[r] as u32 + SEPIA_GG[g] as u32 + SEPIA_GB[b] as u32) >> 8;
    let tb = (SEPIA_BR[r] as u32 + SEPIA_BG[g] as u32 + SEPIA_BB[b] as u32) >> 8;
    (tr.min(255) as u8, tg.min(255) as u8, tb.min(255) as u8)
}

/// Blend one channel toward its luminance with the warm-tone ratio.
#[inline(always)]
pub fn desaturate(channel: u8, lum: u8) -> u8 {
    ((WARM_KEEP[channel as usize] as u32 + WARM_MIX[lum as usize] as u32) >> 8) as u8
}
