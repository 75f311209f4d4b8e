//! Whole-frame filtering outside the realtime loop, e.g. before a frame is
//! saved.

use pixel_filters::fast::{lut_grayscale, lut_sepia};
use pixel_filters::{FilterChain, FilterSettings, Geometry, PixelFilter};

use super::scanline::{self, FIXED_SHIFT};
use super::FilterMode;
use crate::error::{PipelineError, ScanlineError};
use crate::frame::Frame;

fn frame_geometry(frame: &Frame) -> Result<Geometry, PipelineError> {
    let (width, height) = (frame.width(), frame.height());
    let expected = width.checked_mul(height).unwrap_or(usize::MAX);
    let actual = frame.pixels().len();
    if actual < expected {
        return Err(PipelineError::InvalidFrame {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(Geometry::frame(width, height))
}

pub fn apply_grayscale(frame: &mut Frame) -> Result<(), PipelineError> {
    let geometry = frame_geometry(frame)?;
    lut_grayscale(frame.pixels_mut(), geometry);
    Ok(())
}

pub fn apply_sepia(frame: &mut Frame) -> Result<(), PipelineError> {
    let geometry = frame_geometry(frame)?;
    lut_sepia(frame.pixels_mut(), geometry);
    Ok(())
}

/// Darken towards the corners with the configured strength and floor.
pub fn apply_vignette(frame: &mut Frame, settings: &FilterSettings) -> Result<(), PipelineError> {
    let geometry = frame_geometry(frame)?;
    pixel_filters::kernels::vignette(
        frame.pixels_mut(),
        geometry,
        settings.vignette_strength_q8,
        settings.vignette_min_factor,
    );
    Ok(())
}

/// Run any filter over the whole frame.
pub fn apply_filter<F: PixelFilter + ?Sized>(frame: &mut Frame, filter: &mut F) -> Result<(), PipelineError> {
    let geometry = frame_geometry(frame)?;
    tracing::debug!(filter = filter.name(), width = geometry.width, height = geometry.rows, "Filtering frame");
    filter.apply(frame.pixels_mut(), geometry);
    Ok(())
}

/// Run `chain` over the whole frame.
///
/// In [`FilterMode::Viewfinder`] the frame must already fit within
/// `max_width` x `max_height`; a larger one is refused and left untouched.
/// [`FilterMode::Capture`] accepts any size.
pub fn apply_chain<F: PixelFilter, const N: usize>(
    frame: &mut Frame,
    chain: &mut FilterChain<F, N>,
    mode: FilterMode,
    max_width: usize,
    max_height: usize,
) -> Result<(), PipelineError> {
    let geometry = frame_geometry(frame)?;
    if mode == FilterMode::Viewfinder && (geometry.width > max_width || geometry.rows > max_height) {
        tracing::warn!(
            width = geometry.width,
            height = geometry.rows,
            max_width,
            max_height,
            "Viewfinder frame larger than the display, not filtering"
        );
        return Err(PipelineError::OversizedViewfinderFrame {
            width: geometry.width,
            height: geometry.rows,
            max_width,
            max_height,
        });
    }
    chain.process(frame.pixels_mut(), geometry);
    Ok(())
}

/// Nearest-neighbor reduce a whole frame to `dst_width` x `dst_height`.
///
/// Same 16.16 sampling as the scanline stage, so a downscaled frame
/// matches what the display would show row for row.
pub fn downscale_frame(src: &Frame, dst_width: usize, dst_height: usize) -> Result<Frame, PipelineError> {
    frame_geometry(src)?;
    let (src_width, src_height) = (src.width(), src.height());
    scanline::check_widths(src_width, dst_width, dst_width)?;
    if dst_height == 0 || dst_height > src_height {
        return Err(ScanlineError::Height {
            src_height,
            dst_height,
        }
        .into());
    }

    let hscale = scanline::scale_factor(src_width, dst_width);
    let vscale = scanline::scale_factor(src_height, dst_height);
    let mut pixels = Vec::with_capacity(dst_width * dst_height);
    for y in 0..dst_height {
        let row = scanline::source_row(y, vscale, src_height) * src_width;
        pixels.extend(
            (0..dst_width).map(|x| src.pixels()[row + ((x as u64 * hscale) >> FIXED_SHIFT) as usize]),
        );
    }
    Ok(Frame::new(dst_width, dst_height, pixels))
}
