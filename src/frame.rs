//! Captured frames and scoped frame acquisition.
//!
//! Frames live in slow memory and are owned by a [`FrameSource`]. The
//! pipeline borrows them through [`FrameGuard`], which hands the frame back
//! to its source when dropped, on every exit path.

use serde::Serialize;
use std::ops::Deref;

/// Packed pixel layout of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PixelFormat {
    /// 5 bits red, 6 bits green, 5 bits blue
    Rgb565,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
        }
    }
}

/// An owned RGB565 image.
///
/// The buffer length is not checked against `width * height` here; the
/// pipeline validates it on every call and rejects short frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pixels: Box<[u16]>,
    width: usize,
    height: usize,
    format: PixelFormat,
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: Vec<u16>) -> Self {
        Self {
            pixels: pixels.into_boxed_slice(),
            width,
            height,
            format: PixelFormat::Rgb565,
        }
    }

    /// A frame of a single color.
    pub fn filled(width: usize, height: usize, pixel: u16) -> Self {
        Self::new(width, height, vec![pixel; width * height])
    }

    /// A zero-sized placeholder; does not allocate.
    pub fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u16] {
        &mut self.pixels
    }

    /// Row `y`, if the buffer holds it completely.
    pub fn row(&self, y: usize) -> Option<&[u16]> {
        let start = y.checked_mul(self.width)?;
        self.pixels.get(start..start + self.width)
    }

    /// Buffer size in bytes.
    pub fn len_bytes(&self) -> usize {
        self.as_bytes().len()
    }

    /// The pixel buffer as native-endian bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels[..])
    }

    pub fn into_pixels(self) -> Box<[u16]> {
        self.pixels
    }
}

/// A producer of frames, such as a camera sensor.
pub trait FrameSource {
    /// Grab the next frame; `None` when capture failed.
    fn capture(&mut self) -> Option<Frame>;

    /// Return a frame obtained from [`capture`](FrameSource::capture).
    fn release(&mut self, frame: Frame);
}

impl<S: FrameSource + ?Sized> FrameSource for &mut S {
    fn capture(&mut self) -> Option<Frame> {
        (**self).capture()
    }

    fn release(&mut self, frame: Frame) {
        (**self).release(frame)
    }
}

/// Exclusive hold on one captured frame.
///
/// Mutably borrows its source, so no second frame can be captured while the
/// guard is alive. Released back to the source when dropped.
pub struct FrameGuard<'a, S: FrameSource + ?Sized> {
    source: &'a mut S,
    frame: Frame,
}

impl<'a, S: FrameSource + ?Sized> FrameGuard<'a, S> {
    /// Capture a frame; `None` if the source has nothing to give.
    pub fn acquire(source: &'a mut S) -> Option<Self> {
        let frame = source.capture()?;
        Some(Self { source, frame })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl<S: FrameSource + ?Sized> Deref for FrameGuard<'_, S> {
    type Target = Frame;

    fn deref(&self) -> &Frame {
        &self.frame
    }
}

impl<S: FrameSource + ?Sized> Drop for FrameGuard<'_, S> {
    fn drop(&mut self) {
        let frame = std::mem::replace(&mut self.frame, Frame::empty());
        self.source.release(frame);
    }
}
