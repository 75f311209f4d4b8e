//! Placement of a pixel slice inside a frame.

/// Describes the pixels a kernel is handed.
///
/// A kernel may be given a whole frame or a single scanline of one. Position
/// dependent kernels (vignette) use `y_offset` and `frame_height` to place
/// the rows they see; neighborhood kernels only look at the rows actually
/// present in the slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Pixels per row.
    pub width: usize,
    /// Rows present in the slice.
    pub rows: usize,
    /// Index of the first row of the slice within the frame.
    pub y_offset: usize,
    /// Height of the full frame the slice belongs to.
    pub frame_height: usize,
}

impl Geometry {
    /// A whole frame of `width` x `height` pixels.
    pub const fn frame(width: usize, height: usize) -> Self {
        Self {
            width,
            rows: height,
            y_offset: 0,
            frame_height: height,
        }
    }

    /// Row `y` of a frame that is `frame_height` rows tall.
    pub const fn scanline(width: usize, y: usize, frame_height: usize) -> Self {
        Self {
            width,
            rows: 1,
            y_offset: y,
            frame_height,
        }
    }

    /// Number of complete rows a slice of `len` pixels actually holds.
    ///
    /// Kernels never touch more than this, so a short slice cannot be read
    /// or written out of bounds.
    #[inline]
    pub fn rows_in(&self, len: usize) -> usize {
        if self.width == 0 {
            0
        } else {
            self.rows.min(len / self.width)
        }
    }

    /// Number of pixels a kernel may touch in a slice of `len` pixels.
    #[inline]
    pub fn pixels_in(&self, len: usize) -> usize {
        self.rows_in(len) * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_geometry() {
        let g = Geometry::frame(320, 240);
        assert_eq!(g.rows, 240);
        assert_eq!(g.frame_height, 240);
        assert_eq!(g.y_offset, 0);
    }

    #[test]
    fn test_scanline_geometry() {
        let g = Geometry::scanline(160, 17, 128);
        assert_eq!(g.rows, 1);
        assert_eq!(g.y_offset, 17);
        assert_eq!(g.frame_height, 128);
    }

    #[test]
    fn test_rows_in_short_slice() {
        let g = Geometry::frame(10, 10);
        assert_eq!(g.rows_in(100), 10);
        assert_eq!(g.rows_in(55), 5);
        assert_eq!(g.pixels_in(55), 50);
        assert_eq!(g.rows_in(1000), 10);
    }

    #[test]
    fn test_zero_width_touches_nothing() {
        let g = Geometry::frame(0, 10);
        assert_eq!(g.rows_in(100), 0);
        assert_eq!(g.pixels_in(100), 0);
    }
}
