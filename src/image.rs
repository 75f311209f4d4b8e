//! PNG and raw RGB565 import and export of frames.

use std::io::Cursor;
use std::path::Path;

use pixel_filters::{pack, unpack};

use crate::error::ImageError;
use crate::frame::{Frame, PixelFormat};

/// Encode RGB565 pixels as an 8-bit RGB PNG.
pub fn encode_rgb565_png(pixels: &[u16], width: usize, height: usize) -> Result<Vec<u8>, ImageError> {
    let expected = width * height;
    if pixels.len() < expected {
        return Err(ImageError::PngEncode(format!(
            "{} pixels for a {width}x{height} image",
            pixels.len()
        )));
    }
    let (png_width, png_height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(ImageError::PngEncode(format!(
                "invalid dimensions {width}x{height}"
            )))
        }
    };

    let mut rgb = Vec::with_capacity(expected * 3);
    for &pixel in &pixels[..expected] {
        let (r, g, b) = unpack(pixel);
        rgb.extend_from_slice(&[r, g, b]);
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, png_width, png_height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&rgb)
            .map_err(|e| ImageError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn encode_frame_png(frame: &Frame) -> Result<Vec<u8>, ImageError> {
    encode_rgb565_png(frame.pixels(), frame.width(), frame.height())
}

/// Decode a PNG into an RGB565 frame.
///
/// Palette, grayscale and 16-bit images are expanded to 8-bit color first;
/// alpha is dropped.
pub fn decode_png(bytes: &[u8]) -> Result<Frame, ImageError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageError::PngDecode(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let channels = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => return Err(ImageError::Unsupported(format!("{other:?}"))),
    };
    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::Unsupported(format!("{:?} bit depth", info.bit_depth)));
    }

    let (width, height) = (info.width as usize, info.height as usize);
    let pixels = data
        .chunks_exact(channels)
        .take(width * height)
        .map(|px| match channels {
            1 | 2 => pack(px[0], px[0], px[0]),
            _ => pack(px[0], px[1], px[2]),
        })
        .collect();
    Ok(Frame::new(width, height, pixels))
}

pub fn read_png(path: &Path) -> Result<Frame, ImageError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

pub fn write_png(path: &Path, frame: &Frame) -> Result<(), ImageError> {
    let bytes = encode_frame_png(frame)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

/// Dump the pixel buffer as headerless native-endian RGB565.
pub fn write_raw(path: &Path, frame: &Frame) -> Result<(), ImageError> {
    std::fs::write(path, frame.as_bytes())?;
    Ok(())
}

/// Load a headerless RGB565 dump written by [`write_raw`].
pub fn read_raw(path: &Path, width: usize, height: usize) -> Result<Frame, ImageError> {
    let bytes = std::fs::read(path)?;
    let mut pixels = vec![0u16; width * height];
    let expected = pixels.len() * PixelFormat::Rgb565.bytes_per_pixel();
    if bytes.len() != expected {
        return Err(ImageError::RawSize {
            width,
            height,
            expected,
            actual: bytes.len(),
        });
    }
    bytemuck::cast_slice_mut::<u16, u8>(&mut pixels).copy_from_slice(&bytes);
    Ok(Frame::new(width, height, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_png_preserves_rgb565() {
        let pixels: Vec<u16> = vec![0xF800, 0x07E0, 0x001F, 0xFFFF, 0x0000, 0x8410];
        let bytes = encode_rgb565_png(&pixels, 3, 2).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");

        let frame = decode_png(&bytes).unwrap();
        assert_eq!((frame.width(), frame.height()), (3, 2));
        assert_eq!(frame.pixels(), &pixels[..]);
    }

    #[test]
    fn test_encode_rejects_short_buffer() {
        assert!(matches!(
            encode_rgb565_png(&[0; 3], 2, 2),
            Err(ImageError::PngEncode(_))
        ));
    }

    #[test]
    fn test_encode_rejects_empty_image() {
        assert!(encode_rgb565_png(&[], 0, 0).is_err());
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_png(b"not a png"),
            Err(ImageError::PngDecode(_))
        ));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        let frame = Frame::filled(5, 4, 0x7BEF);
        write_png(&path, &frame).unwrap();
        assert_eq!(read_png(&path).unwrap(), frame);
    }

    #[test]
    fn test_raw_dump_is_two_bytes_per_pixel() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.raw");
        let frame = Frame::new(3, 2, vec![0xF800, 0x07E0, 0x001F, 0xFFFF, 0x0000, 0x8410]);
        write_raw(&path, &frame).unwrap();

        assert_eq!(std::fs::metadata(&path).unwrap().len(), frame.len_bytes() as u64);
        assert_eq!(read_raw(&path, 3, 2).unwrap(), frame);
    }

    #[test]
    fn test_raw_size_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.raw");
        std::fs::write(&path, [0u8; 10]).unwrap();
        assert!(matches!(
            read_raw(&path, 3, 2),
            Err(ImageError::RawSize {
                expected: 12,
                actual: 10,
                ..
            })
        ));
    }
}
