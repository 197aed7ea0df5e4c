//! # Image Loading
//!
//! Turns an [`ImageSource`] into pixels the PDF writer can embed. JPEG data
//! is kept as-is and embedded with DCTDecode; PNG is decoded to RGB with a
//! separate alpha plane that becomes an SMask.

use std::io::Cursor;
use std::path::PathBuf;

use base64::Engine;

use crate::error::{LayoutError, Result};

const OPERATION: &str = "load image";

/// Where an image's encoded bytes come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Encoded JPEG or PNG bytes.
    Bytes(Vec<u8>),
    /// A file on disk.
    Path(PathBuf),
    /// A `data:image/...;base64,` URI or bare base64.
    Encoded(String),
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

/// A decoded image ready for embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

impl LoadedImage {
    /// Pixel dimensions, used as the natural size in points.
    pub fn natural_size(&self) -> (f64, f64) {
        (self.width_px as f64, self.height_px as f64)
    }
}

#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Untouched JPEG stream.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// 3 bytes per pixel, plus one alpha byte per pixel when any pixel is
    /// not fully opaque.
    Decoded { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

/// Read and decode an image from any source.
pub fn load_image(source: &ImageSource) -> Result<LoadedImage> {
    match source {
        ImageSource::Bytes(bytes) => load_image_bytes(bytes),
        ImageSource::Path(path) => {
            let bytes = std::fs::read(path).map_err(|e| {
                LayoutError::backend(OPERATION, format!("cannot read '{}': {}", path.display(), e))
            })?;
            load_image_bytes(&bytes)
        }
        ImageSource::Encoded(src) => load_image_bytes(&decode_base64_source(src)?),
    }
}

/// Strip an optional data URI prefix and decode the base64 payload.
fn decode_base64_source(src: &str) -> Result<Vec<u8>> {
    let payload = if src.starts_with("data:") {
        let comma = src
            .find(',')
            .ok_or_else(|| LayoutError::backend(OPERATION, "data URI without a comma"))?;
        &src[comma + 1..]
    } else {
        src
    };
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| LayoutError::backend(OPERATION, format!("invalid base64: {}", e)))
}

/// Sniff the format from magic bytes and decode.
pub fn load_image_bytes(data: &[u8]) -> Result<LoadedImage> {
    if data.len() < 4 {
        return Err(LayoutError::backend(OPERATION, "image data too short"));
    }
    if is_jpeg(data) {
        read_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err(LayoutError::backend(OPERATION, "unsupported format, expected JPEG or PNG"))
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.starts_with(&[0xFF, 0xD8])
}

fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, b'P', b'N', b'G'])
}

/// Dimensions only; the pixels stay compressed.
fn read_jpeg(data: &[u8]) -> Result<LoadedImage> {
    let (width, height) = image::io::Reader::with_format(Cursor::new(data), image::ImageFormat::Jpeg)
        .into_dimensions()
        .map_err(|e| LayoutError::backend(OPERATION, format!("bad JPEG header: {}", e)))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Walk the marker segments to the first start-of-frame and read its
/// component count. Anything unreadable is treated as RGB.
fn jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2;
    while i + 3 < data.len() && data[i] == 0xFF {
        let marker = data[i + 1];
        let start_of_frame = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if start_of_frame {
            return match data.get(i + 9) {
                Some(1) => JpegColorSpace::DeviceGray,
                _ => JpegColorSpace::DeviceRGB,
            };
        }
        let segment_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + segment_len;
    }
    JpegColorSpace::DeviceRGB
}

fn decode_png(data: &[u8]) -> Result<LoadedImage> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)
        .map_err(|e| LayoutError::backend(OPERATION, format!("bad PNG: {}", e)))?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel.0[3]);
    }
    let opaque = alpha.iter().all(|&a| a == u8::MAX);

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn png_bytes(width: u32, height: u32, alpha: u8) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, alpha]));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn magic_bytes() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(is_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_png(&[0x89, 0x50]));
    }

    #[test]
    fn rejects_short_and_unknown_data() {
        assert!(matches!(
            load_image_bytes(&[0x00, 0x01]),
            Err(LayoutError::Backend { .. })
        ));
        assert!(load_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
        assert!(load_image(&ImageSource::Encoded("data:image/png;base64".into())).is_err());
    }

    #[test]
    fn opaque_png_has_no_alpha() {
        let loaded = load_image_bytes(&png_bytes(2, 1, 255)).unwrap();
        assert_eq!(loaded.natural_size(), (2.0, 1.0));
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0, 255, 0, 0]);
                assert!(alpha.is_none());
            }
            _ => panic!("PNG should decode to pixels"),
        }
    }

    #[test]
    fn translucent_png_keeps_alpha() {
        let loaded = load_image_bytes(&png_bytes(1, 1, 128)).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { alpha, .. } => assert_eq!(alpha.as_deref(), Some(&[128u8][..])),
            _ => panic!("PNG should decode to pixels"),
        }
    }

    #[test]
    fn data_uri_round_trips_through_base64() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(png_bytes(3, 2, 255));
        let uri = format!("data:image/png;base64,{}", encoded);
        let loaded = load_image(&ImageSource::Encoded(uri)).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (3, 2));
    }

    #[test]
    fn jpeg_passes_through() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        image::codecs::jpeg::JpegEncoder::new(&mut buf)
            .encode(img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let loaded = load_image_bytes(&buf).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                assert_eq!(data, &buf);
                assert_eq!(*color_space, JpegColorSpace::DeviceRGB);
            }
            _ => panic!("JPEG should pass through"),
        }
    }

    #[test]
    fn missing_file_is_a_backend_error() {
        let err = load_image(&ImageSource::Path(PathBuf::from("/nonexistent/logo.png"))).unwrap_err();
        assert!(err.to_string().contains("logo.png"));
    }
}
