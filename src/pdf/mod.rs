//! # PDF Serializer
//!
//! Turns recorded pages into a PDF 1.7 file. The writer is self-contained:
//! it emits the object table, content streams and cross-reference table
//! itself and only leans on `miniz_oxide` for stream compression.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree, fonts, images, pages
//! ...
//! xref                <- byte offsets of every object
//! trailer             <- root and info references
//! %%EOF
//! ```
//!
//! Text uses the standard Type1 fonts with WinAnsiEncoding, so nothing is
//! embedded. Page coordinates are flipped here: the engine works top-down,
//! PDF user space grows upward from the bottom-left corner.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;
use std::rc::Rc;

use miniz_oxide::deflate::compress_to_vec_zlib;
use serde::{Deserialize, Serialize};

use crate::canvas::{DrawOp, RecordedPage};
use crate::error::Result;
use crate::font::StandardFont;
use crate::image_loader::{ImagePixelData, JpegColorSpace, LoadedImage};
use crate::style::{LineOptions, LineStyle};

/// Document information dictionary entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
}

impl Metadata {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.subject.is_none() && self.creator.is_none()
    }
}

/// Fraction of the font size between the top of the em box and the baseline.
const ASCENT: f64 = 0.8;

pub struct PdfWriter;

/// Tracks allocated PDF objects during writing.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Font -> object id; the BTreeMap order fixes the /Fn resource names.
    fonts: BTreeMap<StandardFont, usize>,
    /// Image identity (Rc pointer) -> (resource index, object id).
    images: HashMap<*const LoadedImage, (usize, usize)>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Write recorded pages to a PDF byte vector.
    pub fn write(&self, pages: &[RecordedPage], metadata: &Metadata) -> Result<Vec<u8>> {
        let mut builder = PdfBuilder {
            objects: Vec::new(),
            fonts: BTreeMap::new(),
            images: HashMap::new(),
        };

        // 0 = placeholder (objects are 1-indexed), 1 = Catalog, 2 = Pages
        for _ in 0..3 {
            builder.objects.push(PdfObject { data: vec![] });
        }

        self.register_fonts(&mut builder, pages);
        self.register_images(&mut builder, pages);

        let font_resources = self.build_font_resource_dict(&builder);
        let mut page_obj_ids: Vec<usize> = Vec::new();

        for page in pages {
            let content = self.build_content_stream(page, &builder);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_obj_id = builder.objects.len();
            let mut content_data: Vec<u8> = Vec::new();
            let _ = write!(
                content_data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            content_data.extend_from_slice(&compressed);
            content_data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: content_data });

            let xobjects = self.build_xobject_resource_dict(page, &builder);
            let resources = if xobjects.is_empty() {
                format!("/Font << {} >>", font_resources)
            } else {
                format!("/Font << {} >> /XObject << {} >>", font_resources, xobjects)
            };
            let page_obj_id = builder.objects.len();
            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.size.width, page.size.height, content_obj_id, resources
            );
            builder.objects.push(PdfObject {
                data: page_dict.into_bytes(),
            });
            page_obj_ids.push(page_obj_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = if metadata.is_empty() {
            None
        } else {
            let id = builder.objects.len();
            let mut info = String::from("<< ");
            let entries = [
                ("Title", &metadata.title),
                ("Author", &metadata.author),
                ("Subject", &metadata.subject),
                ("Creator", &metadata.creator),
            ];
            for (key, value) in entries {
                if let Some(value) = value {
                    let _ = write!(info, "/{} ({}) ", key, Self::encode_text(value));
                }
            }
            info.push_str("/Producer (pagewright) >>");
            builder.objects.push(PdfObject {
                data: info.into_bytes(),
            });
            Some(id)
        };

        Ok(self.serialize(&builder, info_obj_id))
    }

    /// One Type1 font object per distinct standard font drawn anywhere.
    fn register_fonts(&self, builder: &mut PdfBuilder, pages: &[RecordedPage]) {
        let mut used: Vec<StandardFont> = pages
            .iter()
            .flat_map(|p| p.ops.iter())
            .filter_map(|op| match op {
                DrawOp::Text { font, .. } => Some(StandardFont::resolve(font)),
                _ => None,
            })
            .collect();
        if used.is_empty() {
            used.push(StandardFont::Helvetica);
        }
        used.sort();
        used.dedup();

        for font in used {
            let id = builder.objects.len();
            let dict = format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.pdf_name()
            );
            builder.objects.push(PdfObject {
                data: dict.into_bytes(),
            });
            builder.fonts.insert(font, id);
        }
    }

    /// Images are written once per distinct `Rc`, however often they are drawn.
    fn register_images(&self, builder: &mut PdfBuilder, pages: &[RecordedPage]) {
        for op in pages.iter().flat_map(|p| p.ops.iter()) {
            if let DrawOp::Image { image, .. } = op {
                let key = Rc::as_ptr(image);
                if builder.images.contains_key(&key) {
                    continue;
                }
                let index = builder.images.len();
                let obj_id = Self::write_image_xobject(builder, image);
                builder.images.insert(key, (index, obj_id));
            }
        }
    }

    fn write_image_xobject(builder: &mut PdfBuilder, image: &LoadedImage) -> usize {
        match &image.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                let color_space_str = match color_space {
                    JpegColorSpace::DeviceRGB => "/DeviceRGB",
                    JpegColorSpace::DeviceGray => "/DeviceGray",
                };
                let obj_id = builder.objects.len();
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace {} /BitsPerComponent 8 /Filter /DCTDecode /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    color_space_str,
                    data.len()
                );
                obj_data.extend_from_slice(data);
                obj_data.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj_data });
                obj_id
            }

            ImagePixelData::Decoded { rgb, alpha } => {
                let smask_id = alpha.as_ref().map(|alpha_data| {
                    let compressed_alpha = compress_to_vec_zlib(alpha_data, 6);
                    let smask_obj_id = builder.objects.len();
                    let mut smask_data: Vec<u8> = Vec::new();
                    let _ = write!(
                        smask_data,
                        "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                         /ColorSpace /DeviceGray /BitsPerComponent 8 /Filter /FlateDecode /Length {} >>\nstream\n",
                        image.width_px,
                        image.height_px,
                        compressed_alpha.len()
                    );
                    smask_data.extend_from_slice(&compressed_alpha);
                    smask_data.extend_from_slice(b"\nendstream");
                    builder.objects.push(PdfObject { data: smask_data });
                    smask_obj_id
                });

                let compressed_rgb = compress_to_vec_zlib(rgb, 6);
                let obj_id = builder.objects.len();
                let smask_ref = smask_id
                    .map(|id| format!(" /SMask {} 0 R", id))
                    .unwrap_or_default();
                let mut obj_data: Vec<u8> = Vec::new();
                let _ = write!(
                    obj_data,
                    "<< /Type /XObject /Subtype /Image /Width {} /Height {} \
                     /ColorSpace /DeviceRGB /BitsPerComponent 8 /Filter /FlateDecode /Length {}{} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed_rgb.len(),
                    smask_ref
                );
                obj_data.extend_from_slice(&compressed_rgb);
                obj_data.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj_data });
                obj_id
            }
        }
    }

    fn build_content_stream(&self, page: &RecordedPage, builder: &PdfBuilder) -> String {
        let mut stream = String::new();
        let page_height = page.size.height;

        for op in &page.ops {
            match op {
                DrawOp::Text {
                    text,
                    origin,
                    line_height,
                    font,
                    ..
                } => {
                    let standard = StandardFont::resolve(font);
                    let font_index = builder.fonts.keys().position(|f| *f == standard).unwrap_or(0);
                    let baseline = origin.y + (line_height - font.size) / 2.0 + font.size * ASCENT;
                    let _ = write!(
                        stream,
                        "BT\n0 0 0 rg\n/F{} {:.2} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                        font_index,
                        font.size,
                        origin.x,
                        page_height - baseline,
                        Self::encode_text(text)
                    );
                }
                DrawOp::Line { from, to, options } => {
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n{}\n{:.2} {:.2} m\n{:.2} {:.2} l\nS\nQ\n",
                        options.color.r,
                        options.color.g,
                        options.color.b,
                        options.stroke_width,
                        Self::dash_pattern(options),
                        from.x,
                        page_height - from.y,
                        to.x,
                        page_height - to.y
                    );
                }
                DrawOp::Image {
                    origin,
                    size,
                    image,
                } => {
                    if let Some((index, _)) = builder.images.get(&Rc::as_ptr(image)) {
                        let _ = write!(
                            stream,
                            "q\n{:.2} 0 0 {:.2} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                            size.width,
                            size.height,
                            origin.x,
                            page_height - origin.y - size.height,
                            index
                        );
                    }
                }
            }
        }

        stream
    }

    fn dash_pattern(options: &LineOptions) -> &'static str {
        match options.style {
            LineStyle::Solid => "[] 0 d",
            LineStyle::Dashed => "[3 3] 0 d",
            LineStyle::Dotted => "1 J [0 2] 0 d",
        }
    }

    fn build_font_resource_dict(&self, builder: &PdfBuilder) -> String {
        builder
            .fonts
            .values()
            .enumerate()
            .map(|(i, id)| format!("/F{} {} 0 R", i, id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// /XObject entries for the images drawn on `page`.
    fn build_xobject_resource_dict(&self, page: &RecordedPage, builder: &PdfBuilder) -> String {
        let mut used: Vec<(usize, usize)> = page
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Image { image, .. } => builder.images.get(&Rc::as_ptr(image)).copied(),
                _ => None,
            })
            .collect();
        used.sort();
        used.dedup();
        used.iter()
            .map(|(index, id)| format!("/Im{} {} 0 R", index, id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Encode a string as the body of a PDF literal string in WinAnsi.
    /// Bytes above 0x7E become octal escapes so the stream stays ASCII.
    fn encode_text(s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for ch in s.chars() {
            match Self::unicode_to_winansi(ch) {
                Some(b'\\') => out.push_str("\\\\"),
                Some(b'(') => out.push_str("\\("),
                Some(b')') => out.push_str("\\)"),
                Some(b) if b < 0x7F => out.push(b as char),
                Some(b) => {
                    let _ = write!(out, "\\{:03o}", b);
                }
                None => out.push('?'),
            }
        }
        out
    }

    /// Map a Unicode codepoint to a WinAnsiEncoding byte value.
    fn unicode_to_winansi(ch: char) -> Option<u8> {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
            return Some(cp as u8);
        }
        match cp {
            0x20AC => Some(0x80), // Euro sign
            0x201A => Some(0x82),
            0x0192 => Some(0x83),
            0x201E => Some(0x84),
            0x2026 => Some(0x85), // Horizontal ellipsis
            0x2020 => Some(0x86),
            0x2021 => Some(0x87),
            0x02C6 => Some(0x88),
            0x2030 => Some(0x89),
            0x0160 => Some(0x8A),
            0x2039 => Some(0x8B),
            0x0152 => Some(0x8C),
            0x017D => Some(0x8E),
            0x2018 => Some(0x91),
            0x2019 => Some(0x92),
            0x201C => Some(0x93),
            0x201D => Some(0x94),
            0x2022 => Some(0x95), // Bullet
            0x2013 => Some(0x96),
            0x2014 => Some(0x97),
            0x02DC => Some(0x98),
            0x2122 => Some(0x99),
            0x0161 => Some(0x9A),
            0x203A => Some(0x9B),
            0x0153 => Some(0x9C),
            0x017E => Some(0x9E),
            0x0178 => Some(0x9F),
            _ => None,
        }
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Offset, Size};
    use crate::style::Font;

    fn blank_page() -> RecordedPage {
        RecordedPage {
            number: 1,
            size: Size::new(595.28, 841.89),
            ops: vec![],
        }
    }

    fn inflate(stream: &[u8]) -> String {
        let raw = miniz_oxide::inflate::decompress_to_vec_zlib(stream).unwrap();
        String::from_utf8(raw).unwrap()
    }

    /// First content stream in the file, decompressed.
    fn first_content_stream(bytes: &[u8]) -> String {
        let start = bytes.windows(7).position(|w| w == b"stream\n").unwrap() + 7;
        let end = start + bytes[start..].windows(10).position(|w| w == b"\nendstream").unwrap();
        inflate(&bytes[start..end])
    }

    #[test]
    fn test_encode_text() {
        assert_eq!(PdfWriter::encode_text("Hello (World)"), "Hello \\(World\\)");
        assert_eq!(PdfWriter::encode_text("back\\slash"), "back\\\\slash");
        assert_eq!(PdfWriter::encode_text("10 €"), "10 \\200");
        assert_eq!(PdfWriter::encode_text("日"), "?");
    }

    #[test]
    fn test_empty_document_produces_valid_pdf() {
        let bytes = PdfWriter::new().write(&[blank_page()], &Metadata::default()).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.7"));
        assert!(bytes.windows(5).any(|w| w == b"%%EOF"));
        assert!(bytes.windows(4).any(|w| w == b"xref"));
        assert!(bytes.windows(7).any(|w| w == b"trailer"));
    }

    #[test]
    fn test_metadata_in_pdf() {
        let metadata = Metadata {
            title: Some("Quarterly Report".to_string()),
            author: Some("Finance".to_string()),
            subject: None,
            creator: None,
        };
        let bytes = PdfWriter::new().write(&[blank_page()], &metadata).unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("/Title (Quarterly Report)"));
        assert!(text.contains("/Author (Finance)"));
        assert!(text.contains("/Info"));
    }

    #[test]
    fn test_text_and_lines_are_flipped_to_pdf_space() {
        let mut page = blank_page();
        page.ops.push(DrawOp::Text {
            text: "Hi".to_string(),
            origin: Offset::new(54.0, 100.0),
            width: 10.0,
            line_height: 12.0,
            font: Font::new("Helvetica", 10.0).bold(),
        });
        page.ops.push(DrawOp::Line {
            from: Offset::new(0.0, 41.89),
            to: Offset::new(100.0, 41.89),
            options: LineOptions::new(1.0, LineStyle::Dashed, Default::default()),
        });
        let bytes = PdfWriter::new().write(&[page], &Metadata::default()).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Helvetica-Bold"));

        let content = first_content_stream(&bytes);
        // baseline = 100 + 1 + 8 = 109 from the top
        assert!(content.contains("54.00 732.89 Td"));
        assert!(content.contains("(Hi) Tj"));
        assert!(content.contains("[3 3] 0 d"));
        assert!(content.contains("0.00 800.00 m"));
    }

    #[test]
    fn test_one_font_object_per_face() {
        let mut page = blank_page();
        for family in ["Times", "Times", "Courier"] {
            page.ops.push(DrawOp::Text {
                text: "x".to_string(),
                origin: Offset::new(0.0, 0.0),
                width: 1.0,
                line_height: 12.0,
                font: Font::new(family, 10.0),
            });
        }
        let bytes = PdfWriter::new().write(&[page], &Metadata::default()).unwrap();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/Subtype /Type1").count(), 2);
        assert!(text.contains("/F1 "));
    }
}
