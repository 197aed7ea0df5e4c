//! In-memory backend that records draw calls per page.

use std::rc::Rc;

use crate::canvas::{Canvas, DrawOp, RecordedPage};
use crate::error::{LayoutError, Result};
use crate::font;
use crate::geometry::{Alignment, Offset, Size};
use crate::image_loader::LoadedImage;
use crate::style::{Font, LineOptions};

/// Records every draw call and measures text with the standard font tables.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pages: Vec<RecordedPage>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<RecordedPage> {
        self.pages
    }

    fn current(&mut self, operation: &'static str) -> Result<&mut RecordedPage> {
        self.pages
            .last_mut()
            .ok_or_else(|| LayoutError::backend(operation, "no page has been started"))
    }
}

impl Canvas for RecordingCanvas {
    fn add_page(&mut self, size: Size) {
        let number = self.pages.len() + 1;
        self.pages.push(RecordedPage {
            number,
            size,
            ops: Vec::new(),
        });
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn text_width(&self, text: &str, font: &Font) -> Result<f64> {
        Ok(font::measure_text(text, font))
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Offset,
        cell: Size,
        font: &Font,
        alignment: Alignment,
    ) -> Result<()> {
        let width = self.text_width(text, font)?;
        let line_height = self.line_height(font);
        let shift = alignment.offset_within(Size::new(cell.width - width, cell.height - line_height));
        let page = self.current("draw text")?;
        page.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin: origin.translate(shift.x, shift.y),
            width,
            line_height,
            font: font.clone(),
        });
        Ok(())
    }

    fn draw_line(&mut self, from: Offset, to: Offset, options: &LineOptions) -> Result<()> {
        let page = self.current("draw line")?;
        page.ops.push(DrawOp::Line {
            from,
            to,
            options: *options,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: Rc<LoadedImage>, origin: Offset, size: Size) -> Result<()> {
        let page = self.current("draw image")?;
        page.ops.push(DrawOp::Image {
            origin,
            size,
            image,
        });
        Ok(())
    }

    fn display_list(&self) -> Option<&[RecordedPage]> {
        Some(&self.pages)
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(&self.pages)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drawing_before_a_page_fails() {
        let mut canvas = RecordingCanvas::new();
        let err = canvas
            .draw_line(Offset::new(0.0, 0.0), Offset::new(1.0, 0.0), &LineOptions::default())
            .unwrap_err();
        assert!(matches!(err, LayoutError::Backend { .. }));
    }

    #[test]
    fn text_alignment_inside_cell() {
        let mut canvas = RecordingCanvas::new();
        canvas.add_page(Size::new(200.0, 200.0));
        let font = Font::new("Courier", 10.0);
        // "abcd" in Courier 10pt is 24pt wide, line height 12pt.
        canvas
            .draw_text("abcd", Offset::new(10.0, 10.0), Size::new(100.0, 20.0), &font, Alignment::RIGHT)
            .unwrap();
        canvas
            .draw_text("abcd", Offset::new(10.0, 10.0), Size::new(100.0, 20.0), &font, Alignment::CENTER)
            .unwrap();

        let origins: Vec<Offset> = canvas.pages()[0].texts().map(|(_, o)| o).collect();
        assert!((origins[0].x - 86.0).abs() < 1e-9);
        assert!((origins[0].y - 10.0).abs() < 1e-9);
        assert!((origins[1].x - 48.0).abs() < 1e-9);
        assert!((origins[1].y - 14.0).abs() < 1e-9);
    }

    #[test]
    fn finish_emits_json() {
        let mut canvas = Box::new(RecordingCanvas::new());
        canvas.add_page(Size::new(100.0, 100.0));
        canvas
            .draw_line(Offset::new(0.0, 0.0), Offset::new(10.0, 0.0), &LineOptions::default())
            .unwrap();
        let bytes = canvas.finish().unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json[0]["number"], 1);
        assert_eq!(json[0]["ops"][0]["op"], "line");
    }
}
