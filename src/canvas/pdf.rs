//! PDF backend: records like [`RecordingCanvas`] and serializes on finish.

use std::rc::Rc;

use crate::canvas::{Canvas, RecordedPage, RecordingCanvas};
use crate::error::Result;
use crate::geometry::{Alignment, Offset, Size};
use crate::image_loader::LoadedImage;
use crate::pdf::{Metadata, PdfWriter};
use crate::style::{Font, LineOptions};

#[derive(Debug, Default)]
pub struct PdfCanvas {
    recorder: RecordingCanvas,
    metadata: Metadata,
}

impl PdfCanvas {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            recorder: RecordingCanvas::new(),
            metadata,
        }
    }
}

impl Canvas for PdfCanvas {
    fn add_page(&mut self, size: Size) {
        self.recorder.add_page(size);
    }

    fn page_count(&self) -> usize {
        self.recorder.page_count()
    }

    fn text_width(&self, text: &str, font: &Font) -> Result<f64> {
        self.recorder.text_width(text, font)
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Offset,
        cell: Size,
        font: &Font,
        alignment: Alignment,
    ) -> Result<()> {
        self.recorder.draw_text(text, origin, cell, font, alignment)
    }

    fn draw_line(&mut self, from: Offset, to: Offset, options: &LineOptions) -> Result<()> {
        self.recorder.draw_line(from, to, options)
    }

    fn draw_image(&mut self, image: Rc<LoadedImage>, origin: Offset, size: Size) -> Result<()> {
        self.recorder.draw_image(image, origin, size)
    }

    fn display_list(&self) -> Option<&[RecordedPage]> {
        self.recorder.display_list()
    }

    fn finish(self: Box<Self>) -> Result<Vec<u8>> {
        let PdfCanvas { recorder, metadata } = *self;
        PdfWriter::new().write(recorder.pages(), &metadata)
    }
}
