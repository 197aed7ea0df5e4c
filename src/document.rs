//! # Document Assembly
//!
//! [`Document`] collects the page setup and the header, body and footer
//! trees, then drives a [`DocumentRenderer`] through them:
//!
//! 1. header: drawn at the top of page 1, and of every page when repeating
//! 2. footer: drawn at the bottom of every page when repeating, otherwise
//!    once at the end
//! 3. body: one paginating column measured against the space the header and
//!    footer leave, re-measured from the first child of every new page

use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::canvas::{Canvas, PdfCanvas};
use crate::error::{LayoutError, Result};
use crate::geometry::{EdgeInsets, PageSize, Size, MAX_SIZE};
use crate::layout::{Column, Element, Elements, OverflowMode};
use crate::pdf::Metadata;
use crate::renderer::{DocumentRenderer, RendererOptions};
use crate::style::Font;

/// A header or footer: a fixed-height band of elements.
pub struct DocumentRegion {
    pub height: f64,
    /// Draw on every page rather than once.
    pub repeat: bool,
    pub elements: Elements,
}

impl DocumentRegion {
    pub fn new(height: f64, repeat: bool) -> Self {
        Self {
            height,
            repeat,
            elements: Vec::new(),
        }
    }

    pub fn child(mut self, element: impl Element + 'static) -> Self {
        self.elements.push(Box::new(element));
        self
    }

    /// Stack the elements in a column spanning the region.
    fn into_column(self) -> Box<dyn Element> {
        Box::new(
            Column::new()
                .with_size(Size::new(MAX_SIZE, self.height))
                .with_children(self.elements),
        )
    }
}

pub struct Document {
    options: RendererOptions,
    metadata: Metadata,
    header: Option<DocumentRegion>,
    footer: Option<DocumentRegion>,
    body: Elements,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An A4 document with 54pt margins.
    pub fn new() -> Self {
        Self::with_options(RendererOptions::default())
    }

    pub fn with_options(options: RendererOptions) -> Self {
        Self {
            options,
            metadata: Metadata::default(),
            header: None,
            footer: None,
            body: Vec::new(),
        }
    }

    pub fn page_size(mut self, page_size: PageSize) -> Self {
        self.options.page_size = page_size.size();
        self
    }

    pub fn custom_page_size(mut self, size: Size) -> Self {
        self.options.page_size = size;
        self
    }

    pub fn padding(mut self, padding: EdgeInsets) -> Self {
        self.options.padding = padding;
        self
    }

    pub fn default_font(mut self, font: Font) -> Self {
        self.options.default_font = font;
        self
    }

    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn header(mut self, header: DocumentRegion) -> Self {
        self.header = Some(header);
        self
    }

    pub fn footer(mut self, footer: DocumentRegion) -> Self {
        self.footer = Some(footer);
        self
    }

    pub fn child(mut self, element: impl Element + 'static) -> Self {
        self.body.push(Box::new(element));
        self
    }

    pub fn push(&mut self, element: Box<dyn Element>) {
        self.body.push(element);
    }

    /// Header and footer must leave room for the body on the padded page.
    fn validate(&self) -> Result<()> {
        let padded = self.options.page_size.with_padding(self.options.padding);
        let header = self.header.as_ref().map(|h| h.height).unwrap_or(0.0);
        let footer = self.footer.as_ref().map(|f| f.height).unwrap_or(0.0);
        if padded.has_zero_value() || !padded.is_valid() || header < 0.0 || footer < 0.0 || header + footer > padded.height {
            return Err(LayoutError::InvalidSize {
                element: "Document",
                width: padded.width,
                height: padded.height - header - footer,
            });
        }
        Ok(())
    }

    /// Lay the document out into `canvas` and return the finished renderer,
    /// for inspection or to call [`DocumentRenderer::finish`] on.
    pub fn render_with(self, canvas: Box<dyn Canvas>) -> Result<DocumentRenderer> {
        self.validate()?;
        let Document {
            options,
            header,
            footer,
            body,
            ..
        } = self;
        let mut renderer = DocumentRenderer::new(options, canvas);

        if let Some(header) = header.filter(|h| h.height > 0.0) {
            let (height, repeat) = (header.height, header.repeat);
            renderer.set_header(height, header.into_column(), repeat)?;
        }
        if let Some(footer) = footer.filter(|f| f.height > 0.0) {
            let (height, repeat) = (footer.height, footer.repeat);
            renderer.set_footer(height, footer.into_column(), repeat)?;
        }

        let mut column = Column::new()
            .named("body")
            .with_size(Size::max_width())
            .overflow(OverflowMode::ContinueOnNextPage)
            .page_body()
            .with_children(body);
        column.measure(renderer.body_boundary(), &renderer)?;
        renderer.set_body_height(column.size().height);
        column.render(&mut renderer)?;
        renderer.finalize()?;

        debug!(pages = renderer.current_page(), "document laid out");
        Ok(renderer)
    }

    /// Render to PDF bytes.
    pub fn write(self) -> Result<Vec<u8>> {
        let canvas = PdfCanvas::new(self.metadata.clone());
        self.render_with(Box::new(canvas))?.finish()
    }

    /// Render to PDF and write it out; returns the number of bytes written.
    pub fn write_to<W: Write>(self, writer: &mut W) -> Result<u64> {
        let bytes = self.write()?;
        writer.write_all(&bytes)?;
        Ok(bytes.len() as u64)
    }

    pub fn save(self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.write()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::layout::testing::Block;

    #[test]
    fn oversized_regions_are_rejected() {
        let doc = Document::new()
            .header(DocumentRegion::new(400.0, true))
            .footer(DocumentRegion::new(400.0, true));
        assert!(matches!(
            doc.render_with(Box::new(RecordingCanvas::new())),
            Err(LayoutError::InvalidSize { element: "Document", .. })
        ));
    }

    #[test]
    fn empty_document_has_one_page() {
        let renderer = Document::new()
            .render_with(Box::new(RecordingCanvas::new()))
            .unwrap();
        assert_eq!(renderer.pages().unwrap().len(), 1);
    }

    #[test]
    fn write_to_reports_length() {
        let mut out = Vec::new();
        let written = Document::new()
            .child(Block::new(100.0, 20.0))
            .write_to(&mut out)
            .unwrap();
        assert_eq!(written, out.len() as u64);
        assert!(out.starts_with(b"%PDF-1.7"));
    }
}
