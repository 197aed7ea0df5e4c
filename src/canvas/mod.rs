//! # Canvas Backends
//!
//! The layout engine never writes bytes itself. It positions boxes and hands
//! absolute draw calls to a [`Canvas`], which also answers the text metric
//! questions measurement needs. Coordinates are points from the top-left
//! corner of the page, y growing downward.
//!
//! Two backends ship with the crate:
//!
//! - [`RecordingCanvas`] keeps every draw call as a [`DrawOp`] per page. Tests
//!   assert on it and `finish` dumps it as JSON.
//! - [`PdfCanvas`] records the same way and serializes to PDF on `finish`.

pub mod pdf;
pub mod recording;

use std::rc::Rc;

use serde::Serialize;

use crate::error::Result;
use crate::geometry::{Alignment, Offset, Size};
use crate::image_loader::LoadedImage;
use crate::style::{Font, LineOptions};
use crate::text::wrap::{self, WrapMode};

pub use pdf::PdfCanvas;
pub use recording::RecordingCanvas;

/// One drawing instruction at absolute page coordinates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    /// A single line of text. `origin` is the top-left of the line box after
    /// alignment; `width` is the measured advance of `text`.
    Text {
        text: String,
        origin: Offset,
        width: f64,
        line_height: f64,
        font: Font,
    },
    Line {
        from: Offset,
        to: Offset,
        options: LineOptions,
    },
    Image {
        origin: Offset,
        size: Size,
        #[serde(skip)]
        image: Rc<LoadedImage>,
    },
}

/// Everything drawn on one page.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedPage {
    /// 1-based.
    pub number: usize,
    pub size: Size,
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    /// Text runs on this page, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, Offset)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, origin, .. } => Some((text.as_str(), *origin)),
            _ => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (Offset, Offset)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Line { from, to, .. } => Some((*from, *to)),
            _ => None,
        })
    }

    /// Whether a text run equal to `needle` was drawn here.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().any(|(t, _)| t == needle)
    }
}

/// The output backend the layout engine draws into.
pub trait Canvas {
    /// Start a new page; subsequent draws land on it.
    fn add_page(&mut self, size: Size);

    fn page_count(&self) -> usize;

    /// Advance width of `text` in points.
    fn text_width(&self, text: &str, font: &Font) -> Result<f64>;

    /// Vertical advance between lines set in `font`.
    fn line_height(&self, font: &Font) -> f64 {
        font.line_height()
    }

    /// Break `text` into lines no wider than `max_width`.
    fn split_text(&self, text: &str, max_width: f64, font: &Font, mode: WrapMode) -> Result<Vec<String>> {
        wrap::split_lines(text, max_width, mode, |s| self.text_width(s, font))
    }

    /// Draw one line of text inside `cell`, positioned by `alignment`.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Offset,
        cell: Size,
        font: &Font,
        alignment: Alignment,
    ) -> Result<()>;

    fn draw_line(&mut self, from: Offset, to: Offset, options: &LineOptions) -> Result<()>;

    fn draw_image(&mut self, image: Rc<LoadedImage>, origin: Offset, size: Size) -> Result<()>;

    /// Recorded pages, for backends that keep them.
    fn display_list(&self) -> Option<&[RecordedPage]> {
        None
    }

    /// Produce the final artifact.
    fn finish(self: Box<Self>) -> Result<Vec<u8>>;
}
