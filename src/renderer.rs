//! # Page and Cursor Engine
//!
//! [`DocumentRenderer`] owns the pen position, the current page and the
//! bookkeeping that decides where the body may go on each page:
//!
//! ```text
//! +------------------------------+  <- page top
//! |          padding.top         |
//! |  header (page 1, or repeat)  |  <- body_start_y()
//! |                              |
//! |  body                        |
//! |                              |  <- content_bottom()
//! |  footer (repeat)             |
//! |         padding.bottom       |
//! +------------------------------+
//! ```
//!
//! Page-add hooks run in registration order every time a page is added. The
//! header hook is registered before the footer hook, and the paginating body
//! column re-measures itself only after [`DocumentRenderer::add_page`]
//! returns, so a repeated header is always in place before the body flows.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::canvas::{Canvas, RecordedPage};
use crate::error::{LayoutError, Result};
use crate::geometry::{Alignment, Axis, EdgeInsets, Offset, PageSize, Size};
use crate::image_loader::LoadedImage;
use crate::layout::page_break::FIT_EPSILON;
use crate::layout::Element;
use crate::style::{Border, BorderSide, Font, LineOptions};
use crate::text::wrap::WrapMode;

/// Page geometry and defaults for a render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererOptions {
    pub page_size: Size,
    pub padding: EdgeInsets,
    /// Font for text nodes that do not pick one.
    pub default_font: Font,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4.size(),
            padding: EdgeInsets::uniform(54.0),
            default_font: Font::default(),
        }
    }
}

/// Callback run every time a page is added.
pub type PageHook = Rc<RefCell<dyn FnMut(&mut DocumentRenderer) -> Result<()>>>;

type SharedElement = Rc<RefCell<Box<dyn Element>>>;

#[derive(Debug, Clone, Copy)]
struct RegionInfo {
    height: f64,
    repeat: bool,
}

pub struct DocumentRenderer {
    options: RendererOptions,
    canvas: Box<dyn Canvas>,
    cursor: Offset,
    /// 1-based.
    page: usize,
    /// Height the body occupies on the current page.
    body_height: f64,
    header: Option<RegionInfo>,
    footer: Option<RegionInfo>,
    footer_attempts: u32,
    hooks: Vec<PageHook>,
    deferred_footer: Option<PageHook>,
    /// Where the last column that crossed a page boundary stopped.
    flow_end: Option<f64>,
}

impl DocumentRenderer {
    /// Open the first page with the cursor at the padded origin.
    pub fn new(options: RendererOptions, mut canvas: Box<dyn Canvas>) -> Self {
        canvas.add_page(options.page_size);
        let cursor = Offset::new(options.padding.left, options.padding.top);
        Self {
            options,
            canvas,
            cursor,
            page: 1,
            body_height: 0.0,
            header: None,
            footer: None,
            footer_attempts: 0,
            hooks: Vec::new(),
            deferred_footer: None,
            flow_end: None,
        }
    }

    pub fn options(&self) -> &RendererOptions {
        &self.options
    }

    pub fn page_size(&self) -> Size {
        self.options.page_size
    }

    pub fn padding(&self) -> EdgeInsets {
        self.options.padding
    }

    /// Page size minus padding.
    pub fn padded_page_size(&self) -> Size {
        self.options.page_size.with_padding(self.options.padding)
    }

    pub fn default_font(&self) -> &Font {
        &self.options.default_font
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    // ── Cursor ──────────────────────────────────────────────────

    pub fn cursor(&self) -> Offset {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Offset) {
        self.cursor = cursor;
    }

    pub fn set_x(&mut self, x: f64) {
        self.cursor.x = x;
    }

    pub fn set_y(&mut self, y: f64) {
        self.cursor.y = y;
    }

    pub fn add_x(&mut self, dx: f64) {
        self.cursor.x += dx;
    }

    pub fn add_y(&mut self, dy: f64) {
        self.cursor.y += dy;
    }

    pub fn advance(&mut self, axis: Axis, amount: f64) {
        self.cursor = self.cursor.advance(axis, amount);
    }

    /// Run `f` and put the cursor back where it was, whether `f` fails or not.
    pub fn with_saved_cursor<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let saved = self.cursor;
        let result = f(self);
        self.cursor = saved;
        result
    }

    // ── Page geometry ───────────────────────────────────────────

    fn header_height_on_page(&self) -> f64 {
        match self.header {
            Some(h) if h.repeat || self.page == 1 => h.height,
            _ => 0.0,
        }
    }

    /// Space a repeating footer reserves at the bottom of every page.
    fn footer_reserve(&self) -> f64 {
        match self.footer {
            Some(f) if f.repeat => f.height,
            _ => 0.0,
        }
    }

    pub fn header_on_current_page(&self) -> bool {
        self.header_height_on_page() > 0.0
    }

    /// Where body content starts on the current page.
    pub fn body_start_y(&self) -> f64 {
        self.options.padding.top + self.header_height_on_page()
    }

    /// Lowest y body content may reach on the current page.
    pub fn content_bottom(&self) -> f64 {
        self.options.padding.top + self.padded_page_size().height - self.footer_reserve()
    }

    pub fn at_body_start(&self) -> bool {
        (self.cursor.y - self.body_start_y()).abs() <= FIT_EPSILON
    }

    /// Whether a box `height` tall fits between the cursor and the content bottom.
    pub fn fits_current_page(&self, height: f64) -> bool {
        self.cursor.y + height <= self.content_bottom() + FIT_EPSILON
    }

    /// The space the body may occupy on the current page.
    pub fn body_boundary(&self) -> Size {
        let padded = self.padded_page_size();
        Size::new(
            padded.width,
            padded.height - self.header_height_on_page() - self.footer_reserve(),
        )
    }

    pub fn body_height(&self) -> f64 {
        self.body_height
    }

    pub fn set_body_height(&mut self, height: f64) {
        trace!(page = self.page, height, "body measured");
        self.body_height = height;
    }

    /// Record the y a paginating column reached on the page it ended on.
    /// Its own render restores the cursor to where it started, which is a
    /// position on an earlier page.
    pub(crate) fn set_flow_end(&mut self, y: f64) {
        self.flow_end = Some(y);
    }

    pub(crate) fn take_flow_end(&mut self) -> Option<f64> {
        self.flow_end.take()
    }

    // ── Pages and regions ───────────────────────────────────────

    /// Register a callback for every page added from now on.
    pub fn on_add_page(&mut self, hook: PageHook) {
        self.hooks.push(hook);
    }

    /// Start a new page and run the page-add hooks in registration order.
    /// A hook that is already running (a hook that added a page itself) is
    /// skipped.
    pub fn add_page(&mut self) -> Result<()> {
        self.canvas.add_page(self.options.page_size);
        self.page += 1;
        self.cursor = Offset::new(self.options.padding.left, self.options.padding.top);
        self.body_height = 0.0;
        debug!(page = self.page, "page added");

        let hooks = self.hooks.clone();
        for hook in hooks {
            match hook.try_borrow_mut() {
                Ok(mut callback) => (&mut *callback)(self)?,
                Err(_) => trace!(page = self.page, "page hook already running, skipped"),
            }
        }
        Ok(())
    }

    /// Draw `element` as the header of the current page and move the cursor
    /// below it. A repeating header is drawn again on every new page.
    pub fn set_header(&mut self, height: f64, element: Box<dyn Element>, repeat: bool) -> Result<()> {
        self.header = Some(RegionInfo { height, repeat });
        let element: SharedElement = Rc::new(RefCell::new(element));
        self.place_header(&element, height)?;
        if repeat {
            let hook: PageHook = Rc::new(RefCell::new(move |r: &mut DocumentRenderer| {
                r.place_header(&element, height)
            }));
            self.on_add_page(hook);
        }
        Ok(())
    }

    fn place_header(&mut self, element: &SharedElement, height: f64) -> Result<()> {
        let mut element = element.borrow_mut();
        element.measure(Size::new(self.padded_page_size().width, height), self)?;
        self.cursor = Offset::new(self.options.padding.left, self.options.padding.top);
        element.render(self)?;
        self.add_y(height);
        debug!(page = self.page, height, "header placed");
        Ok(())
    }

    /// Draw `element` at the bottom of the page. A repeating footer is
    /// drawn now and on every new page; otherwise it is drawn once, on the
    /// last page, when the render is finalized.
    pub fn set_footer(&mut self, height: f64, element: Box<dyn Element>, repeat: bool) -> Result<()> {
        self.footer = Some(RegionInfo { height, repeat });
        let element: SharedElement = Rc::new(RefCell::new(element));
        let hook: PageHook = Rc::new(RefCell::new(move |r: &mut DocumentRenderer| {
            r.place_footer(&element, height)
        }));
        if repeat {
            {
                let mut callback = hook.borrow_mut();
                (&mut *callback)(self)?;
            }
            self.on_add_page(hook);
        } else {
            self.deferred_footer = Some(hook);
        }
        Ok(())
    }

    /// Place the footer below the body, adding at most one page when the
    /// body left no room for it.
    fn place_footer(&mut self, element: &SharedElement, height: f64) -> Result<()> {
        let saved = self.cursor;
        let page = self.page;
        let result = self.render_footer(element, height);
        self.footer_attempts = 0;
        self.cursor = if self.page == page {
            saved
        } else {
            Offset::new(self.options.padding.left, self.body_start_y())
        };
        result
    }

    fn render_footer(&mut self, element: &SharedElement, height: f64) -> Result<()> {
        let mut element = element.borrow_mut();
        let padded = self.padded_page_size();
        element.measure(Size::new(padded.width, height), self)?;

        let available = padded.height - self.header_height_on_page() - self.body_height;
        self.footer_attempts += 1;
        if height > available + FIT_EPSILON && self.footer_attempts == 1 {
            debug!(page = self.page, height, available, "footer does not fit, adding a page");
            self.add_page()?;
        }

        self.cursor = Offset::new(
            self.options.padding.left,
            self.options.padding.top + padded.height - height,
        );
        element.render(self)?;
        debug!(page = self.page, height, "footer placed");
        Ok(())
    }

    /// Run the work left for the end of the document (a non-repeating
    /// footer). Calling it again does nothing.
    pub fn finalize(&mut self) -> Result<()> {
        if let Some(hook) = self.deferred_footer.take() {
            let mut callback = hook.borrow_mut();
            (&mut *callback)(self)?;
        }
        Ok(())
    }

    /// Finalize and produce the canvas output.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let DocumentRenderer { canvas, .. } = self;
        canvas.finish()
    }

    pub fn canvas(&self) -> &dyn Canvas {
        self.canvas.as_ref()
    }

    /// Recorded pages, when the canvas keeps them.
    pub fn pages(&self) -> Option<&[RecordedPage]> {
        self.canvas.display_list()
    }

    // ── Drawing ─────────────────────────────────────────────────

    pub fn text_width(&self, text: &str, font: &Font) -> Result<f64> {
        self.canvas.text_width(text, font)
    }

    pub fn line_height(&self, font: &Font) -> f64 {
        self.canvas.line_height(font)
    }

    pub fn split_text(&self, text: &str, max_width: f64, font: &Font, mode: WrapMode) -> Result<Vec<String>> {
        self.canvas.split_text(text, max_width, font, mode)
    }

    pub fn draw_text(
        &mut self,
        text: &str,
        origin: Offset,
        cell: Size,
        font: &Font,
        alignment: Alignment,
    ) -> Result<()> {
        self.canvas.draw_text(text, origin, cell, font, alignment)
    }

    pub fn draw_line(&mut self, from: Offset, to: Offset, options: &LineOptions) -> Result<()> {
        self.canvas.draw_line(from, to, options)
    }

    /// Stroke the selected sides of a `size` box at the cursor, each border
    /// with its own line options.
    pub fn draw_box_with_borders(&mut self, size: Size, borders: &[Border]) -> Result<()> {
        if size.is_zero() || !size.is_valid() {
            return Err(LayoutError::InvalidSize {
                element: "Border",
                width: size.width,
                height: size.height,
            });
        }
        let Offset { x, y } = self.cursor;
        let (right, bottom) = (x + size.width, y + size.height);
        for border in borders.iter().filter(|b| b.is_visible()) {
            let sides = [
                (BorderSide::LEFT, Offset::new(x, y), Offset::new(x, bottom)),
                (BorderSide::RIGHT, Offset::new(right, y), Offset::new(right, bottom)),
                (BorderSide::TOP, Offset::new(x, y), Offset::new(right, y)),
                (BorderSide::BOTTOM, Offset::new(x, bottom), Offset::new(right, bottom)),
            ];
            for (side, from, to) in sides {
                if border.sides.contains(side) {
                    self.canvas.draw_line(from, to, &border.options)?;
                }
            }
        }
        Ok(())
    }

    /// Draw `image` scaled to `size` with its top-left corner at the cursor.
    pub fn draw_image(&mut self, image: Rc<LoadedImage>, size: Size) -> Result<()> {
        self.canvas.draw_image(image, self.cursor, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::layout::testing::Block;
    use crate::layout::ElementExt;

    fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(RendererOptions::default(), Box::new(RecordingCanvas::new()))
    }

    #[test]
    fn starts_at_padded_origin() {
        let r = renderer();
        assert_eq!(r.current_page(), 1);
        assert_eq!(r.cursor(), Offset::new(54.0, 54.0));
        assert!(r.at_body_start());
        assert_eq!(r.pages().unwrap().len(), 1);
    }

    #[test]
    fn saved_cursor_is_restored_on_error() {
        let mut r = renderer();
        let result: Result<()> = r.with_saved_cursor(|r| {
            r.add_x(100.0);
            r.add_y(100.0);
            Err(LayoutError::backend("draw text", "boom"))
        });
        assert!(result.is_err());
        assert_eq!(r.cursor(), Offset::new(54.0, 54.0));
    }

    #[test]
    fn hooks_run_in_order_on_each_new_page() {
        let mut r = renderer();
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["first", "second"] {
            let log = Rc::clone(&log);
            r.on_add_page(Rc::new(RefCell::new(move |r: &mut DocumentRenderer| {
                log.borrow_mut().push((name, r.current_page()));
                Ok(())
            })));
        }
        r.add_page().unwrap();
        r.add_page().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![("first", 2), ("second", 2), ("first", 3), ("second", 3)]
        );
    }

    #[test]
    fn reentrant_hook_is_skipped() {
        let mut r = renderer();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        r.on_add_page(Rc::new(RefCell::new(move |r: &mut DocumentRenderer| {
            *counter.borrow_mut() += 1;
            if r.current_page() == 2 {
                r.add_page()?;
            }
            Ok(())
        })));
        r.add_page().unwrap();
        assert_eq!(r.current_page(), 3);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn header_and_footer_shrink_the_body() {
        let mut r = renderer();
        r.set_header(40.0, Block::new(0.0, 0.0).boxed(), true).unwrap();
        r.set_footer(30.0, Block::new(0.0, 0.0).boxed(), true).unwrap();

        assert!((r.cursor().y - 94.0).abs() < 1e-9);
        assert!((r.content_bottom() - (841.89 - 54.0 - 30.0)).abs() < 1e-9);
        let body = r.body_boundary();
        assert!((body.height - (841.89 - 108.0 - 70.0)).abs() < 1e-9);
        assert!(r.at_body_start());
    }

    #[test]
    fn non_repeating_header_only_on_first_page() {
        let mut r = renderer();
        r.set_header(40.0, Block::new(0.0, 0.0).boxed(), false).unwrap();
        assert!(r.header_on_current_page());
        r.add_page().unwrap();
        assert!(!r.header_on_current_page());
        assert!((r.body_start_y() - 54.0).abs() < 1e-9);
    }

    #[test]
    fn deferred_footer_moves_to_new_page_when_body_is_full() {
        let mut r = renderer();
        r.set_footer(30.0, Block::new(0.0, 0.0).boxed(), false).unwrap();
        r.set_body_height(r.padded_page_size().height - 10.0);
        r.finalize().unwrap();
        assert_eq!(r.current_page(), 2);

        let pages = r.pages().unwrap();
        assert_eq!(pages[0].lines().count(), 0);
        let (from, _) = pages[1].lines().next().unwrap();
        assert!((from.y - (841.89 - 54.0 - 30.0)).abs() < 1e-9);

        r.finalize().unwrap();
        assert_eq!(r.pages().unwrap()[1].lines().count(), 1);
    }

    #[test]
    fn borders_draw_selected_sides() {
        let mut r = renderer();
        let borders = [
            Border::new(BorderSide::LEFT | BorderSide::RIGHT),
            Border::new(BorderSide::BOTTOM),
        ];
        r.draw_box_with_borders(Size::new(100.0, 20.0), &borders).unwrap();
        let lines: Vec<_> = r.pages().unwrap()[0].lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], (Offset::new(54.0, 74.0), Offset::new(154.0, 74.0)));

        assert!(matches!(
            r.draw_box_with_borders(Size::ZERO, &borders),
            Err(LayoutError::InvalidSize { element: "Border", .. })
        ));
    }
}
