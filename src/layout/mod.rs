//! # Layout Tree
//!
//! Every node implements [`Element`] and goes through two passes:
//!
//! 1. **measure**: the parent offers a boundary, the node resolves its own
//!    size from its authored size and that boundary, then measures its
//!    children. Measuring twice with the same boundary gives the same size,
//!    because the computed size is always rebuilt from the authored one.
//! 2. **render**: the node draws at the renderer's cursor. Whatever it does
//!    to the cursor is undone before it returns, so siblings always see the
//!    cursor their parent left for them.
//!
//! Only [`Column`] paginates. Its [`OverflowMode`] decides whether the
//! renderer breaks the page before the column, between its children, or
//! never.
//!
//! ```text
//! Document
//!  └─ Column (body, ContinueOnNextPage)
//!      ├─ Row ── Text, Space, Text
//!      ├─ Container ── Image
//!      └─ Visible ── Column ...
//! ```

pub mod container;
pub mod flex;
pub mod image;
pub mod linear;
pub mod page_break;
pub mod titled;
pub mod wrappers;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{is_unsized, Axis, Size};
use crate::renderer::DocumentRenderer;

pub use container::Container;
pub use flex::JustifyContent;
pub use image::Image;
pub use linear::{Column, Row};
pub use titled::TitledTextBox;
pub use wrappers::{Positioned, Selection, Selector, Space, Template, Visible};

/// What a column does when its content runs past the current page.
///
/// Paging is only well-defined when paginating columns nest directly in
/// other columns. A `Row` or `Container` restores its cursor after the
/// child returns, so anything drawn after a page break inside one lands at
/// the old page's offsets on the new page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverflowMode {
    /// No page breaks; content overflows visually.
    #[default]
    Truncate,
    /// Break before the column if it does not fit on the current page.
    MustFitPage,
    /// Break between children whenever the next child does not fit.
    ContinueOnNextPage,
}

/// A node in the layout tree.
pub trait Element {
    /// Short name used in errors and logs.
    fn kind(&self) -> &'static str;

    /// Size resolved by the last `measure`.
    fn size(&self) -> Size;

    /// Size the node was built with, before any inference.
    fn authored_size(&self) -> Size;

    /// Whether the node takes part in its parent's main-axis flow.
    fn in_flow(&self) -> bool {
        true
    }

    fn overflow_mode(&self) -> OverflowMode {
        OverflowMode::Truncate
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()>;

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()>;
}

/// An owned, ordered child list.
pub type Elements = Vec<Box<dyn Element>>;

pub trait ElementExt: Element + Sized + 'static {
    fn boxed(self) -> Box<dyn Element> {
        Box::new(self)
    }
}

impl<T: Element + 'static> ElementExt for T {}

/// Sum of the in-flow children's computed extents along `axis`.
pub fn total_axis(elements: &[Box<dyn Element>], axis: Axis) -> f64 {
    elements
        .iter()
        .filter(|e| e.in_flow())
        .map(|e| e.size().axis(axis))
        .sum()
}

/// Largest computed extent along `axis`.
pub fn max_axis(elements: &[Box<dyn Element>], axis: Axis) -> f64 {
    elements
        .iter()
        .filter(|e| e.in_flow())
        .map(|e| e.size().axis(axis))
        .fold(0.0, f64::max)
}

/// Largest explicit authored extent along `axis`; `0` when no in-flow child
/// sets one.
pub fn max_authored(elements: &[Box<dyn Element>], axis: Axis) -> f64 {
    elements
        .iter()
        .filter(|e| e.in_flow())
        .map(|e| e.authored_size().axis(axis))
        .filter(|extent| !is_unsized(*extent))
        .fold(0.0, f64::max)
}

/// Measure each element against the same boundary.
pub fn measure_all(elements: &mut [Box<dyn Element>], boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
    for element in elements.iter_mut() {
        element.measure(boundary, renderer)?;
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::renderer::RendererOptions;

    /// A leaf box of fixed authored size that records nothing.
    pub struct Block {
        pub authored: Size,
        pub size: Size,
        pub renders: usize,
    }

    impl Block {
        pub fn new(width: f64, height: f64) -> Self {
            Self {
                authored: Size::new(width, height),
                size: Size::ZERO,
                renders: 0,
            }
        }
    }

    impl Element for Block {
        fn kind(&self) -> &'static str {
            "Block"
        }

        fn size(&self) -> Size {
            self.size
        }

        fn authored_size(&self) -> Size {
            self.authored
        }

        fn measure(&mut self, boundary: Size, _renderer: &DocumentRenderer) -> Result<()> {
            self.size = self.authored.merge(boundary);
            Ok(())
        }

        fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
            self.size.ensure_drawable("Block")?;
            self.renders += 1;
            let origin = renderer.cursor();
            renderer.draw_line(
                origin,
                origin.translate(self.size.width, 0.0),
                &Default::default(),
            )
        }
    }

    pub fn renderer() -> DocumentRenderer {
        DocumentRenderer::new(RendererOptions::default(), Box::new(RecordingCanvas::new()))
    }

    pub fn renderer_with(page: Size, padding: f64) -> DocumentRenderer {
        let options = RendererOptions {
            page_size: page,
            padding: crate::geometry::EdgeInsets::uniform(padding),
            ..RendererOptions::default()
        };
        DocumentRenderer::new(options, Box::new(RecordingCanvas::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{renderer, Block};
    use super::*;

    #[test]
    fn aggregates_skip_out_of_flow_children() {
        let r = renderer();
        let mut children: Elements = vec![
            Block::new(10.0, 5.0).boxed(),
            Block::new(30.0, 0.0).boxed(),
            Positioned::new(crate::geometry::Offset::new(0.0, 0.0), Block::new(500.0, 500.0)).boxed(),
        ];
        measure_all(&mut children, Size::new(100.0, 20.0), &r).unwrap();

        assert!((total_axis(&children, Axis::Horizontal) - 40.0).abs() < 1e-9);
        assert!((max_axis(&children, Axis::Vertical) - 20.0).abs() < 1e-9);
        assert!((max_authored(&children, Axis::Vertical) - 5.0).abs() < 1e-9);
    }
}
