//! # Pagewright
//!
//! A paginated document layout engine.
//!
//! A document is a tree of boxes. Each box is measured top-down (the parent
//! offers a boundary, the child reports the size it takes) and then rendered
//! depth-first at a single moving cursor. Pagination is decided during
//! rendering, one child at a time, so a child is never cut in half by a page
//! edge.
//!
//! ## Architecture
//!
//! ```text
//! Element tree (Row, Column, Container, Text, Image, ...)
//!       ↓
//!   [layout]    measure: sizes from authored values and boundaries
//!       ↓
//!   [renderer]  render: cursor, pages, header/footer, page breaks
//!       ↓
//!   [canvas]    draw ops per page (recorded, or serialized by [pdf])
//! ```
//!
//! ## Size sentinels
//!
//! A width or height of `0` means "work it out": from the children, the
//! content, or the space left over. [`geometry::MAX_SIZE`] means "fill the
//! boundary". Both are resolved during measure; render never sees them.

pub mod canvas;
pub mod document;
pub mod error;
pub mod font;
pub mod geometry;
pub mod image_loader;
pub mod layout;
pub mod pdf;
pub mod renderer;
pub mod style;
pub mod text;

pub use canvas::{Canvas, PdfCanvas, RecordingCanvas};
pub use document::{Document, DocumentRegion};
pub use error::{LayoutError, Result};
pub use geometry::{Alignment, Axis, EdgeInsets, Offset, PageSize, Size, MAX_SIZE};
pub use layout::{
    Column, Container, Element, ElementExt, Image, JustifyContent, OverflowMode, Positioned, Row,
    Selection, Selector, Space, Template, TitledTextBox, Visible,
};
pub use pdf::Metadata;
pub use renderer::{DocumentRenderer, RendererOptions};
pub use style::{Border, BorderSide, Color, Font, LineOptions, LineStyle};
pub use text::{Text, TextStyle, TextValue, WrapMode};

/// Render a document to PDF bytes.
pub fn render(document: Document) -> Result<Vec<u8>> {
    document.write()
}
