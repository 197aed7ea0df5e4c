//! Title and value side by side (or stacked), framed by a container.
//!
//! The box is assembled on first measure into
//! `Container(Row | Column [title, value])` and everything afterwards is
//! delegated to that tree.

use crate::error::Result;
use crate::geometry::{Axis, EdgeInsets, Size, MAX_SIZE};
use crate::layout::flex::JustifyContent;
use crate::layout::{Column, Container, Element, Row};
use crate::renderer::DocumentRenderer;
use crate::style::Border;
use crate::text::Text;

pub struct TitledTextBox {
    axis: Axis,
    parts: Option<(Text, Text)>,
    authored: Size,
    padding: EdgeInsets,
    borders: Vec<Border>,
    justify: JustifyContent,
    separator: Option<Box<dyn Element>>,
    default_child_size: Size,
    inner: Option<Container>,
}

impl TitledTextBox {
    fn new(axis: Axis, title: Text, value: Text) -> Self {
        Self {
            axis,
            parts: Some((title, value)),
            authored: Size::ZERO,
            padding: EdgeInsets::ZERO,
            borders: Vec::new(),
            justify: JustifyContent::None,
            separator: None,
            default_child_size: Size::ZERO,
            inner: None,
        }
    }

    /// Title to the left of the value.
    pub fn horizontal(title: Text, value: Text) -> Self {
        Self::new(Axis::Horizontal, title, value)
    }

    /// Title above the value.
    pub fn vertical(title: Text, value: Text) -> Self {
        Self::new(Axis::Vertical, title, value)
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.authored = size;
        self
    }

    pub fn padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = padding;
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.borders.push(border);
        self
    }

    pub fn justify(mut self, justify: JustifyContent) -> Self {
        self.justify = justify;
        self
    }

    pub fn separator(mut self, separator: impl Element + 'static) -> Self {
        self.separator = Some(Box::new(separator));
        self
    }

    pub fn default_child_size(mut self, size: Size) -> Self {
        self.default_child_size = size;
        self
    }

    fn assemble(&mut self) -> &mut Container {
        if self.inner.is_none() {
            if let Some((title, value)) = self.parts.take() {
                let fill = Size::from_axis(MAX_SIZE, 0.0, self.axis);
                let linear: Box<dyn Element> = match self.axis {
                    Axis::Horizontal => {
                        let mut row = Row::new()
                            .named("TitledTextBox")
                            .with_size(fill)
                            .justify(self.justify)
                            .default_child_size(self.default_child_size)
                            .child(title)
                            .child(value);
                        if let Some(separator) = self.separator.take() {
                            row = row.boxed_separator(separator);
                        }
                        Box::new(row)
                    }
                    Axis::Vertical => {
                        let mut column = Column::new()
                            .named("TitledTextBox")
                            .with_size(fill)
                            .justify(self.justify)
                            .default_child_size(self.default_child_size)
                            .child(title)
                            .child(value);
                        if let Some(separator) = self.separator.take() {
                            column = column.boxed_separator(separator);
                        }
                        Box::new(column)
                    }
                };
                let container = Container::from_boxed(linear)
                    .with_size(self.authored)
                    .padding(self.padding)
                    .borders(std::mem::take(&mut self.borders));
                self.inner = Some(container);
            }
        }
        self.inner.get_or_insert_with(|| Container::new(Row::new()))
    }
}

impl Element for TitledTextBox {
    fn kind(&self) -> &'static str {
        "TitledTextBox"
    }

    fn size(&self) -> Size {
        self.inner.as_ref().map(|c| c.size()).unwrap_or(Size::ZERO)
    }

    fn authored_size(&self) -> Size {
        self.authored
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.assemble().measure(boundary, renderer)
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.render(renderer),
            None => self.size().ensure_drawable("TitledTextBox"),
        }
    }
}
