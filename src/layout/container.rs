//! Padding, borders and alignment around exactly one child.

use crate::error::Result;
use crate::geometry::{Alignment, EdgeInsets, Size};
use crate::layout::Element;
use crate::renderer::DocumentRenderer;
use crate::style::Border;

pub struct Container {
    authored: Size,
    size: Size,
    padding: EdgeInsets,
    borders: Vec<Border>,
    alignment: Alignment,
    child: Box<dyn Element>,
}

impl Container {
    pub fn new(child: impl Element + 'static) -> Self {
        Self::from_boxed(Box::new(child))
    }

    pub fn from_boxed(child: Box<dyn Element>) -> Self {
        Self {
            authored: Size::ZERO,
            size: Size::ZERO,
            padding: EdgeInsets::ZERO,
            borders: Vec::new(),
            alignment: Alignment::empty(),
            child,
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.authored = size;
        self
    }

    pub fn padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = padding;
        self
    }

    /// A single border around the box.
    pub fn border(mut self, border: Border) -> Self {
        self.borders = vec![border];
        self
    }

    /// Several borders, each with its own sides and line style.
    pub fn borders(mut self, borders: Vec<Border>) -> Self {
        self.borders = borders;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn child(&self) -> &dyn Element {
        self.child.as_ref()
    }
}

impl Element for Container {
    fn kind(&self) -> &'static str {
        "Container"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn authored_size(&self) -> Size {
        self.authored
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.alignment.validate()?;
        let mut size = self.authored.merge(boundary);
        self.child.measure(size.with_padding(self.padding), renderer)?;
        if size.has_zero_value() {
            size = size.merge(self.child.size().without_padding(self.padding));
        }
        self.size = size;
        Ok(())
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        self.size.ensure_drawable("Container")?;
        let Container {
            size,
            padding,
            borders,
            alignment,
            child,
            ..
        } = self;
        renderer.with_saved_cursor(|r| {
            if !borders.is_empty() {
                r.draw_box_with_borders(*size, borders)?;
            }
            r.add_x(padding.left);
            r.add_y(padding.top);

            let leftover = size.with_padding(*padding).difference(child.size());
            if leftover.is_valid() && !leftover.is_zero() {
                let shift = alignment.offset_within(leftover);
                r.add_x(shift.x);
                r.add_y(shift.y);
            }
            child.render(r)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;
    use crate::geometry::Offset;
    use crate::layout::testing::{renderer, Block};
    use crate::style::BorderSide;

    #[test]
    fn padding_shrinks_the_child_boundary() {
        let r = renderer();
        let mut container = Container::new(Block::new(0.0, 0.0))
            .with_size(Size::new(100.0, 50.0))
            .padding(EdgeInsets::uniform(5.0));
        container.measure(Size::new(300.0, 300.0), &r).unwrap();
        assert_eq!(container.size(), Size::new(100.0, 50.0));
        assert_eq!(container.child().size(), Size::new(90.0, 40.0));
    }

    #[test]
    fn alignment_offsets_the_child() {
        let mut r = renderer();
        let mut container = Container::new(Block::new(20.0, 10.0))
            .with_size(Size::new(100.0, 50.0))
            .padding(EdgeInsets::uniform(5.0))
            .alignment(Alignment::RIGHT | Alignment::V_CENTER);
        container.measure(Size::new(300.0, 300.0), &r).unwrap();
        container.render(&mut r).unwrap();

        let (from, _) = r.pages().unwrap()[0].lines().next().unwrap();
        // padded area is 90x40 at (59, 59); leftover 70x30
        assert_eq!(from, Offset::new(59.0 + 70.0, 59.0 + 15.0));
        assert_eq!(r.cursor(), Offset::new(54.0, 54.0));
    }

    #[test]
    fn borders_are_drawn_before_the_child() {
        let mut r = renderer();
        let mut container = Container::new(Block::new(0.0, 0.0))
            .with_size(Size::new(40.0, 20.0))
            .border(Border::all());
        container.measure(Size::new(300.0, 300.0), &r).unwrap();
        container.render(&mut r).unwrap();
        assert_eq!(r.pages().unwrap()[0].lines().count(), 5);
    }

    #[test]
    fn unsized_axis_wraps_the_child() {
        let r = renderer();
        let mut container = Container::new(Block::new(30.0, 12.0))
            .with_size(Size::new(200.0, 0.0))
            .padding(EdgeInsets::symmetric(4.0, 0.0))
            .borders(vec![Border::new(BorderSide::TOP | BorderSide::BOTTOM)]);
        container.measure(Size::new(0.0, 0.0), &r).unwrap();
        assert_eq!(container.size(), Size::new(200.0, 20.0));
    }

    #[test]
    fn invalid_alignment_fails_measure() {
        let r = renderer();
        let mut container = Container::new(Block::new(10.0, 10.0))
            .alignment(Alignment::LEFT | Alignment::RIGHT);
        assert!(matches!(
            container.measure(Size::new(100.0, 100.0), &r),
            Err(LayoutError::InvalidAlignment(_))
        ));
    }

    #[test]
    fn zero_size_fails_render() {
        let mut r = renderer();
        let mut container = Container::new(Block::new(10.0, 10.0));
        assert!(matches!(
            container.render(&mut r),
            Err(LayoutError::InvalidSize { element: "Container", .. })
        ));
    }
}
