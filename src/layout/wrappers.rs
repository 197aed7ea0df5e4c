//! Small composable nodes: conditional visibility, absolute overlays,
//! runtime child selection, spacers and pass-through templates.

use crate::error::{LayoutError, Result};
use crate::geometry::{is_unsized, Axis, Offset, Size};
use crate::layout::{Element, OverflowMode};
use crate::renderer::DocumentRenderer;

/// Shows or hides its child. A hidden child can still keep its space.
pub struct Visible {
    visible: bool,
    always_occupy: bool,
    authored: Size,
    size: Size,
    child: Box<dyn Element>,
}

impl Visible {
    pub fn new(visible: bool, child: impl Element + 'static) -> Self {
        Self {
            visible,
            always_occupy: false,
            authored: Size::ZERO,
            size: Size::ZERO,
            child: Box::new(child),
        }
    }

    /// Reserve the child's space even while hidden.
    pub fn always_occupy(mut self, occupy: bool) -> Self {
        self.always_occupy = occupy;
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.authored = size;
        self
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn collapsed(&self) -> bool {
        !self.visible && !self.always_occupy
    }
}

impl Element for Visible {
    fn kind(&self) -> &'static str {
        "Visible"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn authored_size(&self) -> Size {
        if self.collapsed() {
            Size::ZERO
        } else {
            self.authored.merge(self.child.authored_size())
        }
    }

    fn in_flow(&self) -> bool {
        !self.collapsed()
    }

    fn overflow_mode(&self) -> OverflowMode {
        self.child.overflow_mode()
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        if self.collapsed() {
            self.size = Size::ZERO;
            return Ok(());
        }
        self.child.measure(self.authored.merge(boundary), renderer)?;
        self.size = self.authored.merge(self.child.size());
        Ok(())
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        if !self.visible {
            return Ok(());
        }
        self.child.render(renderer)
    }
}

/// Draws its child at an absolute page offset without taking part in flow.
pub struct Positioned {
    offset: Offset,
    child: Box<dyn Element>,
}

impl Positioned {
    pub fn new(offset: Offset, child: impl Element + 'static) -> Self {
        Self {
            offset,
            child: Box::new(child),
        }
    }
}

impl Element for Positioned {
    fn kind(&self) -> &'static str {
        "Positioned"
    }

    fn size(&self) -> Size {
        Size::ZERO
    }

    fn authored_size(&self) -> Size {
        Size::ZERO
    }

    fn in_flow(&self) -> bool {
        false
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.child.measure(boundary, renderer)
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        let Positioned { offset, child } = self;
        renderer.with_saved_cursor(|r| {
            r.set_cursor(*offset);
            child.render(r)
        })
    }
}

/// How a [`Selector`] picks its candidate.
pub enum Selection {
    Fixed(usize),
    /// Called with the candidate count; must return an index in range.
    Function(Box<dyn FnMut(usize) -> usize>),
}

/// Delegates everything to one of several candidates, chosen afresh on
/// every measure and every render.
pub struct Selector {
    candidates: Vec<Box<dyn Element>>,
    selection: Selection,
    selected: Option<usize>,
    last_boundary: Size,
}

impl Selector {
    pub fn new(candidates: Vec<Box<dyn Element>>, selection: Selection) -> Self {
        Self {
            candidates,
            selection,
            selected: None,
            last_boundary: Size::ZERO,
        }
    }

    pub fn fixed(candidates: Vec<Box<dyn Element>>, index: usize) -> Self {
        Self::new(candidates, Selection::Fixed(index))
    }

    pub fn with_fn(candidates: Vec<Box<dyn Element>>, select: impl FnMut(usize) -> usize + 'static) -> Self {
        Self::new(candidates, Selection::Function(Box::new(select)))
    }

    /// Index chosen by the last measure or render.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    fn resolve(&mut self) -> Result<usize> {
        let count = self.candidates.len();
        let index = match &mut self.selection {
            Selection::Fixed(index) => *index,
            Selection::Function(select) => select(count),
        };
        if index >= count {
            return Err(LayoutError::SelectorOutOfRange { index, count });
        }
        Ok(index)
    }

    fn current(&self) -> Option<&dyn Element> {
        self.selected
            .and_then(|i| self.candidates.get(i))
            .map(|c| c.as_ref())
    }
}

impl Element for Selector {
    fn kind(&self) -> &'static str {
        "Selector"
    }

    fn size(&self) -> Size {
        self.current().map(|c| c.size()).unwrap_or(Size::ZERO)
    }

    fn authored_size(&self) -> Size {
        self.current().map(|c| c.authored_size()).unwrap_or(Size::ZERO)
    }

    fn overflow_mode(&self) -> OverflowMode {
        self.current().map(|c| c.overflow_mode()).unwrap_or_default()
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        let index = self.resolve()?;
        self.selected = Some(index);
        self.last_boundary = boundary;
        self.candidates[index].measure(boundary, renderer)
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        let index = self.resolve()?;
        if self.selected != Some(index) {
            self.candidates[index].measure(self.last_boundary, renderer)?;
            self.selected = Some(index);
        }
        self.candidates[index].render(renderer)
    }
}

/// Empty space along one axis.
pub struct Space {
    axis: Axis,
    authored: f64,
    size: Size,
}

impl Space {
    /// `extent` of `0` or `MAX_SIZE` takes the whole boundary on `axis`.
    pub fn new(axis: Axis, extent: f64) -> Self {
        Self {
            axis,
            authored: extent,
            size: Size::ZERO,
        }
    }

    pub fn horizontal(extent: f64) -> Self {
        Self::new(Axis::Horizontal, extent)
    }

    pub fn vertical(extent: f64) -> Self {
        Self::new(Axis::Vertical, extent)
    }
}

impl Element for Space {
    fn kind(&self) -> &'static str {
        "Space"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn authored_size(&self) -> Size {
        Size::from_axis(self.authored, 0.0, self.axis)
    }

    fn measure(&mut self, boundary: Size, _renderer: &DocumentRenderer) -> Result<()> {
        let extent = if is_unsized(self.authored) {
            boundary.axis(self.axis)
        } else {
            self.authored
        };
        self.size = Size::from_axis(extent, 0.0, self.axis);
        Ok(())
    }

    fn render(&mut self, _renderer: &mut DocumentRenderer) -> Result<()> {
        Ok(())
    }
}

/// Wraps a reusable subtree without changing its layout.
pub struct Template {
    child: Box<dyn Element>,
}

impl Template {
    pub fn new(child: impl Element + 'static) -> Self {
        Self {
            child: Box::new(child),
        }
    }
}

impl Element for Template {
    fn kind(&self) -> &'static str {
        "Template"
    }

    fn size(&self) -> Size {
        self.child.size()
    }

    fn authored_size(&self) -> Size {
        self.child.authored_size()
    }

    fn in_flow(&self) -> bool {
        self.child.in_flow()
    }

    fn overflow_mode(&self) -> OverflowMode {
        self.child.overflow_mode()
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.child.measure(boundary, renderer)
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        self.child.render(renderer)
    }
}
