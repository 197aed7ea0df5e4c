//! # Row and Column
//!
//! Both are the same linear layout with the main axis swapped, so all the
//! arithmetic lives in [`Linear`] and is written against "main" and "cross"
//! rather than width and height. Column adds pagination on top.

use tracing::{debug, trace};

use crate::error::{LayoutError, Result};
use crate::geometry::{Axis, Size, MAX_SIZE};
use crate::layout::flex::{calculate_spacing, unsized_extent, Gaps, JustifyContent};
use crate::layout::page_break::{decide_break, BreakDecision};
use crate::layout::{max_authored, max_axis, total_axis, Element, Elements, OverflowMode};
use crate::renderer::DocumentRenderer;

pub(crate) struct Linear {
    axis: Axis,
    kind: &'static str,
    name: Option<String>,
    authored: Size,
    size: Size,
    separator: Option<Box<dyn Element>>,
    justify: JustifyContent,
    default_child_size: Size,
    children: Elements,
}

impl Linear {
    fn new(axis: Axis, kind: &'static str) -> Self {
        Self {
            axis,
            kind,
            name: None,
            authored: Size::ZERO,
            size: Size::ZERO,
            separator: None,
            justify: JustifyContent::None,
            default_child_size: Size::ZERO,
            children: Vec::new(),
        }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind)
    }

    /// Main extent the separator adds between two neighbours.
    fn separator_extent(&self) -> f64 {
        self.separator
            .as_ref()
            .map(|s| s.size().axis(self.axis))
            .unwrap_or(0.0)
    }

    /// Resolve the size from `children[start..]` only. Pagination re-measures
    /// from the first child of the new page.
    fn measure_from(&mut self, boundary: Size, start: usize, renderer: &DocumentRenderer) -> Result<()> {
        if !boundary.is_valid() {
            return Err(LayoutError::InvalidSize {
                element: self.kind,
                width: boundary.width,
                height: boundary.height,
            });
        }
        let axis = self.axis;
        let cross = axis.cross();
        let start = start.min(self.children.len());

        let mut size = self.authored;
        if size.axis(axis) == MAX_SIZE {
            size = size.with_main_axis(axis, boundary.axis(axis));
        }
        if size.axis(cross) == MAX_SIZE {
            size = size.with_cross_axis(axis, boundary.axis(cross));
        } else if size.axis(cross) == 0.0 {
            let widest = max_authored(&self.children[start..], cross);
            let inferred = if widest > 0.0 { widest } else { boundary.axis(cross) };
            size = size.with_cross_axis(axis, inferred);
        }

        let authored_extents: Vec<f64> = self.children[start..]
            .iter()
            .filter(|c| c.in_flow())
            .map(|c| c.authored_size().axis(axis))
            .collect();
        let joints = authored_extents.len().saturating_sub(1) as f64;

        let separator_authored = self
            .separator
            .as_ref()
            .map(|s| s.authored_size().axis(axis))
            .unwrap_or(0.0);
        let available = size.merge(boundary).axis(axis) - separator_authored * joints;
        let default_main = unsized_extent(&authored_extents, available);
        let child_default = self
            .default_child_size
            .merge(Size::from_axis(default_main, size.axis(cross), axis));

        let child_boundary = child_default.merge(size);
        for child in self.children[start..].iter_mut() {
            child.measure(child_boundary, renderer)?;
        }
        if let Some(separator) = self.separator.as_mut() {
            separator.measure(Size::from_axis(0.0, size.axis(cross), axis), renderer)?;
        }

        if size.axis(cross) == 0.0 {
            size = size.with_cross_axis(axis, max_axis(&self.children[start..], cross));
        }
        if size.axis(axis) == 0.0 {
            let content = total_axis(&self.children[start..], axis) + self.separator_extent() * joints;
            size = size.with_main_axis(axis, content);
        }
        let limit = boundary.axis(axis);
        if limit > 0.0 && size.axis(axis) > limit {
            size = size.with_main_axis(axis, limit);
        }

        trace!(
            element = self.label(),
            from = start,
            width = size.width,
            height = size.height,
            "measured"
        );
        self.size = size;
        Ok(())
    }

    /// Justify gaps; an explicit separator replaces them.
    fn gaps(&self) -> Gaps {
        if self.separator.is_some() {
            return Gaps::ZERO;
        }
        let extents: Vec<f64> = self
            .children
            .iter()
            .filter(|c| c.in_flow())
            .map(|c| c.size().axis(self.axis))
            .collect();
        calculate_spacing(&extents, self.size.axis(self.axis), self.justify)
    }

    /// Space taken before every in-flow child but the first.
    fn lead_extent(&self, gaps: Gaps) -> f64 {
        if self.separator.is_some() {
            self.separator_extent()
        } else {
            gaps.between
        }
    }

    fn render_lead(&mut self, renderer: &mut DocumentRenderer, gaps: Gaps) -> Result<()> {
        let axis = self.axis;
        match self.separator.as_mut() {
            Some(separator) => {
                separator.render(renderer)?;
                renderer.advance(axis, separator.size().axis(axis));
            }
            None => renderer.advance(axis, gaps.between),
        }
        Ok(())
    }

    /// Lay the children out one after another. The caller restores the cursor.
    fn render_sequence(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        let gaps = self.gaps();
        let axis = self.axis;
        renderer.advance(axis, gaps.edge);
        let mut placed = 0;
        for index in 0..self.children.len() {
            if !self.children[index].in_flow() {
                self.children[index].render(renderer)?;
                continue;
            }
            if placed > 0 {
                self.render_lead(renderer, gaps)?;
            }
            let child = &mut self.children[index];
            child.render(renderer)?;
            renderer.advance(axis, child.size().axis(axis));
            placed += 1;
        }
        Ok(())
    }
}

macro_rules! linear_builders {
    ($ty:ident) => {
        impl $ty {
            /// Name shown in logs.
            pub fn named(mut self, name: impl Into<String>) -> Self {
                self.linear.name = Some(name.into());
                self
            }

            pub fn with_size(mut self, size: Size) -> Self {
                self.linear.authored = size;
                self
            }

            /// Element drawn between neighbouring children instead of justify gaps.
            pub fn separator(mut self, separator: impl Element + 'static) -> Self {
                self.linear.separator = Some(Box::new(separator));
                self
            }

            pub fn boxed_separator(mut self, separator: Box<dyn Element>) -> Self {
                self.linear.separator = Some(separator);
                self
            }

            pub fn justify(mut self, justify: JustifyContent) -> Self {
                self.linear.justify = justify;
                self
            }

            /// Size offered to children before the distributed defaults apply.
            pub fn default_child_size(mut self, size: Size) -> Self {
                self.linear.default_child_size = size;
                self
            }

            pub fn child(mut self, child: impl Element + 'static) -> Self {
                self.linear.children.push(Box::new(child));
                self
            }

            pub fn with_children(mut self, children: Elements) -> Self {
                self.linear.children.extend(children);
                self
            }

            pub fn push(&mut self, child: Box<dyn Element>) {
                self.linear.children.push(child);
            }

            pub fn children(&self) -> &[Box<dyn Element>] {
                &self.linear.children
            }
        }
    };
}

/// Children laid out left to right.
pub struct Row {
    linear: Linear,
}

impl Row {
    pub fn new() -> Self {
        Self {
            linear: Linear::new(Axis::Horizontal, "Row"),
        }
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}

linear_builders!(Row);

impl Element for Row {
    fn kind(&self) -> &'static str {
        "Row"
    }

    fn size(&self) -> Size {
        self.linear.size
    }

    fn authored_size(&self) -> Size {
        self.linear.authored
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.linear.measure_from(boundary, 0, renderer)
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        renderer.with_saved_cursor(|r| self.linear.render_sequence(r))
    }
}

/// Children laid out top to bottom, optionally across pages.
pub struct Column {
    linear: Linear,
    overflow: OverflowMode,
    /// Set on the document body: after a break the column re-measures the
    /// remaining children against the new page and reports its height.
    page_body: bool,
}

impl Column {
    pub fn new() -> Self {
        Self {
            linear: Linear::new(Axis::Vertical, "Column"),
            overflow: OverflowMode::Truncate,
            page_body: false,
        }
    }

    pub fn overflow(mut self, mode: OverflowMode) -> Self {
        self.overflow = mode;
        self
    }

    pub(crate) fn page_body(mut self) -> Self {
        self.page_body = true;
        self
    }

    fn break_page(&self, renderer: &mut DocumentRenderer, reason: &'static str) -> Result<()> {
        let x = renderer.cursor().x;
        debug!(
            element = self.linear.label(),
            page = renderer.current_page(),
            y = renderer.cursor().y,
            reason,
            "page break"
        );
        renderer.add_page()?;
        renderer.set_x(x);
        Ok(())
    }

    fn should_break(&self, renderer: &DocumentRenderer, index: usize, region_bottom: f64, extent: f64) -> bool {
        match self.overflow {
            OverflowMode::ContinueOnNextPage => {
                let remaining = region_bottom - renderer.cursor().y;
                decide_break(remaining, extent, renderer.at_body_start()) == BreakDecision::MoveToNextPage
            }
            _ => {
                self.linear.children[index].overflow_mode() == OverflowMode::MustFitPage
                    && !renderer.fits_current_page(extent)
                    && !renderer.at_body_start()
            }
        }
    }

    /// Lowest y this column may fill on the current page, starting at `top`.
    fn region_bottom(&self, renderer: &DocumentRenderer, top: f64) -> f64 {
        (top + self.linear.size.height).min(renderer.content_bottom())
    }

    /// Re-measure the body from `start` after a page was added. `placed` is
    /// the extent already on the new page above the cursor.
    fn reflow(&mut self, renderer: &mut DocumentRenderer, start: usize, placed: f64) -> Result<()> {
        let boundary = renderer.body_boundary();
        self.linear.measure_from(boundary, start, renderer)?;
        let height = (placed + self.linear.size.height).min(boundary.height);
        self.linear.size = self.linear.size.with_main_axis(Axis::Vertical, height);
        renderer.set_body_height(height);
        Ok(())
    }

    fn render_paged(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        if self.overflow == OverflowMode::MustFitPage
            && !renderer.fits_current_page(self.linear.size.height)
            && !renderer.at_body_start()
        {
            self.break_page(renderer, "column must fit page")?;
        }

        let gaps = self.linear.gaps();
        renderer.add_y(gaps.edge);
        let mut region_bottom = self.region_bottom(renderer, renderer.cursor().y);
        let mut placed_on_page = 0;

        for index in 0..self.linear.children.len() {
            if !self.linear.children[index].in_flow() {
                self.linear.children[index].render(renderer)?;
                continue;
            }

            let lead = if placed_on_page == 0 {
                0.0
            } else {
                self.linear.lead_extent(gaps)
            };
            let extent = self.linear.children[index].size().height + lead;
            if self.should_break(renderer, index, region_bottom, extent) {
                self.break_page(renderer, "child does not fit")?;
                region_bottom = if self.page_body {
                    self.reflow(renderer, index, 0.0)?;
                    self.region_bottom(renderer, renderer.cursor().y)
                } else {
                    renderer.content_bottom()
                };
                placed_on_page = 0;
            }

            if placed_on_page > 0 {
                self.linear.render_lead(renderer, gaps)?;
            }
            let page = renderer.current_page();
            let child = &mut self.linear.children[index];
            child.render(renderer)?;
            let height = child.size().height;
            placed_on_page += 1;

            if renderer.current_page() == page {
                renderer.add_y(height);
                continue;
            }
            // The child crossed onto a later page: continue below where it
            // stopped, on the page it stopped on.
            let end = renderer.take_flow_end().unwrap_or(renderer.body_start_y() + height);
            renderer.set_y(end);
            trace!(
                element = self.linear.label(),
                page = renderer.current_page(),
                y = end,
                "child spanned pages"
            );
            region_bottom = if self.page_body {
                let placed = end - renderer.body_start_y();
                self.reflow(renderer, index + 1, placed)?;
                self.region_bottom(renderer, renderer.body_start_y())
            } else {
                renderer.content_bottom()
            };
        }
        Ok(())
    }
}

impl Default for Column {
    fn default() -> Self {
        Self::new()
    }
}

linear_builders!(Column);

impl Element for Column {
    fn kind(&self) -> &'static str {
        "Column"
    }

    fn size(&self) -> Size {
        self.linear.size
    }

    fn authored_size(&self) -> Size {
        self.linear.authored
    }

    fn overflow_mode(&self) -> OverflowMode {
        self.overflow
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.linear.measure_from(boundary, 0, renderer)
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        let page = renderer.current_page();
        let end = renderer.with_saved_cursor(|r| {
            self.render_paged(r)?;
            Ok(r.cursor().y)
        })?;
        if renderer.current_page() != page {
            renderer.set_flow_end(end);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Offset;
    use crate::layout::testing::{renderer, renderer_with, Block};
    use crate::layout::{ElementExt, Positioned};

    const EPS: f64 = 1e-9;

    fn line_starts(r: &DocumentRenderer, page: usize) -> Vec<Offset> {
        r.pages().unwrap()[page].lines().map(|(from, _)| from).collect()
    }

    #[test]
    fn unsized_child_gets_remaining_width() {
        let r = renderer();
        let mut row = Row::new()
            .with_size(Size::new(200.0, 20.0))
            .child(Block::new(50.0, 0.0))
            .child(Block::new(50.0, 0.0))
            .child(Block::new(0.0, 0.0));
        row.measure(Size::new(400.0, 100.0), &r).unwrap();

        let widths: Vec<f64> = row.children().iter().map(|c| c.size().width).collect();
        assert_eq!(widths, vec![50.0, 50.0, 100.0]);
        assert!(row.children().iter().all(|c| c.size().height == 20.0));
    }

    #[test]
    fn measure_is_idempotent() {
        let r = renderer();
        let mut column = Column::new()
            .child(Block::new(0.0, 30.0))
            .child(Row::new().child(Block::new(40.0, 0.0)).child(Block::new(0.0, 10.0)));
        let boundary = Size::new(300.0, 200.0);
        column.measure(boundary, &r).unwrap();
        let first = column.size();
        column.measure(Size::new(100.0, 50.0), &r).unwrap();
        column.measure(boundary, &r).unwrap();
        assert_eq!(column.size(), first);
    }

    #[test]
    fn main_axis_sums_children_and_separators() {
        let r = renderer();
        let mut column = Column::new()
            .separator(Block::new(0.0, 2.0))
            .child(Block::new(10.0, 20.0))
            .child(Block::new(10.0, 30.0))
            .child(Block::new(10.0, 40.0));
        column.measure(Size::new(100.0, 500.0), &r).unwrap();
        assert!((column.size().height - 94.0).abs() < EPS);
        // cross axis comes from the widest authored child
        assert!((column.size().width - 10.0).abs() < EPS);
    }

    #[test]
    fn main_axis_is_clamped_to_boundary() {
        let r = renderer();
        let mut row = Row::new()
            .child(Block::new(80.0, 10.0))
            .child(Block::new(80.0, 10.0));
        row.measure(Size::new(100.0, 50.0), &r).unwrap();
        assert!((row.size().width - 100.0).abs() < EPS);
    }

    #[test]
    fn max_size_fills_boundary() {
        let r = renderer();
        let mut row = Row::new()
            .with_size(Size::MAX)
            .child(Block::new(10.0, 10.0));
        row.measure(Size::new(120.0, 60.0), &r).unwrap();
        assert_eq!(row.size(), Size::new(120.0, 60.0));
    }

    #[test]
    fn space_between_places_children_at_the_edges() {
        let mut r = renderer();
        let mut row = Row::new()
            .with_size(Size::new(100.0, 10.0))
            .justify(JustifyContent::SpaceBetween)
            .child(Block::new(20.0, 10.0))
            .child(Block::new(20.0, 10.0))
            .child(Block::new(20.0, 10.0));
        row.measure(Size::new(100.0, 10.0), &r).unwrap();
        row.render(&mut r).unwrap();

        let xs: Vec<f64> = line_starts(&r, 0).iter().map(|o| o.x - 54.0).collect();
        assert_eq!(xs, vec![0.0, 40.0, 80.0]);
        assert_eq!(r.cursor(), Offset::new(54.0, 54.0));
    }

    #[test]
    fn separator_replaces_gaps() {
        let mut r = renderer();
        let mut row = Row::new()
            .with_size(Size::new(100.0, 10.0))
            .justify(JustifyContent::SpaceEvenly)
            .separator(Block::new(5.0, 0.0))
            .child(Block::new(20.0, 10.0))
            .child(Block::new(20.0, 10.0));
        row.measure(Size::new(100.0, 10.0), &r).unwrap();
        row.render(&mut r).unwrap();

        // child, separator, child
        let xs: Vec<f64> = line_starts(&r, 0).iter().map(|o| o.x - 54.0).collect();
        assert_eq!(xs, vec![0.0, 20.0, 25.0]);
    }

    #[test]
    fn positioned_children_do_not_take_space() {
        let mut r = renderer();
        let mut row = Row::new()
            .with_size(Size::new(100.0, 10.0))
            .child(Block::new(0.0, 10.0))
            .child(Positioned::new(Offset::new(0.0, 0.0), Block::new(10.0, 10.0)))
            .child(Block::new(0.0, 10.0));
        row.measure(Size::new(100.0, 10.0), &r).unwrap();
        assert_eq!(row.children()[0].size().width, 50.0);
        row.render(&mut r).unwrap();
        assert_eq!(r.pages().unwrap()[0].lines().count(), 3);
    }

    #[test]
    fn continue_on_next_page_breaks_between_children() {
        let mut r = renderer_with(Size::new(200.0, 200.0), 0.0);
        let mut column = Column::new()
            .overflow(OverflowMode::ContinueOnNextPage)
            .with_size(Size::new(100.0, 200.0))
            .with_children((0..5).map(|_| Block::new(100.0, 60.0).boxed()).collect());
        column.measure(Size::new(200.0, 200.0), &r).unwrap();
        column.render(&mut r).unwrap();

        let pages = r.pages().unwrap();
        assert_eq!(pages.len(), 2);
        let ys: Vec<f64> = pages[0].lines().map(|(from, _)| from.y).collect();
        assert_eq!(ys, vec![0.0, 60.0, 120.0]);
        let ys: Vec<f64> = pages[1].lines().map(|(from, _)| from.y).collect();
        assert_eq!(ys, vec![0.0, 60.0]);
    }

    #[test]
    fn must_fit_child_moves_to_next_page_whole() {
        let mut r = renderer_with(Size::new(200.0, 200.0), 0.0);
        let inner = Column::new()
            .overflow(OverflowMode::MustFitPage)
            .child(Block::new(100.0, 50.0))
            .child(Block::new(100.0, 50.0));
        let mut column = Column::new()
            .child(Block::new(100.0, 150.0))
            .child(inner);
        column.measure(Size::new(200.0, 400.0), &r).unwrap();
        column.render(&mut r).unwrap();

        let pages = r.pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines().count(), 1);
        let ys: Vec<f64> = pages[1].lines().map(|(from, _)| from.y).collect();
        assert_eq!(ys, vec![0.0, 50.0]);
    }

    #[test]
    fn sibling_follows_a_column_that_crossed_pages() {
        let mut r = renderer_with(Size::new(200.0, 200.0), 0.0);
        let inner = Column::new()
            .overflow(OverflowMode::ContinueOnNextPage)
            .with_children((0..4).map(|_| Block::new(100.0, 60.0).boxed()).collect());
        let mut body = Column::new()
            .with_size(Size::max_width())
            .overflow(OverflowMode::ContinueOnNextPage)
            .page_body()
            .child(Block::new(100.0, 50.0))
            .child(inner)
            .child(Block::new(100.0, 30.0));
        body.measure(r.body_boundary(), &r).unwrap();
        r.set_body_height(body.size().height);
        body.render(&mut r).unwrap();

        let pages = r.pages().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(line_starts(&r, 0).iter().map(|o| o.y).collect::<Vec<_>>(), vec![0.0, 50.0, 110.0]);
        assert_eq!(line_starts(&r, 1).iter().map(|o| o.y).collect::<Vec<_>>(), vec![0.0, 60.0, 120.0]);
        // the body on page 2 is the tail of the inner column plus the last block
        assert!((r.body_height() - 150.0).abs() < EPS);
    }

    #[test]
    fn row_keeps_old_offsets_after_a_nested_break() {
        let mut r = renderer_with(Size::new(200.0, 200.0), 0.0);
        r.set_y(20.0);
        let inner = Column::new()
            .with_size(Size::width(100.0))
            .overflow(OverflowMode::ContinueOnNextPage)
            .with_children((0..3).map(|_| Block::new(50.0, 80.0).boxed()).collect());
        let mut row = Row::new()
            .with_size(Size::new(200.0, 240.0))
            .child(inner)
            .child(Block::new(50.0, 10.0));
        row.measure(Size::new(200.0, 400.0), &r).unwrap();
        row.render(&mut r).unwrap();

        assert_eq!(r.pages().unwrap().len(), 2);
        assert_eq!(line_starts(&r, 1), vec![Offset::new(0.0, 0.0), Offset::new(100.0, 20.0)]);
    }

    #[test]
    fn truncate_never_breaks() {
        let mut r = renderer_with(Size::new(200.0, 200.0), 0.0);
        let mut column = Column::new()
            .with_children((0..5).map(|_| Block::new(100.0, 60.0).boxed()).collect());
        column.measure(Size::new(200.0, 1000.0), &r).unwrap();
        column.render(&mut r).unwrap();
        assert_eq!(r.pages().unwrap().len(), 1);
        assert_eq!(r.pages().unwrap()[0].lines().count(), 5);
    }

    #[test]
    fn negative_boundary_is_rejected() {
        let r = renderer();
        let mut row = Row::new().child(Block::new(10.0, 10.0));
        assert!(matches!(
            row.measure(Size::new(-1.0, 10.0), &r),
            Err(LayoutError::InvalidSize { element: "Row", .. })
        ));
    }
}
