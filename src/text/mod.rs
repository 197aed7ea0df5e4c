//! # Text Layout
//!
//! The [`Text`] node turns a value into display lines. It decides three
//! things: the string to show (formatting), how the string wraps inside its
//! box, and how many wrapped lines fit. Glyph widths and line splitting are
//! asked of the canvas through the renderer.
//!
//! When the wrapped text needs more lines than the box holds, the last
//! line that fits loses as many trailing characters as the overflow marker
//! is long and the marker is appended:
//!
//! ```text
//! box: 2 lines      "abcde fghij klmno"  ->  "abcde"
//!                                            "fg..."
//! ```

pub mod format;
pub mod wrap;

use std::rc::Rc;

use crate::error::{LayoutError, Result};
use crate::geometry::{Alignment, EdgeInsets, Offset, Size};
use crate::layout::Element;
use crate::renderer::DocumentRenderer;
use crate::style::{Border, Font};

pub use format::{FormatterRegistry, NumericFormatter, TextFormatter, TextKind, TextValue};
pub use wrap::WrapMode;

/// Marker used when a style does not set one.
pub const DEFAULT_OVERFLOW_MARKER: &str = "...";

/// Presentation of a text node. Unset fields fall back through [`TextStyle::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub font: Option<Font>,
    pub alignment: Alignment,
    pub borders: Vec<Border>,
    pub padding: EdgeInsets,
    /// Defaults to word wrapping.
    pub wrap: Option<WrapMode>,
    /// `Some(false)` keeps only the first line. Defaults to multiline.
    pub multiline: Option<bool>,
    /// Appended to truncated text. Defaults to [`DEFAULT_OVERFLOW_MARKER`].
    pub overflow: Option<String>,
}

impl TextStyle {
    /// Fill what this style leaves unset from `other`. Alignment flags are
    /// combined.
    pub fn merge(mut self, other: &TextStyle) -> Self {
        self.alignment |= other.alignment;
        if self.font.is_none() {
            self.font = other.font.clone();
        }
        if self.borders.is_empty() {
            self.borders = other.borders.clone();
        }
        self.padding = self.padding.merge(other.padding);
        self.wrap = self.wrap.or(other.wrap);
        self.multiline = self.multiline.or(other.multiline);
        if self.overflow.is_none() {
            self.overflow = other.overflow.clone();
        }
        self
    }

    fn overflow_marker(&self) -> &str {
        self.overflow.as_deref().unwrap_or(DEFAULT_OVERFLOW_MARKER)
    }
}

pub struct Text {
    value: TextValue,
    formatter: Option<Rc<dyn TextFormatter>>,
    kind: Option<(TextKind, Rc<FormatterRegistry>)>,
    skip_formatting: bool,
    authored: Size,
    size: Size,
    style: TextStyle,
    font: Font,
    line_height: f64,
    text: String,
    lines: Vec<String>,
}

impl Text {
    pub fn new(value: impl Into<TextValue>) -> Self {
        Self {
            value: value.into(),
            formatter: None,
            kind: None,
            skip_formatting: false,
            authored: Size::ZERO,
            size: Size::ZERO,
            style: TextStyle::default(),
            font: Font::default(),
            line_height: 0.0,
            text: String::new(),
            lines: Vec::new(),
        }
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.authored = size;
        self
    }

    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Fill unset style fields from a shared base style.
    pub fn inherit(mut self, base: &TextStyle) -> Self {
        self.style = self.style.merge(base);
        self
    }

    pub fn font(mut self, font: Font) -> Self {
        self.style.font = Some(font);
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.style.alignment = alignment;
        self
    }

    pub fn padding(mut self, padding: EdgeInsets) -> Self {
        self.style.padding = padding;
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.style.borders.push(border);
        self
    }

    pub fn wrap(mut self, mode: WrapMode) -> Self {
        self.style.wrap = Some(mode);
        self
    }

    pub fn single_line(mut self) -> Self {
        self.style.multiline = Some(false);
        self
    }

    pub fn overflow_marker(mut self, marker: impl Into<String>) -> Self {
        self.style.overflow = Some(marker.into());
        self
    }

    /// Format with this formatter instead of a registry entry.
    pub fn formatter(mut self, formatter: impl TextFormatter + 'static) -> Self {
        self.formatter = Some(Rc::new(formatter));
        self
    }

    /// Format with the registry's formatter for `kind`.
    pub fn kind(mut self, kind: TextKind, registry: Rc<FormatterRegistry>) -> Self {
        self.kind = Some((kind, registry));
        self
    }

    /// Show the value's plain display form, ignoring any formatter.
    pub fn skip_formatting(mut self, skip: bool) -> Self {
        self.skip_formatting = skip;
        self
    }

    /// The formatted string from the last measure.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Lines that will be drawn, after wrapping and truncation.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn resolve_text(&self) -> String {
        if self.skip_formatting {
            return self.value.to_string();
        }
        if let Some(formatter) = &self.formatter {
            return formatter.format(&self.value);
        }
        match &self.kind {
            Some((kind, registry)) => registry.format(*kind, &self.value),
            None => self.value.to_string(),
        }
    }
}

/// Keep as many `lines` as fit in `height`, marking the cut.
fn fit_lines(mut lines: Vec<String>, height: f64, line_height: f64, marker: &str, multiline: bool) -> Result<Vec<String>> {
    let capacity = (height / line_height + 1e-9).floor();
    if capacity < 1.0 {
        return Err(LayoutError::overflow(
            "Text",
            format!("a {}pt line does not fit in {}pt", line_height, height),
        ));
    }
    let capacity = if multiline { capacity as usize } else { 1 };
    if lines.len() <= capacity {
        return Ok(lines);
    }

    lines.truncate(capacity);
    if let Some(last) = lines.last_mut() {
        let keep = last.chars().count().saturating_sub(marker.chars().count());
        let mut cut: String = last.chars().take(keep).collect();
        cut.push_str(marker);
        *last = cut;
    }
    Ok(lines)
}

impl Element for Text {
    fn kind(&self) -> &'static str {
        "Text"
    }

    fn size(&self) -> Size {
        self.size
    }

    fn authored_size(&self) -> Size {
        self.authored
    }

    fn measure(&mut self, boundary: Size, renderer: &DocumentRenderer) -> Result<()> {
        self.style.alignment.validate()?;
        self.text = self.resolve_text();
        self.font = self
            .style
            .font
            .clone()
            .unwrap_or_else(|| renderer.default_font().clone());
        self.line_height = renderer.line_height(&self.font);
        if self.line_height.is_nan() || self.line_height <= 0.0 {
            return Err(LayoutError::InvalidSize {
                element: "Text",
                width: self.font.size,
                height: self.line_height,
            });
        }

        let padding = self.style.padding;
        let mode = self.style.wrap.unwrap_or_default();
        let multiline = self.style.multiline.unwrap_or(true);

        let mut size = self.authored.merge(boundary);
        if size.has_zero_value() {
            let max_width = if size.width == 0.0 {
                f64::INFINITY
            } else {
                (size.width - padding.horizontal()).max(0.0)
            };
            let mut natural = renderer.split_text(&self.text, max_width, &self.font, mode)?;
            if !multiline {
                natural.truncate(1);
            }
            let mut widest: f64 = 0.0;
            for line in &natural {
                widest = widest.max(renderer.text_width(line, &self.font)?);
            }
            let content = Size::new(widest, self.line_height * natural.len().max(1) as f64);
            size = size.merge(content.without_padding(padding));
        }

        let inner = size.with_padding(padding);
        let lines = renderer.split_text(&self.text, inner.width, &self.font, mode)?;
        self.lines = fit_lines(
            lines,
            inner.height,
            self.line_height,
            self.style.overflow_marker(),
            multiline,
        )?;
        self.size = size;
        Ok(())
    }

    fn render(&mut self, renderer: &mut DocumentRenderer) -> Result<()> {
        self.size.ensure_drawable("Text")?;
        let Text {
            size,
            style,
            font,
            line_height,
            lines,
            ..
        } = self;
        let line_height = *line_height;

        renderer.with_saved_cursor(|r| {
            if !style.borders.is_empty() {
                r.draw_box_with_borders(*size, &style.borders)?;
            }
            let inner = size.with_padding(style.padding);
            let block = line_height * lines.len() as f64;
            let lift = style
                .alignment
                .vertical()
                .offset_within(Size::new(0.0, inner.height - block))
                .y;
            let origin = style.padding.inner_origin(r.cursor()).translate(0.0, lift);
            let cell = Size::new(inner.width, line_height);

            for (i, line) in lines.iter().enumerate() {
                let at = Offset::new(origin.x, origin.y + line_height * i as f64);
                r.draw_text(line, at, cell, font, style.alignment.horizontal())?;
            }
            Ok(())
        })
    }
}
