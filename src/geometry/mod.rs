//! # Geometry
//!
//! Value types shared by every layout node: sizes, offsets, insets, axes and
//! page presets. All units are PDF points (1/72 inch), origin at the top-left
//! of the page, y growing downward.
//!
//! Two size values carry meaning beyond geometry:
//!
//! - `0.0` means "unspecified, infer from children or the boundary".
//! - [`MAX_SIZE`] means "fill the whole boundary on this axis".
//!
//! [`Size::merge`] is the single mechanism that turns both sentinels into
//! concrete values.

pub mod alignment;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

pub use alignment::Alignment;

/// The "fill the boundary" sentinel.
pub const MAX_SIZE: f64 = f32::MAX as f64;

/// Whether a single extent is unspecified (`0`) or fill-the-boundary (`MAX`).
pub fn is_unsized(value: f64) -> bool {
    value == 0.0 || value == MAX_SIZE
}

/// The two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The perpendicular axis.
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl TryFrom<u8> for Axis {
    type Error = LayoutError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Axis::Horizontal),
            1 => Ok(Axis::Vertical),
            other => Err(LayoutError::InvalidAxis(other)),
        }
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const MAX: Size = Size {
        width: MAX_SIZE,
        height: MAX_SIZE,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(value: f64) -> Self {
        Self::new(value, value)
    }

    /// Only the width is set; the height is inferred.
    pub fn width(width: f64) -> Self {
        Self::new(width, 0.0)
    }

    /// Only the height is set; the width is inferred.
    pub fn height(height: f64) -> Self {
        Self::new(0.0, height)
    }

    /// Fill the boundary horizontally, infer the height.
    pub fn max_width() -> Self {
        Self::new(MAX_SIZE, 0.0)
    }

    /// Fill the boundary vertically, infer the width.
    pub fn max_height() -> Self {
        Self::new(0.0, MAX_SIZE)
    }

    /// Build a size from main/cross extents relative to `axis`.
    pub fn from_axis(main: f64, cross: f64, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Self::new(main, cross),
            Axis::Vertical => Self::new(cross, main),
        }
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn cross_axis(&self, axis: Axis) -> f64 {
        self.axis(axis.cross())
    }

    /// Copy with the extent along `axis` replaced.
    pub fn with_main_axis(mut self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
        self
    }

    /// Copy with the extent perpendicular to `axis` replaced.
    pub fn with_cross_axis(self, axis: Axis, value: f64) -> Self {
        self.with_main_axis(axis.cross(), value)
    }

    /// Replace each `0`/`MAX` field with the corresponding field of `other`.
    /// Explicit sizes always win over the boundary.
    pub fn merge(mut self, other: Size) -> Self {
        if is_unsized(self.width) {
            self.width = other.width;
        }
        if is_unsized(self.height) {
            self.height = other.height;
        }
        self
    }

    /// Shrink by the insets (the space left inside padding).
    pub fn with_padding(self, padding: EdgeInsets) -> Self {
        Self {
            width: self.width - padding.horizontal(),
            height: self.height - padding.vertical(),
        }
    }

    /// Grow by the insets (the outer box of padded content).
    pub fn without_padding(self, padding: EdgeInsets) -> Self {
        Self {
            width: self.width + padding.horizontal(),
            height: self.height + padding.vertical(),
        }
    }

    /// Both axes are within the container.
    pub fn fits_container(&self, container: Size) -> bool {
        self.width <= container.width && self.height <= container.height
    }

    pub fn fits_container_axis(&self, container: Size, axis: Axis) -> bool {
        self.axis(axis) <= container.axis(axis)
    }

    /// Per-axis `self - other`; the leftover space used for alignment.
    pub fn difference(&self, other: Size) -> Size {
        Size {
            width: self.width - other.width,
            height: self.height - other.height,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    pub fn has_zero_value(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// No negative extent.
    pub fn is_valid(&self) -> bool {
        self.width >= 0.0 && self.height >= 0.0
    }

    pub fn has_unresolved_max(&self) -> bool {
        self.width == MAX_SIZE || self.height == MAX_SIZE
    }

    /// Render-time check: strictly positive and fully resolved.
    pub fn ensure_drawable(&self, element: &'static str) -> Result<()> {
        if self.has_zero_value() || !self.is_valid() || self.has_unresolved_max() {
            return Err(LayoutError::InvalidSize {
                element,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    pub fn to_offset(&self) -> Offset {
        Offset::new(self.width, self.height)
    }
}

/// A pen position on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Move `amount` along `axis`.
    pub fn advance(self, axis: Axis, amount: f64) -> Self {
        match axis {
            Axis::Horizontal => self.translate(amount, 0.0),
            Axis::Vertical => self.translate(0.0, amount),
        }
    }
}

/// Padding on each side of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        left: 0.0,
        right: 0.0,
        top: 0.0,
        bottom: 0.0,
    };

    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self::new(horizontal, horizontal, vertical, vertical)
    }

    pub fn horizontal_only(left: f64, right: f64) -> Self {
        Self::new(left, right, 0.0, 0.0)
    }

    pub fn vertical_only(top: f64, bottom: f64) -> Self {
        Self::new(0.0, 0.0, top, bottom)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Fill zero sides from `other`.
    pub fn merge(mut self, other: EdgeInsets) -> Self {
        if self.left == 0.0 {
            self.left = other.left;
        }
        if self.right == 0.0 {
            self.right = other.right;
        }
        if self.top == 0.0 {
            self.top = other.top;
        }
        if self.bottom == 0.0 {
            self.bottom = other.bottom;
        }
        self
    }

    /// Top-left corner of the padded area for a box starting at `origin`.
    pub fn inner_origin(&self, origin: Offset) -> Offset {
        origin.translate(self.left, self.top)
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }

    pub fn size(&self) -> Size {
        let (w, h) = self.dimensions();
        Size::new(w, h)
    }
}
