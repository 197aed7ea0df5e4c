//! # Drawing Styles
//!
//! Colors, stroke options, borders and font selection. These are plain
//! values handed to the canvas; nothing here knows about layout.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// From 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Parse `#rgb` or `#rrggbb`; anything else is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);
        match hex.len() {
            3 => Self::rgb8(
                channel(&hex[0..1].repeat(2)),
                channel(&hex[1..2].repeat(2)),
                channel(&hex[2..3].repeat(2)),
            ),
            6 => Self::rgb8(channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
            _ => Self::BLACK,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Stroke pattern for lines and borders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Stroke width, pattern and color of a line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineOptions {
    pub stroke_width: f64,
    pub style: LineStyle,
    pub color: Color,
}

impl LineOptions {
    pub fn new(stroke_width: f64, style: LineStyle, color: Color) -> Self {
        Self {
            stroke_width,
            style,
            color,
        }
    }
}

impl Default for LineOptions {
    fn default() -> Self {
        Self {
            stroke_width: 0.5,
            style: LineStyle::Solid,
            color: Color::BLACK,
        }
    }
}

bitflags! {
    /// Which sides of a box a border covers. Empty means no border.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BorderSide: u8 {
        const LEFT = 1;
        const RIGHT = 2;
        const TOP = 4;
        const BOTTOM = 8;

        const ALL = Self::LEFT.bits() | Self::RIGHT.bits() | Self::TOP.bits() | Self::BOTTOM.bits();
    }
}

/// A set of sides drawn with one line style.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub sides: BorderSide,
    pub options: LineOptions,
}

impl Border {
    pub fn new(sides: BorderSide) -> Self {
        Self {
            sides,
            options: LineOptions::default(),
        }
    }

    pub fn with_options(sides: BorderSide, options: LineOptions) -> Self {
        Self { sides, options }
    }

    pub fn all() -> Self {
        Self::new(BorderSide::ALL)
    }

    pub fn is_visible(&self) -> bool {
        !self.sides.is_empty() && self.options.stroke_width >= 0.0
    }
}

/// Font selection for a run of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Vertical advance between consecutive lines.
    pub fn line_height(&self) -> f64 {
        self.size * 1.2
    }
}

impl Default for Font {
    fn default() -> Self {
        Font::new("Helvetica", 10.0)
    }
}
