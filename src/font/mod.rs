//! # Font Management
//!
//! Resolves a [`Font`] selection to one of the standard PDF fonts and measures
//! strings with its width table. Standard fonts need no embedding, so the PDF
//! writer only references them by name.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::style::Font;

/// The standard PDF fonts this engine can measure and emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// Pick the face for a family name and style. Unknown families fall back
    /// to Helvetica.
    pub fn resolve(font: &Font) -> Self {
        let family = font.family.to_ascii_lowercase();
        let family = family.trim();
        let (bold, italic) = (font.bold, font.italic);
        if family.starts_with("times") || family == "serif" {
            match (bold, italic) {
                (false, false) => Self::TimesRoman,
                (true, false) => Self::TimesBold,
                (false, true) => Self::TimesItalic,
                (true, true) => Self::TimesBoldItalic,
            }
        } else if family.starts_with("courier") || family == "monospace" {
            match (bold, italic) {
                (false, false) => Self::Courier,
                (true, false) => Self::CourierBold,
                (false, true) => Self::CourierOblique,
                (true, true) => Self::CourierBoldOblique,
            }
        } else {
            match (bold, italic) {
                (false, false) => Self::Helvetica,
                (true, false) => Self::HelveticaBold,
                (false, true) => Self::HelveticaOblique,
                (true, true) => Self::HelveticaBoldOblique,
            }
        }
    }

    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::TimesRoman => "Times-Roman",
            Self::TimesBold => "Times-Bold",
            Self::TimesItalic => "Times-Italic",
            Self::TimesBoldItalic => "Times-BoldItalic",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Width table. Slanted faces share the upright face's advances.
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &metrics::HELVETICA_METRICS,
            Self::HelveticaBold | Self::HelveticaBoldOblique => &metrics::HELVETICA_BOLD_METRICS,
            Self::TimesRoman | Self::TimesItalic => &metrics::TIMES_ROMAN_METRICS,
            Self::TimesBold | Self::TimesBoldItalic => &metrics::TIMES_BOLD_METRICS,
            Self::Courier
            | Self::CourierBold
            | Self::CourierOblique
            | Self::CourierBoldOblique => &metrics::COURIER_METRICS,
        }
    }
}

/// Width of `text` in points when set in `font`.
pub fn measure_text(text: &str, font: &Font) -> f64 {
    StandardFont::resolve(font).metrics().measure(text, font.size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_families_and_styles() {
        assert_eq!(StandardFont::resolve(&Font::default()), StandardFont::Helvetica);
        assert_eq!(
            StandardFont::resolve(&Font::new("Times New Roman", 10.0).bold()),
            StandardFont::TimesBold
        );
        assert_eq!(
            StandardFont::resolve(&Font::new("courier", 10.0).italic()),
            StandardFont::CourierOblique
        );
        assert_eq!(
            StandardFont::resolve(&Font::new("Roboto", 10.0).bold().italic()),
            StandardFont::HelveticaBoldOblique
        );
    }

    #[test]
    fn measures_with_font_size() {
        let font = Font::new("Helvetica", 12.0);
        assert!((measure_text(" ", &font) - 3.336).abs() < 0.001);
        assert!(measure_text("Hello", &font.clone().bold()) > measure_text("Hello", &font));
    }

    #[test]
    fn pdf_names() {
        assert_eq!(StandardFont::TimesBoldItalic.pdf_name(), "Times-BoldItalic");
        assert_eq!(StandardFont::HelveticaBoldOblique.pdf_name(), "Helvetica-BoldOblique");
    }
}
