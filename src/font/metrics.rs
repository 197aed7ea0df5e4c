//! Advance widths for the standard PDF fonts, in 1/1000 em.
//!
//! Tables cover printable ASCII (0x20..=0x7E) and come from the Adobe AFM
//! files. Characters outside the table use the font's fallback width.

/// Widths for one face, indexed by `ch as usize - 0x20`.
pub struct StandardFontMetrics {
    pub widths: &'static [u16; 95],
    pub fallback: u16,
}

impl StandardFontMetrics {
    /// Advance width of `ch` in 1/1000 em.
    pub fn char_width(&self, ch: char) -> u16 {
        let cp = ch as u32;
        if (0x20..=0x7E).contains(&cp) {
            self.widths[(cp - 0x20) as usize]
        } else if ch == '\u{00A0}' {
            self.widths[0]
        } else {
            self.fallback
        }
    }

    /// Width of `text` in points at `size`.
    pub fn measure(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text.chars().map(|c| self.char_width(c) as u32).sum();
        units as f64 * size / 1000.0
    }
}

#[rustfmt::skip]
static HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
static HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
static TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
static TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

static COURIER: [u16; 95] = [600; 95];

pub static HELVETICA_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA,
    fallback: 556,
};

pub static HELVETICA_BOLD_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &HELVETICA_BOLD,
    fallback: 611,
};

pub static TIMES_ROMAN_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &TIMES_ROMAN,
    fallback: 500,
};

pub static TIMES_BOLD_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &TIMES_BOLD,
    fallback: 500,
};

pub static COURIER_METRICS: StandardFontMetrics = StandardFontMetrics {
    widths: &COURIER,
    fallback: 600,
};
