//! Box alignment as a bitmask over one horizontal and one vertical choice.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::geometry::{Offset, Size};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Alignment: u8 {
        const BOTTOM = 1;
        const RIGHT = 2;
        const TOP = 4;
        const LEFT = 8;
        const H_CENTER = 16;
        const V_CENTER = 32;

        const CENTER = Self::H_CENTER.bits() | Self::V_CENTER.bits();
    }
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::empty()
    }
}

impl Alignment {
    /// Rejects Left+Right, Left+HCenter, Top+Bottom and Top+VCenter.
    pub fn is_valid(self) -> bool {
        if self.contains(Alignment::LEFT)
            && self.intersects(Alignment::RIGHT | Alignment::H_CENTER)
        {
            return false;
        }
        if self.contains(Alignment::TOP)
            && self.intersects(Alignment::BOTTOM | Alignment::V_CENTER)
        {
            return false;
        }
        true
    }

    /// Only the left/right/center bits.
    pub fn horizontal(self) -> Self {
        self & (Alignment::LEFT | Alignment::RIGHT | Alignment::H_CENTER)
    }

    /// Only the top/bottom/center bits.
    pub fn vertical(self) -> Self {
        self & (Alignment::TOP | Alignment::BOTTOM | Alignment::V_CENTER)
    }

    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(LayoutError::InvalidAlignment(self))
        }
    }

    /// Cursor shift that places a box inside `leftover` extra space.
    /// Flags combine additively.
    pub fn offset_within(self, leftover: Size) -> Offset {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if leftover.width > 0.0 {
            if self.contains(Alignment::RIGHT) {
                dx += leftover.width;
            }
            if self.contains(Alignment::H_CENTER) {
                dx += leftover.width / 2.0;
            }
        }
        if leftover.height > 0.0 {
            if self.contains(Alignment::BOTTOM) {
                dy += leftover.height;
            }
            if self.contains(Alignment::V_CENTER) {
                dy += leftover.height / 2.0;
            }
        }
        Offset::new(dx, dy)
    }
}
