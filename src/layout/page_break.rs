//! # Page Break Decisions
//!
//! Children are never split: a child either goes on the current page or
//! the whole child moves to the next one.

/// Tolerance for accumulated float error when comparing against page space.
pub const FIT_EPSILON: f64 = 1e-6;

/// What to do with the next child of a paginating column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// The child fits in the remaining space.
    Place,
    /// Start a new page and place the child there.
    MoveToNextPage,
}

/// Decide where a child `child_extent` tall goes given `remaining` space.
///
/// A child that does not fit is still placed when the cursor is already at
/// the top of a fresh body region; breaking again would only produce an
/// empty page.
pub fn decide_break(remaining: f64, child_extent: f64, at_page_start: bool) -> BreakDecision {
    if child_extent <= remaining + FIT_EPSILON || at_page_start {
        BreakDecision::Place
    } else {
        BreakDecision::MoveToNextPage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fits_places() {
        assert_eq!(decide_break(100.0, 50.0, false), BreakDecision::Place);
        assert_eq!(decide_break(50.0, 50.0, false), BreakDecision::Place);
        assert_eq!(decide_break(50.0, 50.0 + 1e-9, false), BreakDecision::Place);
    }

    #[test]
    fn overflow_moves() {
        assert_eq!(decide_break(49.0, 50.0, false), BreakDecision::MoveToNextPage);
        assert_eq!(decide_break(0.0, 1.0, false), BreakDecision::MoveToNextPage);
    }

    #[test]
    fn oversized_child_at_page_start_is_placed() {
        assert_eq!(decide_break(700.0, 900.0, true), BreakDecision::Place);
    }
}
