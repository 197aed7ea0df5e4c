//! # Main-Axis Distribution
//!
//! The arithmetic behind Row and Column: how leftover space becomes gaps
//! (justify-content) and how much room each unsized child gets. Both work
//! on plain extents so they can be tested without building a tree.

use serde::{Deserialize, Serialize};

use crate::geometry::is_unsized;

/// How leftover main-axis space is spread around the children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JustifyContent {
    /// Children packed at the start, no gaps.
    #[default]
    None,
    SpaceBetween,
    SpaceEvenly,
    SpaceAround,
}

/// Gap before the first / after the last child, and between neighbours.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gaps {
    pub edge: f64,
    pub between: f64,
}

impl Gaps {
    pub const ZERO: Gaps = Gaps {
        edge: 0.0,
        between: 0.0,
    };
}

/// Compute gaps for children of the given main-axis `extents` inside a
/// container `container` long. Negative leftover is treated as none.
pub fn calculate_spacing(extents: &[f64], container: f64, justify: JustifyContent) -> Gaps {
    let n = extents.len();
    if n == 0 || container <= 0.0 {
        return Gaps::ZERO;
    }
    let used: f64 = extents.iter().sum();
    let leftover = (container - used).max(0.0);
    let count = n as f64;

    match justify {
        JustifyContent::None => Gaps::ZERO,
        JustifyContent::SpaceBetween => {
            if n < 2 {
                Gaps::ZERO
            } else {
                Gaps {
                    edge: 0.0,
                    between: leftover / (count - 1.0),
                }
            }
        }
        JustifyContent::SpaceEvenly => {
            let gap = leftover / (count + 1.0);
            Gaps {
                edge: gap,
                between: gap,
            }
        }
        JustifyContent::SpaceAround => {
            let unit = leftover / (2.0 * count);
            Gaps {
                edge: unit,
                between: 2.0 * unit,
            }
        }
    }
}

/// Share of `available` each unsized (`0` or `MAX`) entry receives after the
/// sized entries take theirs. Zero when nothing is unsized or nothing is left.
pub fn unsized_extent(authored_extents: &[f64], available: f64) -> f64 {
    let (open, sized): (Vec<f64>, Vec<f64>) =
        authored_extents.iter().partition(|extent| is_unsized(**extent));
    if open.is_empty() {
        return 0.0;
    }
    let remaining = available - sized.iter().sum::<f64>();
    (remaining / open.len() as f64).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::MAX_SIZE;

    const EPS: f64 = 1e-9;

    #[test]
    fn unsized_child_takes_the_rest() {
        assert!((unsized_extent(&[50.0, 50.0, 0.0], 200.0) - 100.0).abs() < EPS);
        assert!((unsized_extent(&[0.0, MAX_SIZE, 40.0], 100.0) - 30.0).abs() < EPS);
        assert_eq!(unsized_extent(&[10.0, 20.0], 100.0), 0.0);
        assert_eq!(unsized_extent(&[80.0, 0.0], 50.0), 0.0);
    }

    #[test]
    fn space_between_fills_container() {
        let extents = [20.0, 30.0, 10.0];
        let gaps = calculate_spacing(&extents, 100.0, JustifyContent::SpaceBetween);
        assert_eq!(gaps.edge, 0.0);
        let total: f64 = extents.iter().sum::<f64>() + 2.0 * gaps.between;
        assert!((total - 100.0).abs() < EPS);
    }

    #[test]
    fn space_evenly_uses_equal_gaps() {
        let extents = [10.0, 10.0, 10.0, 10.0];
        let gaps = calculate_spacing(&extents, 90.0, JustifyContent::SpaceEvenly);
        assert_eq!(gaps.edge, gaps.between);
        assert!((5.0 * gaps.edge + 40.0 - 90.0).abs() < EPS);
    }

    #[test]
    fn space_around_edges_are_half_the_gap() {
        let gaps = calculate_spacing(&[10.0, 10.0], 60.0, JustifyContent::SpaceAround);
        assert!((gaps.edge - 10.0).abs() < EPS);
        assert!((gaps.between - 20.0).abs() < EPS);
    }

    #[test]
    fn degenerate_containers_have_no_gaps() {
        assert_eq!(calculate_spacing(&[], 100.0, JustifyContent::SpaceEvenly), Gaps::ZERO);
        assert_eq!(calculate_spacing(&[10.0], 0.0, JustifyContent::SpaceAround), Gaps::ZERO);
        assert_eq!(calculate_spacing(&[10.0], 50.0, JustifyContent::SpaceBetween), Gaps::ZERO);
        assert_eq!(calculate_spacing(&[10.0, 20.0], 50.0, JustifyContent::None), Gaps::ZERO);
        assert_eq!(
            calculate_spacing(&[60.0, 60.0], 100.0, JustifyContent::SpaceBetween),
            Gaps::ZERO
        );
    }
}
