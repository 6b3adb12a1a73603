#![forbid(unsafe_code)]

//! Grid geometry for the 3×3 pattern lock.
//!
//! Pure, stateless functions over a fixed 9-node index space and a
//! configurable bounding box. Indices are row-major: `index = row * 3 + col`.
//!
//! # Invariants
//!
//! 1. `is_adjacent_or_skip` is symmetric: `f(a, b) == f(b, a)`.
//! 2. `skip_midpoint` returns `Some` exactly for straight two-step jumps
//!    (horizontal, vertical, or full diagonal); `None` for king moves.
//! 3. `nearest_any` always returns a valid index; `nearest_within` returns
//!    `None` when the nearest center is farther than the given radius.

/// Number of nodes in the grid.
pub const GRID_NODES: usize = 9;

/// Nodes per row/column.
pub const GRID_SIDE: u8 = 3;

/// A 2D coordinate in the same local space as the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Comparisons only need the squared form, so the sqrt is skipped.
    #[inline]
    #[must_use]
    pub fn distance_sq(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f32, f32)> for PointF {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}

/// Grid sizing configuration.
///
/// Node centers are a deterministic function of `box_size` and `padding`;
/// the default 300-unit box with 48-unit padding yields a 204×204 inner
/// area with a 102-unit step between adjacent centers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSpec {
    /// Side length of the square bounding box.
    pub box_size: f32,
    /// Inset from each edge of the box to the outer node centers.
    pub padding: f32,
    /// Acceptance radius around a center during drag and at release.
    pub hit_radius: f32,
    /// Visual marker radius (feedback only, not part of hit testing).
    pub node_radius: f32,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            box_size: 300.0,
            padding: 48.0,
            hit_radius: 24.0,
            node_radius: 12.0,
        }
    }
}

impl GridSpec {
    /// The 9 node centers in row-major order.
    #[must_use]
    pub fn centers(&self) -> [PointF; GRID_NODES] {
        let step = (self.box_size - 2.0 * self.padding) / f32::from(GRID_SIDE - 1);
        let mut centers = [PointF::default(); GRID_NODES];
        for (index, center) in centers.iter_mut().enumerate() {
            let (row, col) = row_col(index as u8);
            *center = PointF::new(
                self.padding + f32::from(col) * step,
                self.padding + f32::from(row) * step,
            );
        }
        centers
    }
}

/// Row and column of a node index.
///
/// Input is always `0..9`; out-of-range values are a caller bug.
#[inline]
#[must_use]
pub const fn row_col(index: u8) -> (u8, u8) {
    debug_assert!(index < GRID_NODES as u8);
    (index / GRID_SIDE, index % GRID_SIDE)
}

/// Whether moving from `a` to `b` is a legal pattern step.
///
/// True when `b` is a king-move neighbor of `a` (row/col delta each in
/// `{-1, 0, 1}`, not equal) or a straight two-step jump (row/col delta each
/// in `{-2, 0, 2}`, at least one non-zero). Two-step jumps must pass through
/// the midpoint node, which [`skip_midpoint`] identifies for auto-insertion.
#[must_use]
pub fn is_adjacent_or_skip(a: u8, b: u8) -> bool {
    if a == b {
        return false;
    }
    let (ar, ac) = row_col(a);
    let (br, bc) = row_col(b);
    let dr = (i16::from(br) - i16::from(ar)).abs();
    let dc = (i16::from(bc) - i16::from(ac)).abs();

    let king = dr <= 1 && dc <= 1;
    let skip = dr % 2 == 0 && dc % 2 == 0;
    king || skip
}

/// The node at the exact midpoint of a straight two-step jump.
///
/// Returns `None` for king moves, knight-like moves, and `a == b`.
#[must_use]
pub fn skip_midpoint(a: u8, b: u8) -> Option<u8> {
    if a == b {
        return None;
    }
    let (ar, ac) = row_col(a);
    let (br, bc) = row_col(b);
    let even_deltas = (i16::from(br) - i16::from(ar)) % 2 == 0
        && (i16::from(bc) - i16::from(ac)) % 2 == 0;
    if !even_deltas {
        return None;
    }
    let mid_row = (ar + br) / 2;
    let mid_col = (ac + bc) / 2;
    Some(mid_row * GRID_SIDE + mid_col)
}

/// Euclidean-nearest node to `point`, with no radius limit.
///
/// Used only to snap the very first touch-down to a starting node.
#[must_use]
pub fn nearest_any(point: PointF, centers: &[PointF; GRID_NODES]) -> u8 {
    let mut best = 0u8;
    let mut best_dist = f32::INFINITY;
    for (index, center) in centers.iter().enumerate() {
        let dist = point.distance_sq(*center);
        if dist < best_dist {
            best = index as u8;
            best_dist = dist;
        }
    }
    best
}

/// Euclidean-nearest node to `point`, or `None` if it is farther than
/// `radius`. Used during drag and at release.
#[must_use]
pub fn nearest_within(point: PointF, centers: &[PointF; GRID_NODES], radius: f32) -> Option<u8> {
    let index = nearest_any(point, centers);
    let dist_sq = point.distance_sq(centers[usize::from(index)]);
    (dist_sq <= radius * radius).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_centers_span_inner_area() {
        let centers = GridSpec::default().centers();
        assert_eq!(centers[0], PointF::new(48.0, 48.0));
        assert_eq!(centers[1], PointF::new(150.0, 48.0));
        assert_eq!(centers[4], PointF::new(150.0, 150.0));
        assert_eq!(centers[8], PointF::new(252.0, 252.0));
    }

    #[test]
    fn centers_are_row_major() {
        let centers = GridSpec::default().centers();
        // Node 3 starts row 1: same x as node 0, y one step down.
        assert_eq!(centers[3].x, centers[0].x);
        assert_eq!(centers[3].y, centers[0].y + 102.0);
    }

    #[test]
    fn centers_follow_grid_overrides() {
        let grid = GridSpec {
            box_size: 100.0,
            padding: 10.0,
            ..GridSpec::default()
        };
        let centers = grid.centers();
        assert_eq!(centers[0], PointF::new(10.0, 10.0));
        assert_eq!(centers[8], PointF::new(90.0, 90.0));
        assert_eq!(centers[4], PointF::new(50.0, 50.0));
    }

    #[test]
    fn row_col_decomposition() {
        assert_eq!(row_col(0), (0, 0));
        assert_eq!(row_col(2), (0, 2));
        assert_eq!(row_col(4), (1, 1));
        assert_eq!(row_col(7), (2, 1));
        assert_eq!(row_col(8), (2, 2));
    }

    #[test]
    fn king_moves_are_adjacent() {
        assert!(is_adjacent_or_skip(4, 0));
        assert!(is_adjacent_or_skip(4, 1));
        assert!(is_adjacent_or_skip(4, 8));
        assert!(is_adjacent_or_skip(0, 1));
        assert!(is_adjacent_or_skip(0, 3));
        assert!(is_adjacent_or_skip(0, 4));
    }

    #[test]
    fn straight_two_step_jumps_are_adjacent() {
        // Horizontal, vertical, and the permissive long diagonal.
        assert!(is_adjacent_or_skip(0, 2));
        assert!(is_adjacent_or_skip(0, 6));
        assert!(is_adjacent_or_skip(0, 8));
        assert!(is_adjacent_or_skip(2, 6));
        assert!(is_adjacent_or_skip(3, 5));
        assert!(is_adjacent_or_skip(1, 7));
    }

    #[test]
    fn knight_like_moves_are_rejected() {
        // (0,0) -> (1,2) and friends: neither king nor straight two-step.
        assert!(!is_adjacent_or_skip(0, 5));
        assert!(!is_adjacent_or_skip(0, 7));
        assert!(!is_adjacent_or_skip(2, 3));
        assert!(!is_adjacent_or_skip(6, 1));
    }

    #[test]
    fn same_node_is_not_adjacent() {
        for i in 0..GRID_NODES as u8 {
            assert!(!is_adjacent_or_skip(i, i));
        }
    }

    #[test]
    fn adjacency_is_symmetric() {
        for a in 0..GRID_NODES as u8 {
            for b in 0..GRID_NODES as u8 {
                assert_eq!(
                    is_adjacent_or_skip(a, b),
                    is_adjacent_or_skip(b, a),
                    "asymmetric for ({a}, {b})"
                );
            }
        }
    }

    #[test]
    fn skip_midpoint_for_straight_jumps() {
        assert_eq!(skip_midpoint(0, 2), Some(1));
        assert_eq!(skip_midpoint(0, 6), Some(3));
        assert_eq!(skip_midpoint(0, 8), Some(4));
        assert_eq!(skip_midpoint(2, 6), Some(4));
        assert_eq!(skip_midpoint(6, 8), Some(7));
        assert_eq!(skip_midpoint(3, 5), Some(4));
        assert_eq!(skip_midpoint(1, 7), Some(4));
    }

    #[test]
    fn skip_midpoint_none_for_king_moves() {
        assert_eq!(skip_midpoint(0, 1), None);
        assert_eq!(skip_midpoint(0, 4), None);
        assert_eq!(skip_midpoint(4, 8), None);
    }

    #[test]
    fn skip_midpoint_none_for_same_node() {
        assert_eq!(skip_midpoint(5, 5), None);
    }

    #[test]
    fn nearest_any_snaps_far_points() {
        let centers = GridSpec::default().centers();
        // Way outside the grid still snaps to the closest corner.
        assert_eq!(nearest_any(PointF::new(-500.0, -500.0), &centers), 0);
        assert_eq!(nearest_any(PointF::new(1000.0, 1000.0), &centers), 8);
        assert_eq!(nearest_any(PointF::new(150.0, 150.0), &centers), 4);
    }

    #[test]
    fn nearest_within_respects_radius() {
        let centers = GridSpec::default().centers();
        let radius = GridSpec::default().hit_radius;

        // Dead center of node 4.
        assert_eq!(nearest_within(PointF::new(150.0, 150.0), &centers, radius), Some(4));
        // 20 units off is inside the 24-unit hit radius.
        assert_eq!(nearest_within(PointF::new(170.0, 150.0), &centers, radius), Some(4));
        // Between nodes: nearest is ~51 units away, outside the radius.
        assert_eq!(nearest_within(PointF::new(99.0, 150.0), &centers, radius), None);
    }

    #[test]
    fn nearest_within_boundary_is_inclusive() {
        let centers = GridSpec::default().centers();
        assert_eq!(
            nearest_within(PointF::new(150.0 + 24.0, 150.0), &centers, 24.0),
            Some(4)
        );
        assert_eq!(
            nearest_within(PointF::new(150.0 + 24.1, 150.0), &centers, 24.0),
            None
        );
    }

    #[test]
    fn point_distance_sq() {
        let a = PointF::new(0.0, 0.0);
        let b = PointF::new(3.0, 4.0);
        assert_eq!(a.distance_sq(b), 25.0);
        assert_eq!(b.distance_sq(a), 25.0);
    }

    #[test]
    fn point_from_tuple() {
        assert_eq!(PointF::from((1.5, -2.0)), PointF::new(1.5, -2.0));
    }
}
