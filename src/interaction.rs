//! Touch routing and nearest-element searches.
//!
//! Render backends translate raw pointer events into [`TouchEvent`]s in
//! chart-local pixels; charts resolve them against their projected points.

use crate::geom::{ScreenPoint, distance_sq};

/// Phase of a touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    /// Finger (or button) went down.
    Down,
    /// Finger moved while down.
    Move,
    /// Finger lifted.
    Up,
    /// The touch was cancelled by the host.
    Cancel,
}

impl TouchPhase {
    /// Whether the phase ends the touch.
    pub fn is_release(self) -> bool {
        matches!(self, Self::Up | Self::Cancel)
    }
}

/// A touch in chart-local pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Touch phase.
    pub phase: TouchPhase,
    /// Touch position.
    pub position: ScreenPoint,
}

impl TouchEvent {
    /// Create a touch event.
    pub fn new(phase: TouchPhase, position: ScreenPoint) -> Self {
        Self { phase, position }
    }

    /// Touches left of the chart never resolve.
    pub fn is_outside(&self) -> bool {
        self.position.x < 0.0 || !self.position.x.is_finite() || !self.position.y.is_finite()
    }

    /// Position relative to `origin`, or `None` when the touch lies left of it.
    ///
    /// Plotted charts pass their content origin so touches on the axis
    /// labels never resolve.
    pub fn relative_to(&self, origin: ScreenPoint) -> Option<ScreenPoint> {
        if self.is_outside() {
            return None;
        }
        let local = self.position.offset(-origin.x, -origin.y);
        (local.x >= 0.0).then_some(local)
    }
}

/// Index of the value closest to `x`; ties go to the first candidate.
pub fn nearest_by_x(centers: impl IntoIterator<Item = f32>, x: f32) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (index, center) in centers.into_iter().enumerate() {
        let distance = (center - x).abs();
        if best.is_none_or(|(_, best_distance)| distance < best_distance) {
            best = Some((index, distance));
        }
    }
    best.map(|(index, _)| index)
}

/// Index of the sorted position closest to `x`, by binary search.
///
/// Equal distances resolve to the left neighbour.
pub fn nearest_sorted_by_x(positions: &[f32], x: f32) -> Option<usize> {
    if positions.is_empty() || !x.is_finite() {
        return None;
    }
    let lower = positions.partition_point(|position| *position < x);
    if lower == 0 {
        return Some(0);
    }
    if lower >= positions.len() {
        return Some(positions.len() - 1);
    }
    let left = lower - 1;
    if (x - positions[left]).abs() <= (positions[lower] - x).abs() {
        Some(left)
    } else {
        Some(lower)
    }
}

/// Key of the point with the smallest Euclidean distance to `target`.
///
/// Ties go to the first candidate.
pub fn nearest_point<K>(
    candidates: impl IntoIterator<Item = (K, ScreenPoint)>,
    target: ScreenPoint,
) -> Option<K> {
    let mut best: Option<(K, f32)> = None;
    for (key, point) in candidates {
        let distance = distance_sq(point, target);
        if best
            .as_ref()
            .is_none_or(|(_, best_distance)| distance < *best_distance)
        {
            best = Some((key, distance));
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_by_x_prefers_first_on_tie() {
        assert_eq!(nearest_by_x([0.0, 10.0], 5.0), Some(0));
        assert_eq!(nearest_by_x([0.0, 10.0], 5.1), Some(1));
        assert_eq!(nearest_by_x(std::iter::empty(), 5.0), None);
    }

    #[test]
    fn nearest_sorted_clamps_to_ends() {
        let positions = [0.0, 10.0, 20.0];
        assert_eq!(nearest_sorted_by_x(&positions, -5.0), Some(0));
        assert_eq!(nearest_sorted_by_x(&positions, 500.0), Some(2));
        assert_eq!(nearest_sorted_by_x(&positions, 14.0), Some(1));
        assert_eq!(nearest_sorted_by_x(&positions, 15.0), Some(1));
        assert_eq!(nearest_sorted_by_x(&positions, 16.0), Some(2));
    }

    #[test]
    fn nearest_point_is_two_dimensional() {
        let candidates = [
            ((0, 0), ScreenPoint::new(0.0, 0.0)),
            ((0, 1), ScreenPoint::new(10.0, 100.0)),
            ((1, 0), ScreenPoint::new(12.0, 2.0)),
        ];
        assert_eq!(nearest_point(candidates, ScreenPoint::new(10.0, 0.0)), Some((1, 0)));

        let tied = [
            ((0, 0), ScreenPoint::new(0.0, 0.0)),
            ((0, 1), ScreenPoint::new(10.0, 0.0)),
        ];
        assert_eq!(nearest_point(tied, ScreenPoint::new(5.0, 0.0)), Some((0, 0)));
    }

    #[test]
    fn relative_position_rejects_left_of_origin() {
        let origin = ScreenPoint::new(44.0, 8.0);
        let inset = TouchEvent::new(TouchPhase::Down, ScreenPoint::new(5.0, 50.0));
        assert_eq!(inset.relative_to(origin), None);

        let inside = TouchEvent::new(TouchPhase::Down, ScreenPoint::new(50.0, 50.0));
        assert_eq!(inside.relative_to(origin), Some(ScreenPoint::new(6.0, 42.0)));

        let edge = TouchEvent::new(TouchPhase::Move, ScreenPoint::new(44.0, 0.0));
        assert_eq!(edge.relative_to(origin), Some(ScreenPoint::new(0.0, -8.0)));
    }

    #[test]
    fn release_phases() {
        assert!(TouchPhase::Up.is_release());
        assert!(TouchPhase::Cancel.is_release());
        assert!(!TouchPhase::Move.is_release());
    }
}
