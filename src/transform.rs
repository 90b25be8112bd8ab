//! Value to pixel transforms.

use crate::limits::AxisLimits;

/// Maps values within [`AxisLimits`] onto a pixel extent.
///
/// Pixel offsets are measured from the top (or left) edge of the extent, so
/// the largest value lands at 0 and the smallest at `extent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    limits: AxisLimits,
    extent: f32,
}

impl Scale {
    /// Create a scale for the given limits and pixel extent.
    pub fn new(limits: AxisLimits, extent: f32) -> Self {
        Self {
            limits,
            extent: extent.max(0.0),
        }
    }

    /// Access the limits.
    pub fn limits(&self) -> AxisLimits {
        self.limits
    }

    /// Access the pixel extent.
    pub fn extent(&self) -> f32 {
        self.extent
    }

    /// Inverted offset of a value: `(max - value) / span * extent`.
    ///
    /// A zero span maps everything to the far edge.
    pub fn offset_of(&self, value: f64) -> f32 {
        if !self.limits.has_span() {
            return self.extent;
        }
        ((self.limits.max - value) / self.limits.span() * self.extent as f64) as f32
    }

    /// Recover the value at a pixel offset.
    pub fn value_at(&self, offset: f32) -> f64 {
        if self.extent <= 0.0 {
            return self.limits.min;
        }
        self.limits.max - offset as f64 / self.extent as f64 * self.limits.span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_inverted() {
        let scale = Scale::new(AxisLimits::new(-6.0, 6.0), 120.0);
        assert!((scale.offset_of(6.0) - 0.0).abs() < 1e-6);
        assert!((scale.offset_of(-6.0) - 120.0).abs() < 1e-6);
        assert!((scale.offset_of(0.0) - 60.0).abs() < 1e-6);
    }

    #[test]
    fn offset_roundtrip() {
        let scale = Scale::new(AxisLimits::new(-2.0, 8.0), 300.0);
        let value = 3.25;
        let back = scale.value_at(scale.offset_of(value));
        assert!((back - value).abs() < 1e-4);
    }

    #[test]
    fn zero_span_falls_to_far_edge() {
        let scale = Scale::new(AxisLimits::EMPTY, 50.0);
        assert_eq!(scale.offset_of(0.0), 50.0);
    }
}
