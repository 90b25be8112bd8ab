//! Axis limit calculation.
//!
//! Limits are derived once per layout pass from a snapshot of every value in
//! scope. All calculators keep `min <= 0 <= max`, which makes the span the
//! sum of the bound magnitudes.

use crate::geom::Point;

/// Default headroom above the tallest bar.
pub const BAR_SHIFT: f64 = 0.05;
/// Headroom applied to straight line charts.
pub const LINE_SHIFT: f64 = 0.10;
/// Headroom applied to bezier line charts; curves overshoot their points.
pub const LINE_BEZIER_SHIFT: f64 = 0.20;

/// Axis bounds computed for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl AxisLimits {
    /// Limits of a chart without data.
    pub const EMPTY: Self = Self { min: 0.0, max: 0.0 };

    /// Create limits from bounds, swapping them if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Distance between the bounds, `|min| + |max|`.
    pub fn span(&self) -> f64 {
        self.min.abs() + self.max.abs()
    }

    /// Whether the span can be used as a divisor.
    pub fn has_span(&self) -> bool {
        self.span() > 0.0 && self.span().is_finite()
    }

    /// Check whether a value lies within the bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Evenly spaced values from `min` to `max`, both inclusive.
    pub fn steps(&self, count: usize) -> Vec<f64> {
        match count {
            0 => Vec::new(),
            1 => vec![self.min],
            _ => {
                let step = (self.max - self.min) / (count - 1) as f64;
                (0..count).map(|i| self.min + step * i as f64).collect()
            }
        }
    }
}

impl Default for AxisLimits {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Compute the value axis of a bar chart.
///
/// Non-stacked charts use the largest magnitude of any bar; stacked charts
/// use the largest per-item sum of magnitudes. The maximum is inflated by
/// `shift` so no bar touches the top edge. Without data the maximum stays 0.
pub fn bar_limits(datasets: &[Vec<f64>], stacked: bool, shift: f64) -> AxisLimits {
    let max = if stacked {
        let items = datasets.iter().map(Vec::len).max().unwrap_or(0);
        (0..items)
            .map(|item| {
                datasets
                    .iter()
                    .filter_map(|dataset| dataset.get(item))
                    .map(|value| value.abs())
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    } else {
        datasets
            .iter()
            .flatten()
            .map(|value| value.abs())
            .fold(0.0, f64::max)
    };
    AxisLimits::new(0.0, max * (1.0 + shift))
}

/// Compute the value axis of a line chart.
///
/// Bounds are clamped to zero on the side the data never crosses; every
/// other bound is pushed outward by the shift factor (20% for bezier curves,
/// 10% otherwise) times the clamped span.
pub fn line_limits(lines: &[Vec<f64>], bezier: bool) -> AxisLimits {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &value in lines.iter().flatten() {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return AxisLimits::EMPTY;
    }

    let factor = if bezier { LINE_BEZIER_SHIFT } else { LINE_SHIFT };
    if min >= 0.0 {
        let shift = max.abs() * factor;
        AxisLimits::new(0.0, max + shift)
    } else if max <= 0.0 {
        let shift = min.abs() * factor;
        AxisLimits::new(min - shift, 0.0)
    } else {
        let shift = (min.abs() + max.abs()) * factor;
        AxisLimits::new(min - shift, max + shift)
    }
}

/// Independent X and Y limits of a scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScatterLimits {
    /// Horizontal limits.
    pub x: AxisLimits,
    /// Vertical limits.
    pub y: AxisLimits,
}

/// Compute scatter limits from `(point, radius)` pairs.
///
/// Each maximum is the largest raw coordinate on its own axis, inflated by
/// the largest marker radius so that marker never clips the canvas edge.
pub fn scatter_limits(datasets: &[Vec<(Point, f32)>]) -> ScatterLimits {
    let mut max_x: f64 = 0.0;
    let mut max_y: f64 = 0.0;
    let mut max_radius: f32 = 0.0;
    for &(point, radius) in datasets.iter().flatten() {
        if point.x > max_x {
            max_x = point.x;
        }
        if point.y > max_y {
            max_y = point.y;
        }
        if radius > max_radius {
            max_radius = radius;
        }
    }
    let pad = max_radius as f64;
    if max_x > 0.0 {
        max_x += pad;
    }
    if max_y > 0.0 {
        max_y += pad;
    }
    ScatterLimits {
        x: AxisLimits::new(0.0, max_x),
        y: AxisLimits::new(0.0, max_y),
    }
}
