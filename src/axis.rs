//! Axis markers and label formatting.

use std::sync::Arc;

use crate::limits::AxisLimits;
use crate::transform::Scale;

/// Formatter for marker labels.
#[derive(Clone, Default)]
pub enum LabelFormat {
    /// Two decimal places (`%.2f`).
    #[default]
    Decimal,
    /// Integer truncation.
    Integer,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl LabelFormat {
    /// Format a value for display.
    pub fn format(&self, value: f64) -> String {
        match self {
            Self::Decimal => format!("{value:.2}"),
            Self::Integer => format!("{}", value.trunc() as i64),
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl std::fmt::Debug for LabelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decimal => write!(f, "LabelFormat::Decimal"),
            Self::Integer => write!(f, "LabelFormat::Integer"),
            Self::Custom(_) => write!(f, "LabelFormat::Custom(..)"),
        }
    }
}

/// A gridline plus its label at one logical value.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisMarker {
    /// Marker index, counted from the lowest value.
    pub index: usize,
    /// Logical value.
    pub value: f64,
    /// Pixel offset along the axis, measured from the canvas top (or left).
    pub offset: f32,
    /// Label text.
    pub label: String,
}

/// Marker configuration shared by the value axes of every chart type.
#[derive(Debug, Clone)]
pub struct MarkerConfig {
    /// Number of markers, both limits included.
    pub count: usize,
    /// Fallback label formatter.
    pub format: LabelFormat,
    /// Draw gridlines across the canvas.
    pub show_grid: bool,
}

impl MarkerConfig {
    /// Create a marker configuration with the given fallback format.
    pub fn new(format: LabelFormat) -> Self {
        Self {
            count: 5,
            format,
            show_grid: true,
        }
    }

    /// Set the marker count.
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Set the fallback label formatter.
    pub fn with_format(mut self, format: LabelFormat) -> Self {
        self.format = format;
        self
    }

    /// Toggle gridlines.
    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self::new(LabelFormat::default())
    }
}

/// Lay out evenly spaced value markers.
///
/// `label` lets a datasource override the text for a marker; `None` falls
/// back to the configured format. Limits without span yield a single marker
/// at the far edge.
pub fn value_markers(
    limits: AxisLimits,
    extent: f32,
    config: &MarkerConfig,
    label: impl Fn(usize, f64) -> Option<String>,
) -> Vec<AxisMarker> {
    let scale = Scale::new(limits, extent);
    let count = if limits.has_span() { config.count } else { config.count.min(1) };
    limits
        .steps(count)
        .into_iter()
        .enumerate()
        .map(|(index, value)| AxisMarker {
            index,
            value,
            offset: scale.offset_of(value),
            label: label(index, value).unwrap_or_else(|| config.format.format(value)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_formats() {
        assert_eq!(LabelFormat::Decimal.format(1.0 / 3.0), "0.33");
        assert_eq!(LabelFormat::Integer.format(20.9), "20");
        assert_eq!(LabelFormat::Integer.format(-3.7), "-3");
    }

    #[test]
    fn custom_format() {
        let format = LabelFormat::Custom(Arc::new(|value| format!("{value}%")));
        assert_eq!(format.format(12.0), "12%");
    }

    #[test]
    fn markers_span_the_limits() {
        let config = MarkerConfig::new(LabelFormat::Integer).with_count(3);
        let markers = value_markers(AxisLimits::new(0.0, 20.0), 200.0, &config, |_, _| None);
        assert_eq!(markers.len(), 3);
        assert_eq!(markers[0].label, "0");
        assert!((markers[0].offset - 200.0).abs() < 1e-6);
        assert!((markers[2].offset - 0.0).abs() < 1e-6);
        assert_eq!(markers[1].label, "10");
    }

    #[test]
    fn datasource_labels_win() {
        let config = MarkerConfig::default().with_count(2);
        let markers = value_markers(AxisLimits::new(0.0, 1.0), 10.0, &config, |index, _| {
            (index == 1).then(|| "top".to_string())
        });
        assert_eq!(markers[0].label, "0.00");
        assert_eq!(markers[1].label, "top");
    }

    #[test]
    fn empty_limits_produce_single_marker() {
        let config = MarkerConfig::default();
        let markers = value_markers(AxisLimits::EMPTY, 10.0, &config, |_, _| None);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].offset, 10.0);
    }
}
